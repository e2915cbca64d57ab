//! Login Handler
//!
//! Checks an account number and password and issues a token.

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::error::AppError;
use crate::store::{AccountDirectory, StoreError};

use super::{LoginCommand, LoginResult};

pub struct LoginHandler {
    directory: Arc<dyn AccountDirectory>,
    passwords: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        passwords: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            directory,
            passwords,
            tokens,
        }
    }

    /// Execute the login command
    ///
    /// Unknown numbers and wrong passwords fail with the same error.
    pub async fn execute(&self, command: LoginCommand) -> Result<LoginResult, AppError> {
        let account = match self.directory.get_by_number(command.number).await {
            Ok(account) => account,
            Err(StoreError::NumberNotFound(_)) => {
                // Must cost the same as a wrong password.
                self.check_password(None, command.password).await?;
                tracing::info!(number = command.number, "Login for unknown account number");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let valid = self
            .check_password(Some(account.encrypted_password.clone()), command.password)
            .await?;

        if !valid {
            tracing::info!(number = account.number, "Login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account)?;
        tracing::info!(account_id = account.id, number = account.number, "Token issued");

        Ok(LoginResult {
            token,
            number: account.number,
        })
    }

    /// Run bcrypt on the blocking pool, against a dummy when `secret` is absent
    async fn check_password(
        &self,
        secret: Option<String>,
        password: String,
    ) -> Result<bool, AppError> {
        let passwords = self.passwords;
        tokio::task::spawn_blocking(move || match secret {
            Some(secret) => passwords.verify(&secret, &password),
            None => passwords.verify_missing(&password),
        })
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))
    }
}
