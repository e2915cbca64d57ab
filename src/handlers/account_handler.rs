//! Account Creation Handler
//!
//! Validates the request, hashes the password and stores the account under a
//! fresh random account number.

use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::domain::account::{generate_account_number, validate_name};
use crate::domain::{Account, NewAccount};
use crate::error::AppError;
use crate::store::{AccountDirectory, StoreError};

use super::CreateAccountCommand;

/// Attempts at drawing an unused account number before giving up
const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Handler for account creation
pub struct CreateAccountHandler {
    directory: Arc<dyn AccountDirectory>,
    passwords: PasswordHasher,
}

impl CreateAccountHandler {
    pub fn new(directory: Arc<dyn AccountDirectory>, passwords: PasswordHasher) -> Self {
        Self {
            directory,
            passwords,
        }
    }

    /// Execute the create account command
    pub async fn execute(&self, command: CreateAccountCommand) -> Result<Account, AppError> {
        let first_name =
            validate_name("firstName", &command.first_name).map_err(AppError::InvalidRequest)?;
        let last_name =
            validate_name("lastName", &command.last_name).map_err(AppError::InvalidRequest)?;
        if command.password.is_empty() {
            return Err(AppError::InvalidRequest("password must not be empty".to_string()));
        }

        // bcrypt is deliberately slow; keep it off the async workers.
        let passwords = self.passwords;
        let password = command.password;
        let encrypted_password = tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

        let mut new_account = NewAccount::new(first_name, last_name, encrypted_password);

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            match self.directory.create(new_account.clone()).await {
                Ok(account) => {
                    tracing::info!(
                        account_id = account.id,
                        number = account.number,
                        "Account created"
                    );
                    return Ok(account);
                }
                Err(StoreError::DuplicateNumber(number)) => {
                    tracing::debug!(number, attempt, "Account number taken, drawing another");
                    new_account = new_account.with_number(generate_account_number());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "could not allocate a unique account number".to_string(),
        ))
    }
}
