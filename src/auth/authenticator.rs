//! Token Authenticator
//!
//! Decides whether a presented token may act on the account addressed by the
//! request path. A request moves through
//!
//! `Unauthenticated -> SignatureChecked -> ClaimsExtracted -> IdentityResolved -> Authorized`
//!
//! and may drop out as rejected at any step. All rejections look the same to
//! the caller; the step and reason are only logged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::token::{self, Claims, TokenError, TokenService};
use crate::domain::{Account, AccountId};
use crate::store::{AccountDirectory, StoreError};

/// Progress of a single authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Unauthenticated,
    SignatureChecked,
    ClaimsExtracted,
    IdentityResolved,
    Authorized,
}

/// Why a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("invalid token")]
    InvalidToken,

    #[error("malformed account id")]
    MalformedRequest,

    #[error("account not found")]
    AccountNotFound,

    #[error("token does not belong to the addressed account")]
    Forbidden,

    #[error("account lookup failed")]
    StoreUnavailable,
}

/// The account a request was authorized for, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

#[derive(Clone)]
pub struct TokenAuthenticator {
    tokens: Arc<TokenService>,
    directory: Arc<dyn AccountDirectory>,
    lookup_timeout: Duration,
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("tokens", &self.tokens)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl TokenAuthenticator {
    pub fn new(
        tokens: Arc<TokenService>,
        directory: Arc<dyn AccountDirectory>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            directory,
            lookup_timeout,
        }
    }

    /// Authorize `token` for the account whose id is `raw_account_id`.
    ///
    /// Performs at most one directory read and never writes.
    pub async fn authenticate(
        &self,
        token: &str,
        raw_account_id: &str,
    ) -> Result<Account, AuthRejection> {
        let fingerprint = token::fingerprint(token);
        let reject = |stage: AuthStage, rejection: AuthRejection, detail: &dyn fmt::Display| {
            tracing::warn!(
                stage = ?stage,
                reason = %rejection,
                detail = %detail,
                token = %fingerprint,
                account_id = %raw_account_id,
                "Token rejected"
            );
            rejection
        };

        // Unauthenticated -> SignatureChecked
        let claims = self.check_signature(token).map_err(|e| {
            let stage = match e {
                // The signature held but the payload did not fit `Claims`.
                TokenError::InvalidClaims => AuthStage::SignatureChecked,
                _ => AuthStage::Unauthenticated,
            };
            reject(stage, AuthRejection::InvalidToken, &e)
        })?;

        // SignatureChecked -> ClaimsExtracted
        self.tokens
            .check_expiry(&claims)
            .map_err(|e| reject(AuthStage::SignatureChecked, AuthRejection::InvalidToken, &e))?;

        // ClaimsExtracted -> IdentityResolved
        let account_id = parse_account_id(raw_account_id).ok_or_else(|| {
            reject(
                AuthStage::ClaimsExtracted,
                AuthRejection::MalformedRequest,
                &"path id is not a positive integer",
            )
        })?;
        let account = self
            .lookup(account_id)
            .await
            .map_err(|(rejection, detail)| reject(AuthStage::ClaimsExtracted, rejection, &detail))?;

        // IdentityResolved -> Authorized
        if account.number != claims.account_number {
            return Err(reject(
                AuthStage::IdentityResolved,
                AuthRejection::Forbidden,
                &format!(
                    "token number {} does not own account {}",
                    claims.account_number, account.id
                ),
            ));
        }

        tracing::debug!(
            stage = ?AuthStage::Authorized,
            account_id = account.id,
            token = %fingerprint,
            "Token accepted"
        );
        Ok(account)
    }

    fn check_signature(&self, token: &str) -> Result<Claims, TokenError> {
        let algorithm = self.tokens.check_algorithm(token)?;
        self.tokens.verify_signature(token, algorithm)
    }

    async fn lookup(&self, id: AccountId) -> Result<Account, (AuthRejection, String)> {
        match tokio::time::timeout(self.lookup_timeout, self.directory.get_by_id(id)).await {
            Ok(Ok(account)) => Ok(account),
            Ok(Err(StoreError::NotFound(_))) => {
                Err((AuthRejection::AccountNotFound, format!("no account with id {}", id)))
            }
            Ok(Err(e)) => {
                tracing::error!("Account lookup failed during authentication: {}", e);
                Err((AuthRejection::StoreUnavailable, e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    timeout = ?self.lookup_timeout,
                    "Account lookup timed out during authentication"
                );
                Err((AuthRejection::StoreUnavailable, "lookup timed out".to_string()))
            }
        }
    }
}

/// Parse a path segment as a positive account id.
pub fn parse_account_id(raw: &str) -> Option<AccountId> {
    raw.parse::<AccountId>().ok().filter(|id| *id > 0)
}
