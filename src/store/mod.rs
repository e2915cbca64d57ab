//! Account Directory
//!
//! Persistence seam for accounts. Handlers and the token authenticator only
//! see the `AccountDirectory` trait.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{Account, AccountId, AccountNumber, NewAccount};

pub use memory::InMemoryDirectory;
pub use postgres::PgAccountDirectory;

/// Errors raised by an account directory
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account with id: {0} not found")]
    NotFound(AccountId),

    #[error("account with number: {0} not found")]
    NumberNotFound(AccountNumber),

    #[error("account number {0} is already taken")]
    DuplicateNumber(AccountNumber),

    #[error("balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True for errors caused by the request rather than the store itself
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn delete(&self, id: AccountId) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: AccountId) -> Result<Account, StoreError>;

    async fn get_by_number(&self, number: AccountNumber) -> Result<Account, StoreError>;

    /// All accounts ordered by id
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Add `amount` to the balance of `id` and return the updated account.
    async fn credit_balance(&self, id: AccountId, amount: i64) -> Result<Account, StoreError>;
}
