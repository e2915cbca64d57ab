//! In-memory account directory
//!
//! Used by the test suites and for running the API without Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AccountDirectory, StoreError};
use crate::domain::{Account, AccountId, AccountNumber, NewAccount};

#[derive(Debug, Default)]
struct Inner {
    accounts: BTreeMap<AccountId, Account>,
    last_id: AccountId,
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.accounts.values().any(|a| a.number == account.number) {
            return Err(StoreError::DuplicateNumber(account.number));
        }

        // Ids are never reused, like a SERIAL column.
        inner.last_id += 1;
        let account = account.into_account(inner.last_id);
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let inner = self.inner.read().await;
        inner.accounts.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn get_by_number(&self, number: AccountNumber) -> Result<Account, StoreError> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or(StoreError::NumberNotFound(number))
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.values().cloned().collect())
    }

    async fn credit_balance(&self, id: AccountId, amount: i64) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        let account = inner.accounts.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(StoreError::BalanceOverflow(id))?;
        Ok(account.clone())
    }
}
