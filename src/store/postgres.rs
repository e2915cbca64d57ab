//! Postgres-backed account directory

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{AccountDirectory, StoreError};
use crate::domain::{Account, AccountId, AccountNumber, NewAccount};

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE for numeric_value_out_of_range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, encrypted_password, balance, created_at";

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    first_name: String,
    last_name: String,
    number: i64,
    encrypted_password: String,
    balance: i64,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            number: row.number,
            encrypted_password: row.encrypted_password,
            balance: row.balance,
            created_at: row.created_at,
        }
    }
}

/// Account directory stored in the `account` table
#[derive(Debug, Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let number = account.number;
        let result: Result<AccountRow, sqlx::Error> = sqlx::query_as(&format!(
            r#"
            INSERT INTO account (first_name, last_name, number, encrypted_password, balance, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.encrypted_password)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if database_error_code(&e).as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::DuplicateNumber(number))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: AccountId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM account WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from).ok_or(StoreError::NotFound(id))
    }

    async fn get_by_number(&self, number: AccountNumber) -> Result<Account, StoreError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM account WHERE number = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from).ok_or(StoreError::NumberNotFound(number))
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM account ORDER BY id",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn credit_balance(&self, id: AccountId, amount: i64) -> Result<Account, StoreError> {
        let result: Result<Option<AccountRow>, sqlx::Error> = sqlx::query_as(&format!(
            "UPDATE account SET balance = balance + $2 WHERE id = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(StoreError::NotFound(id)),
            Err(e) if database_error_code(&e).as_deref() == Some(NUMERIC_OUT_OF_RANGE) => {
                Err(StoreError::BalanceOverflow(id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
