//! Integration tests for the Postgres account directory
//!
//! These tests require a database connection:
//! `DATABASE_URL=... cargo test --test integration_store -- --ignored`

use bank_api::db;
use bank_api::domain::{account::generate_account_number, NewAccount};
use bank_api::store::{AccountDirectory, PgAccountDirectory, StoreError};
use sqlx::postgres::PgPoolOptions;

async fn setup_directory() -> PgAccountDirectory {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    db::verify_connection(&pool).await.unwrap();
    db::ensure_schema(&pool).await.unwrap();

    PgAccountDirectory::new(pool)
}

fn new_account() -> NewAccount {
    NewAccount::new("Grace".to_string(), "Hopper".to_string(), "hash".to_string())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_fetch_delete() {
    let directory = setup_directory().await;

    let created = directory.create(new_account()).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.balance, 0);

    let by_id = directory.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id.number, created.number);
    let by_number = directory.get_by_number(created.number).await.unwrap();
    assert_eq!(by_number.id, created.id);
    assert!(directory.list().await.unwrap().iter().any(|a| a.id == created.id));

    directory.delete(created.id).await.unwrap();
    assert!(matches!(
        directory.get_by_id(created.id).await.unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        directory.delete(created.id).await.unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_number_detected() {
    let directory = setup_directory().await;

    let first = directory.create(new_account()).await.unwrap();
    let err = directory
        .create(new_account().with_number(first.number))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateNumber(n) if n == first.number));

    directory.delete(first.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_credit_balance() {
    let directory = setup_directory().await;
    let account = directory
        .create(new_account().with_number(generate_account_number()))
        .await
        .unwrap();

    let updated = directory.credit_balance(account.id, 500).await.unwrap();
    assert_eq!(updated.balance, 500);

    let err = directory.credit_balance(account.id, i64::MAX).await.unwrap_err();
    assert!(matches!(err, StoreError::BalanceOverflow(_)));

    directory.delete(account.id).await.unwrap();
}
