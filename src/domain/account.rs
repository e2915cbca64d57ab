//! Account domain types
//!
//! An account has two identities: the store-assigned `id` used in URLs and
//! the random public `number` that tokens are bound to.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

/// Store-assigned internal identifier
pub type AccountId = i64;

/// Public account number embedded in tokens
pub type AccountNumber = i64;

/// Account numbers are drawn from `1..ACCOUNT_NUMBER_LIMIT`
pub const ACCOUNT_NUMBER_LIMIT: AccountNumber = 1_000_000;

/// Maximum length of a name field (matches the column width)
pub const MAX_NAME_LEN: usize = 50;

/// A persisted account.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub number: AccountNumber,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub balance: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// An account that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: AccountNumber,
    pub encrypted_password: String,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build a new account with a freshly drawn account number and zero balance.
    pub fn new(first_name: String, last_name: String, encrypted_password: String) -> Self {
        Self {
            first_name,
            last_name,
            number: generate_account_number(),
            encrypted_password,
            created_at: Utc::now(),
        }
    }

    /// Replace the account number, used when the drawn one is already taken.
    pub fn with_number(mut self, number: AccountNumber) -> Self {
        self.number = number;
        self
    }

    /// Materialize into an `Account` once the store has assigned an id.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            encrypted_password: self.encrypted_password,
            balance: 0,
            created_at: self.created_at,
        }
    }
}

/// Draw a random positive account number.
pub fn generate_account_number() -> AccountNumber {
    rand::thread_rng().gen_range(1..ACCOUNT_NUMBER_LIMIT)
}

/// Validate a name field, returning the trimmed value.
pub fn validate_name(field: &str, value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(format!("{} must be at most {} characters", field, MAX_NAME_LEN));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        NewAccount::new("Ada".to_string(), "Lovelace".to_string(), "$2b$04$hash".to_string())
            .with_number(42)
            .into_account(7)
    }

    #[test]
    fn test_generated_numbers_in_range() {
        for _ in 0..1000 {
            let number = generate_account_number();
            assert!(number > 0 && number < ACCOUNT_NUMBER_LIMIT);
        }
    }

    #[test]
    fn test_new_account_starts_with_zero_balance() {
        let account = sample_account();
        assert_eq!(account.id, 7);
        assert_eq!(account.number, 42);
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_account_serialization_hides_password() {
        let json = serde_json::to_value(sample_account()).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["firstname"], "Ada");
        assert_eq!(json["lastname"], "Lovelace");
        assert_eq!(json["number"], 42);
        assert_eq!(json["balance"], 0);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("encrypted_password").is_none());
        assert!(!json.to_string().contains("$2b$04$hash"));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("firstName", "  Ada ").unwrap(), "Ada");
        assert!(validate_name("firstName", "   ").is_err());
        assert!(validate_name("lastName", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_name("lastName", &"x".repeat(MAX_NAME_LEN)).is_ok());
    }
}
