//! Command definitions
//!
//! Commands represent intentions to change or query account state.

use crate::domain::{AccountId, AccountNumber};

/// Command to open a new account
#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl CreateAccountCommand {
    pub fn new(first_name: String, last_name: String, password: String) -> Self {
        Self {
            first_name,
            last_name,
            password,
        }
    }
}

/// Command to exchange an account number and password for a token
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub number: AccountNumber,
    pub password: String,
}

impl LoginCommand {
    pub fn new(number: AccountNumber, password: String) -> Self {
        Self { number, password }
    }
}

/// Command to credit an account
#[derive(Debug, Clone, Copy)]
pub struct TransferCommand {
    /// Internal id of the destination account
    pub to_account: AccountId,
    pub amount: i64,
}

impl TransferCommand {
    pub fn new(to_account: AccountId, amount: i64) -> Self {
        Self { to_account, amount }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub number: AccountNumber,
}

/// Result of a successful transfer
#[derive(Debug, Clone, Copy)]
pub struct TransferResult {
    /// Destination balance after the credit
    pub balance: i64,
}
