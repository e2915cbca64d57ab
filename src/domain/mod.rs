//! Domain module
//!
//! Core domain types.

pub mod account;
pub mod transfer;

pub use account::{Account, AccountId, AccountNumber, NewAccount};
pub use transfer::{Transfer, TransferError};
