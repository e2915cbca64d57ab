//! Command Handlers module
//!
//! Handlers that orchestrate account operations on top of the account
//! directory and the auth services.

mod account_handler;
mod commands;
mod login_handler;
mod transfer_handler;

#[cfg(test)]
mod tests;

pub use account_handler::CreateAccountHandler;
pub use commands::*;
pub use login_handler::LoginHandler;
pub use transfer_handler::TransferHandler;
