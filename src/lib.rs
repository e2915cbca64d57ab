//! bank_api Library
//!
//! Account management and transfer API. Account-scoped routes are protected
//! by JWTs bound to the account's public number.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod state;
pub mod store;

mod error;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorResponse, PERMISSION_DENIED};
pub use state::AppState;
