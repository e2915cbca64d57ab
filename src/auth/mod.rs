//! Authentication module
//!
//! - Password hashing and verification (bcrypt)
//! - JWT issuing and decoding bound to account numbers
//! - Per-request token authorization for account-scoped routes

mod authenticator;
mod password;
mod token;

pub use authenticator::{
    parse_account_id, AuthRejection, AuthStage, AuthenticatedAccount, TokenAuthenticator,
};
pub use password::{CredentialError, PasswordHasher};
pub use token::{fingerprint, Claims, HmacAlgorithm, TokenError, TokenService};
