//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{PasswordHasher, TokenAuthenticator, TokenService};
use crate::config::Config;
use crate::store::AccountDirectory;

/// State handed to every handler and to the token middleware.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn AccountDirectory>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
    pub authenticator: TokenAuthenticator,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        tokens: TokenService,
        passwords: PasswordHasher,
        store_timeout: Duration,
    ) -> Self {
        let tokens = Arc::new(tokens);
        let authenticator = TokenAuthenticator::new(tokens.clone(), directory.clone(), store_timeout);
        Self {
            directory,
            tokens,
            passwords,
            authenticator,
        }
    }

    pub fn from_config(config: &Config, directory: Arc<dyn AccountDirectory>) -> Self {
        Self::new(
            directory,
            TokenService::new(&config.jwt_secret, config.token_ttl),
            PasswordHasher::new(config.bcrypt_cost),
            config.store_timeout,
        )
    }
}
