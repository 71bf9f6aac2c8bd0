//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    config::Config, middleware::TokenBucket, store::DocumentStore, users::UserController,
};

/// Application state shared across handlers
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    users: UserController,
    limiter: Arc<TokenBucket>,
}

impl AppState {
    /// State over `store`, with the limiter and store deadline taken from `config`
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let limiter = Arc::new(TokenBucket::from_config(&config.rate_limit));
        Self::with_limiter(config, store, limiter)
    }

    /// State with an externally built limiter
    pub fn with_limiter(
        config: Config,
        store: Arc<dyn DocumentStore>,
        limiter: Arc<TokenBucket>,
    ) -> Self {
        let users = UserController::new(Arc::clone(&store), config.store.timeout());
        Self {
            config: Arc::new(config),
            store,
            users,
            limiter,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the document store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Get the user controller
    pub fn users(&self) -> &UserController {
        &self.users
    }

    /// Get the static page rate limiter
    pub fn limiter(&self) -> &TokenBucket {
        &self.limiter
    }
}
