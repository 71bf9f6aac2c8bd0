//! # users-service
//!
//! HTTP API managing users in a document collection, plus a rate-limited
//! static page.
//!
//! ## Features
//!
//! - **CRUD**: create, read, partial update and delete of users
//! - **Filtered listing**: case-insensitive substring filters, single-key
//!   sort and page/limit pagination
//! - **Static page**: served for every unclaimed path behind a shared token bucket
//! - **Store deadline**: every store call bounded by a configurable timeout
//! - **Middleware stack**: request IDs, sensitive header masking, body limits,
//!   compression, CORS, panic recovery
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use users_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), Arc::new(MemoryCollection::new()));
//!     let app = router(state);
//!
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod echo;
pub mod error;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod pages;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod users;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::ids::{ObjectId, RequestId};
    pub use crate::middleware::TokenBucket;
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::responses::{PageEnvelope, StatusMessage};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::store::{DocumentStore, MemoryCollection};
    pub use crate::users::{User, UserController, UserQueryParams};

    pub use std::sync::Arc;
}
