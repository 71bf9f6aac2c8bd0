//! Route table
//!
//! Every API path is registered with the verbs it accepts. Any other verb on
//! a registered path answers 405 with the failure envelope. Paths outside the
//! table fall through to the rate-limited index page.

use axum::{
    http::{Method, Uri},
    routing::{delete, get, post, put, MethodRouter},
    Router,
};

use crate::{
    echo,
    error::Error,
    health, pages,
    state::AppState,
    users::handlers,
};

/// `(path, verbs)` pairs served by the API
pub fn route_table() -> Vec<(&'static str, MethodRouter<AppState>)> {
    vec![
        ("/users", get(handlers::list_users)),
        ("/users/create", post(handlers::create_user)),
        ("/users/get", get(handlers::get_user)),
        ("/users/find", get(handlers::get_user)),
        ("/users/update", put(handlers::update_user)),
        ("/users/delete", delete(handlers::delete_user)),
        ("/users/filter", get(handlers::filter_users)),
        ("/api", get(echo::receive_get).post(echo::receive_post)),
        ("/health", get(health::health)),
        ("/ready", get(health::readiness)),
    ]
}

/// Answer for a registered path hit with the wrong verb
pub async fn method_not_allowed(method: Method, uri: Uri) -> Error {
    tracing::warn!(
        %method,
        path = uri.path(),
        action = "method_not_allowed",
        status = "failure",
        "Method not allowed"
    );
    Error::MethodNotAllowed
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    route_table()
        .into_iter()
        .fold(Router::<AppState>::new(), |router, (path, methods)| {
            router.route(path, methods.fallback(method_not_allowed))
        })
        .fallback(pages::serve_index)
        .with_state(state)
}
