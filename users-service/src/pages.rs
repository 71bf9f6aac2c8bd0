//! Rate-limited static page
//!
//! Every path the API does not claim serves the configured index file.
//! Each request spends one token from the shared bucket first.

use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{error::Error, state::AppState};

/// Fallback handler serving the index page
pub async fn serve_index(State(state): State<AppState>, mut request: Request) -> Response {
    if !state.limiter().allow() {
        tracing::warn!(path = %request.uri().path(), "Rate limit exceeded, returning 429");
        return Error::RateLimitExceeded.into_response();
    }

    // The page is served whatever the verb
    if request.method() != Method::HEAD {
        *request.method_mut() = Method::GET;
    }

    let index = &state.config().static_files.index_path;
    tracing::debug!(path = %request.uri().path(), file = %index.display(), "Serving index page");

    match ServeFile::new(index).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
