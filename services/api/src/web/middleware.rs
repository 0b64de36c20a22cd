//! services/api/src/web/middleware.rs
//!
//! Request preprocessing for the versioned routes.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Name of the header carrying the API version token.
pub const VERSION_HEADER: &str = "version";

/// Inserts the default `Version` header when the request has none.
///
/// A header that is already present is never overwritten, even when its value
/// is unknown; dispatch then answers 404.
pub async fn default_version_header(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    if !req.headers().contains_key(VERSION_HEADER) {
        match HeaderValue::from_str(state.versions.default_token()) {
            Ok(value) => {
                req.headers_mut().insert(VERSION_HEADER, value);
            }
            Err(e) => warn!(error = %e, "Default API version is not a valid header value"),
        }
    }
    next.run(req).await
}
