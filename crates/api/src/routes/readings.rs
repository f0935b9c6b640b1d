//! Route definitions for reading ingestion.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::readings;
use crate::state::AppState;

/// Device-facing routes. No access gate: field devices do not hold a token.
///
/// ```text
/// POST /upload        -> upload
/// GET  /data          -> latest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(readings::upload))
        .route("/data", get(readings::latest))
}
