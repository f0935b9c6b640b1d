use axum::routing::post;
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// ```text
/// POST /alerts/manual   -> send_manual
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/alerts/manual", post(alerts::send_manual))
}
