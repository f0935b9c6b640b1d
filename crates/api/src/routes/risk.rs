//! Route definitions for risk assessment.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::risk;
use crate::state::AppState;

/// Dashboard routes; access is enforced by the `DashboardAccess` extractor.
///
/// ```text
/// GET  /risk-data       -> latest_risk
/// POST /risk/evaluate   -> evaluate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/risk-data", get(risk::latest_risk))
        .route("/risk/evaluate", post(risk::evaluate))
}
