pub mod alerts;
pub mod health;
pub mod readings;
pub mod risk;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /upload                  ingest a reading (device)
/// /data                    latest raw reading (device, dashboard)
///
/// /risk-data               risk assessment of the latest reading (token)
/// /risk/evaluate           assess an ad-hoc reading (token)
///
/// /alerts/manual           send the manual risk alert (token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(readings::router())
        .merge(risk::router())
        .merge(alerts::router())
}
