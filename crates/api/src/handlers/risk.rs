//! Handlers for risk assessment queries.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use armis_core::reading::ReadingPayload;
use armis_core::risk::{self, RiskAssessment};

use crate::error::AppResult;
use crate::middleware::auth::DashboardAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /risk-data
///
/// Assess the latest reading. Returns the `No Data` sentinel if nothing has
/// been uploaded yet.
pub async fn latest_risk(
    State(state): State<AppState>,
    _access: DashboardAccess,
) -> Json<DataResponse<RiskAssessment>> {
    let stored = state.store.get().await;
    let assessment = risk::assess_latest(
        stored.as_deref().map(|s| &s.payload),
        &state.config.risk_policy,
    );

    tracing::debug!(
        risk_percent = assessment.risk_percent,
        risk_level = %assessment.risk_level,
        main_factor = %assessment.main_factor,
        "Risk assessed"
    );

    Json(DataResponse { data: assessment })
}

/// POST /risk/evaluate
///
/// Assess an ad-hoc reading without storing it or raising alerts.
pub async fn evaluate(
    State(state): State<AppState>,
    _access: DashboardAccess,
    body: Bytes,
) -> AppResult<Json<DataResponse<RiskAssessment>>> {
    let payload = ReadingPayload::from_body(&body, &state.config.field_aliases)?;
    let assessment = risk::assess_payload(&payload, &state.config.risk_policy);
    Ok(Json(DataResponse { data: assessment }))
}
