//! Handler for operator-initiated alerts.

use axum::extract::State;
use axum::Json;
use armis_core::triggers;
use armis_events::DispatchReport;

use crate::middleware::auth::DashboardAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /alerts/manual
///
/// Send the fixed "Manual Risk Alert" to every notifier and report the
/// outcome per channel. Delivery failures are reported in the body; the
/// request itself still succeeds.
pub async fn send_manual(
    State(state): State<AppState>,
    _access: DashboardAccess,
) -> Json<DataResponse<Vec<DispatchReport>>> {
    let alert = triggers::manual_alert();
    tracing::info!(subject = %alert.subject, "Manual alert requested");

    let reports = state.dispatcher.dispatch(&alert).await;
    Json(DataResponse { data: reports })
}
