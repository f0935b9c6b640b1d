//! Handlers for reading ingestion and the raw latest-reading query.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use armis_core::reading::ReadingPayload;
use armis_core::triggers;
use armis_core::types::Timestamp;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Acknowledgement returned to the field device.
#[derive(Debug, Serialize)]
pub struct UploadAck {
    pub status: &'static str,
    /// The reading as stored, after field-name normalization.
    pub received: Value,
    /// Subjects of the alerts this reading raised.
    pub alerts: Vec<String>,
}

/// Body of `GET /data`. `data` is `null` until the first upload.
#[derive(Debug, Serialize)]
pub struct LatestReadingResponse {
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /upload
///
/// Store the reading (replacing the previous one), evaluate triggers and hand
/// any alerts to the dispatcher in the background. An empty body is stored as
/// an empty reading; a body that is not JSON is rejected with 400.
pub async fn upload(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<DataResponse<UploadAck>>> {
    let payload = ReadingPayload::from_body(&body, &state.config.field_aliases)?;

    let stored = state.store.set(payload).await;
    let alerts = triggers::evaluate_payload(&stored.payload, &state.config.trigger_thresholds);

    tracing::info!(
        structured = stored.payload.as_record().is_some(),
        alerts = alerts.len(),
        "Reading stored"
    );

    let subjects = alerts.iter().map(|a| a.subject.clone()).collect();
    state.dispatcher.spawn_dispatch(alerts);

    Ok(Json(DataResponse {
        data: UploadAck {
            status: "ok",
            received: stored.payload.to_json(),
            alerts: subjects,
        },
    }))
}

/// GET /data
///
/// Return the latest raw reading, or `data: null` with a message if nothing
/// has been uploaded yet.
pub async fn latest(State(state): State<AppState>) -> Json<LatestReadingResponse> {
    let response = match state.store.get().await {
        Some(stored) => LatestReadingResponse {
            data: Some(stored.payload.to_json()),
            received_at: Some(stored.received_at),
            message: None,
        },
        None => LatestReadingResponse {
            data: None,
            received_at: None,
            message: Some("no data yet"),
        },
    };
    Json(response)
}
