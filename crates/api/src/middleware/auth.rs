//! Shared-token access gate for dashboard endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use armis_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the caller may read risk data and raise manual alerts.
///
/// When `DASHBOARD_TOKEN` is configured the request must carry
/// `Authorization: Bearer <token>`; otherwise every caller is admitted.
///
/// ```ignore
/// async fn my_handler(_access: DashboardAccess) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DashboardAccess;

impl FromRequestParts<AppState> for DashboardAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.dashboard_token.as_deref() else {
            return Ok(DashboardAccess);
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if token.trim() != expected {
            tracing::warn!("Rejected dashboard request with an invalid token");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid dashboard token".into(),
            )));
        }

        Ok(DashboardAccess)
    }
}
