use super::models::AppState;
use crate::errors::ApiError;
use crate::models::{HealthResponse, StatusQuery};
use crate::session::parse_timeout_ms;
use axum::{
    extract::{Query, State},
    response::Json,
};
use craftwatch_models::{Edition, ServerTarget, StatusResult};

/// JSON status for an ad-hoc target; unset fields use the dashboard presets
pub async fn api_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResult>, ApiError> {
    let defaults = state.dashboard.target_defaults();

    let edition = match query.edition.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(raw) => raw.parse::<Edition>().map_err(ApiError::InvalidInput)?,
        None => defaults.edition,
    };

    let timeout_ms = match query.timeout_ms.as_deref() {
        Some(raw) => parse_timeout_ms(Some(raw))
            .ok_or_else(|| ApiError::InvalidInput(format!("invalid timeout_ms '{}'", raw)))?,
        None => state.dashboard.timeout_ms,
    };

    let target = ServerTarget::from_input(
        query.host.as_deref(),
        query.port.as_deref(),
        edition,
        &defaults,
    );

    Ok(Json(state.check(&target, timeout_ms).await))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
