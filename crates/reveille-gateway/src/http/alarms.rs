//! Alarm CRUD endpoints.
//!
//! Malformed bodies are client errors (400) and are never retried; store or
//! scheduling failures surface as 500 after being logged with the failing
//! operation's name.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use reveille_alarms::{Alarm, AlarmError, AlarmSpec};

use crate::app::AppState;

type HandlerError = (StatusCode, Json<Value>);

/// POST /alarms — create an alarm, returning the full record (id, next_run).
pub async fn create_alarm(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Alarm>, HandlerError> {
    let spec: AlarmSpec = serde_json::from_slice(&body).map_err(bad_body)?;
    let alarm = state.alarms.create(spec).map_err(alarm_error)?;
    Ok(Json(alarm))
}

/// GET /alarms — every alarm record, reconstructed from the scheduler.
pub async fn list_alarms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Alarm>>, HandlerError> {
    let alarms = state.alarms.list().map_err(alarm_error)?;
    Ok(Json(alarms))
}

#[derive(Deserialize)]
struct DeleteAlarmRequest {
    id: String,
}

/// DELETE /alarms — body `{id}`; removes the record, its jobs and its row.
pub async fn delete_alarm(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let req: DeleteAlarmRequest = serde_json::from_slice(&body).map_err(bad_body)?;
    state.alarms.delete(&req.id).map_err(alarm_error)?;
    Ok(StatusCode::OK)
}

fn bad_body(e: serde_json::Error) -> HandlerError {
    warn!("decoding body: {e}");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": format!("decoding body: {e}")})),
    )
}

fn alarm_error(e: AlarmError) -> HandlerError {
    let status = match &e {
        AlarmError::InvalidAlarm(_) => StatusCode::BAD_REQUEST,
        AlarmError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("alarm request failed: {e}");
    } else {
        warn!("alarm request rejected: {e}");
    }
    (status, Json(json!({"error": e.to_string()})))
}
