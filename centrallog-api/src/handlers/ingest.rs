use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use centrallog_core::{format_record, IngestError, LogEntry};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error};

/// `POST /log`
pub async fn ingest_log(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LogEntry>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(entry) = payload.map_err(|rejection| {
        debug!(
            error = %IngestError::MalformedRequestBody(rejection.body_text()),
            "Rejected log request"
        );
        ApiError::from(rejection)
    })?;

    let entry = entry.validate().map_err(|err| {
        debug!(error = %err, "Rejected log request");
        ApiError::from(err)
    })?;

    let record = format_record(&entry, Utc::now());

    if let Err(err) = state.log_file.append(&record).await {
        error!(error = %err, service = %entry.service, "Failed to write log");
        return Err(err.into());
    }

    Ok("Log received")
}
