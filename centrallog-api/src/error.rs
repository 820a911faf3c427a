use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use centrallog_core::IngestError;
use serde_json::json;

/// Everything the ingest endpoint can answer with besides success.
#[derive(Debug)]
pub enum ApiError {
    /// Body was not usable JSON; axum's own response is passed through.
    Rejected(JsonRejection),
    Ingest(IngestError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::Ingest(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(rejection) => rejection.into_response(),
            ApiError::Ingest(err) if err.is_client_error() => {
                let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
            ApiError::Ingest(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Log write failed").into_response()
            }
        }
    }
}
