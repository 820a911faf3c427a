use std::path::PathBuf;
use thiserror::Error;

/// Failures along the ingestion path.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Missing required fields: level, message, or service")]
    MissingRequiredField,

    #[error("Malformed request body: {0}")]
    MalformedRequestBody(String),

    #[error("Failed to create log directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    /// Map to HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::MissingRequiredField => 400,
            IngestError::MalformedRequestBody(_) => 400,
            IngestError::DirectoryCreate { .. } => 500,
            IngestError::Write { .. } => 500,
        }
    }

    /// True when the caller sent something we refuse to log.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
