//! The shared append-only log file.
//!
//! Every record goes out as a single `write_all` on a handle opened in
//! append mode, so records from concurrent requests may interleave with each
//! other but a record is never split by another writer's bytes on platforms
//! where `O_APPEND` writes are atomic. There is no lock around the file.
//!
//! The parent directory is created once by [`LogFile::ensure_dir`] at
//! startup. `append` does not recreate it: if the directory vanishes, the
//! caller sees a write failure.

use centrallog_core::IngestError;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Handle on the process-wide log file. Cheap to clone; holds only the path.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory if missing. Idempotent, safe to race.
    pub async fn ensure_dir(&self) -> Result<(), IngestError> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        fs::create_dir_all(parent)
            .await
            .map_err(|source| IngestError::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;

        info!(dir = %parent.display(), "Log directory ready");
        Ok(())
    }

    /// Append `record` plus a trailing newline in one write.
    pub async fn append(&self, record: &str) -> Result<(), IngestError> {
        let mut buf = String::with_capacity(record.len() + 1);
        buf.push_str(record);
        buf.push('\n');

        self.write_all(buf.as_bytes())
            .await
            .map_err(|source| IngestError::Write {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = buf.len(), "Record appended");
        Ok(())
    }

    async fn write_all(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await
    }
}
