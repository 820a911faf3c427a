pub mod config;
pub mod entry;
pub mod error;
pub mod format;

pub use config::ServiceConfig;
pub use entry::{LogEntry, ValidEntry};
pub use error::IngestError;
pub use format::format_record;
