//! Text rendering of a validated entry.
//!
//! A record is an ordered list of optional parts. Absent parts are skipped,
//! the rest are joined by a single space, so the metadata and response
//! blocks (which start with `\n`) follow the message after one space.

use crate::entry::ValidEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Render `entry` as one log record, without the trailing newline.
///
/// `received_at` stamps entries that carry no timestamp of their own.
pub fn format_record(entry: &ValidEntry, received_at: DateTime<Utc>) -> String {
    let timestamp = entry
        .timestamp
        .clone()
        .unwrap_or_else(|| iso_timestamp(received_at));

    let parts: [Option<String>; 13] = [
        Some(format!("[{timestamp}]")),
        Some(format!("[{}]", entry.level.to_uppercase())),
        Some(format!("[{}]", entry.service)),
        entry.environment.as_ref().map(|v| format!("[env: {v}]")),
        entry.user_id.as_ref().map(|v| format!("[user: {v}]")),
        entry.request_id.as_ref().map(|v| format!("[requestId: {v}]")),
        entry.method.as_ref().map(|v| format!("[method: {v}]")),
        entry.endpoint.as_ref().map(|v| format!("[endpoint: {v}]")),
        entry.ip.as_ref().map(|v| format!("[ip: {v}]")),
        entry.status_code.map(|code| format!("[status: {code}]")),
        Some(entry.message.clone()),
        entry
            .metadata
            .as_ref()
            .map(|m| format!("\nMetadata: {}", pretty(&Value::Object(m.clone())))),
        entry
            .response
            .as_ref()
            .map(|r| format!("\nResponse: {}", render_response(r))),
    ];

    parts.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Objects and arrays are pretty-printed; scalars are written as plain text.
fn render_response(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => pretty(value),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
