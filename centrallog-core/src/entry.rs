use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A log entry as submitted by a calling service.
///
/// Every field is optional at the wire level; [`LogEntry::validate`] enforces
/// the required ones. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    /// Arbitrary JSON. `null` deserializes to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// An entry that passed validation. Required fields are guaranteed non-empty
/// and empty optional strings have been dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEntry {
    pub level: String,
    pub message: String,
    pub service: String,
    pub timestamp: Option<String>,
    pub environment: Option<String>,
    pub user_id: Option<String>,
    pub request_id: Option<String>,
    pub endpoint: Option<String>,
    pub method: Option<String>,
    pub ip: Option<String>,
    /// Present-and-zero is kept: only absence drops the tag.
    pub status_code: Option<i64>,
    /// Only truthy values survive (`false`, `0`, `""` are dropped).
    pub response: Option<Value>,
    /// An empty object still counts as present.
    pub metadata: Option<Map<String, Value>>,
}

impl LogEntry {
    /// Check the required fields and normalize the optional ones.
    pub fn validate(self) -> Result<ValidEntry, IngestError> {
        let (Some(level), Some(message), Some(service)) = (
            non_empty(self.level),
            non_empty(self.message),
            non_empty(self.service),
        ) else {
            return Err(IngestError::MissingRequiredField);
        };

        Ok(ValidEntry {
            level,
            message,
            service,
            timestamp: non_empty(self.timestamp),
            environment: non_empty(self.environment),
            user_id: non_empty(self.user_id),
            request_id: non_empty(self.request_id),
            endpoint: non_empty(self.endpoint),
            method: non_empty(self.method),
            ip: non_empty(self.ip),
            status_code: self.status_code,
            response: self.response.filter(is_truthy),
            metadata: self.metadata,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy, everything else
/// (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
