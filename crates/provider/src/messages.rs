//! Queue status documents and parser.
//!
//! The status endpoint returns JSON tagged by a `"status"` field, e.g.
//! `{"status": "IN_QUEUE", "queue_position": 2}`. The tag decides the
//! variant; side fields are read leniently so a known status is never lost
//! to an unexpected `error` or log shape.

use serde::Deserialize;
use serde_json::Value;

/// All known queue states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueStatus {
    /// Waiting for a worker.
    InQueue {
        /// Best-effort position hint; absent on some responses.
        queue_position: Option<u32>,
    },

    /// A worker is generating the video.
    InProgress { logs: Vec<LogEntry> },

    /// Terminal state. `error` is set when generation failed.
    Completed {
        error: Option<String>,
        logs: Vec<LogEntry>,
    },
}

/// One provider log line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub message: String,
    pub level: Option<String>,
    pub timestamp: Option<String>,
}

/// A status document whose tag could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("status document has no status field")]
    MissingStatus,

    #[error("unknown queue status: {0}")]
    Unknown(String),
}

/// Parse a status document into a typed enum.
///
/// Only the `status` tag can fail: unknown or missing tags return `Err` and
/// callers should log and keep polling. A `COMPLETED` document always
/// parses, whatever its side fields look like.
pub fn parse_status(value: &Value) -> Result<QueueStatus, StatusError> {
    let status = value
        .get("status")
        .and_then(Value::as_str)
        .ok_or(StatusError::MissingStatus)?;

    match status {
        "IN_QUEUE" => Ok(QueueStatus::InQueue {
            queue_position: value
                .get("queue_position")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
        }),
        "IN_PROGRESS" => Ok(QueueStatus::InProgress {
            logs: parse_logs(value),
        }),
        "COMPLETED" => Ok(QueueStatus::Completed {
            error: error_text(value.get("error")),
            logs: parse_logs(value),
        }),
        other => Err(StatusError::Unknown(other.to_string())),
    }
}

/// Log entries, skipping any that are not objects. `"logs": null` and a
/// missing field both yield no entries.
fn parse_logs(value: &Value) -> Vec<LogEntry> {
    value
        .get("logs")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| LogEntry::deserialize(entry).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Render the `error` field as text. Strings pass through; objects and
/// other values are rendered as compact JSON.
fn error_text(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
