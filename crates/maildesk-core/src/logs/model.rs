//! Log entry data models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::records::RecordId;

/// Severity level of a log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    /// Verbose diagnostics.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected but recoverable.
    Warning,
    /// An operation failed.
    Error,
    /// The service cannot continue.
    Critical,
    /// Any other level name, kept verbatim (uppercased).
    Other(String),
}

impl LogLevel {
    /// Levels offered as filter chips.
    pub const STANDARD: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Parses a level name case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "DEBUG" | "TRACE" => Self::Debug,
            "INFO" => Self::Info,
            "WARNING" | "WARN" => Self::Warning,
            "ERROR" => Self::Error,
            "CRITICAL" | "FATAL" => Self::Critical,
            _ => Self::Other(upper),
        }
    }

    /// Numeric severity for threshold filtering. Unknown levels rank as info.
    #[must_use]
    pub const fn severity(&self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info | Self::Other(_) => 20,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Critical => 50,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Other(name) => name,
        }
    }

    /// Returns true for error and critical.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// 1-based line number of the entry's first line in the source text.
    pub line_number: usize,
    /// Parsed timestamp, if recognizable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Timestamp exactly as written.
    pub raw_timestamp: String,
    /// Severity.
    pub level: LogLevel,
    /// Primary message text.
    pub message: String,
    /// Structured payload, when the payload was a JSON object.
    pub payload: Option<BTreeMap<String, Value>>,
    /// Original first line.
    pub raw: String,
    /// Following lines that belong to this entry (tracebacks).
    pub continuation: Vec<String>,
}

impl LogEntry {
    /// Returns a payload field rendered as plain text.
    ///
    /// Strings are returned without quotes; other values use their JSON form.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<String> {
        self.payload
            .as_ref()
            .and_then(|p| p.get(key))
            .map(value_to_text)
    }

    /// Recipient address mentioned in the payload.
    #[must_use]
    pub fn recipient(&self) -> Option<String> {
        ["recipient", "to", "email"]
            .iter()
            .find_map(|key| self.field(key))
    }

    /// Email record this entry refers to.
    #[must_use]
    pub fn record_id(&self) -> Option<RecordId> {
        ["record_id", "email_id", "id"]
            .iter()
            .find_map(|key| self.field(key))
            .and_then(|v| v.parse().ok())
            .map(RecordId)
    }

    /// Full text of the entry including continuation lines.
    #[must_use]
    pub fn full_text(&self) -> String {
        if self.continuation.is_empty() {
            return self.raw.clone();
        }
        let mut text = self.raw.clone();
        for line in &self.continuation {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    /// Payload pretty-printed as JSON for the detail view.
    #[must_use]
    pub fn pretty_payload(&self) -> Option<String> {
        self.payload
            .as_ref()
            .and_then(|p| serde_json::to_string_pretty(p).ok())
    }
}

/// Renders a JSON value as display text.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_with(payload: Value) -> LogEntry {
        let map = payload
            .as_object()
            .map(|o| o.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
        LogEntry {
            line_number: 1,
            timestamp: None,
            raw_timestamp: String::new(),
            level: LogLevel::Info,
            message: String::new(),
            payload: map,
            raw: "raw".to_string(),
            continuation: Vec::new(),
        }
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warning);
        assert_eq!(LogLevel::parse("Critical"), LogLevel::Critical);
        assert_eq!(LogLevel::parse("notice"), LogLevel::Other("NOTICE".into()));
        assert!(LogLevel::Error.severity() > LogLevel::Warning.severity());
    }

    #[test]
    fn test_error_levels() {
        assert!(LogLevel::Error.is_error());
        assert!(LogLevel::Critical.is_error());
        assert!(!LogLevel::Warning.is_error());
        assert!(!LogLevel::Other("FATAL".into()).is_error());
    }

    #[test]
    fn test_field_rendering() {
        let entry = entry_with(json!({"recipient": "a@b.com", "attempt": 2, "ok": false}));
        assert_eq!(entry.field("recipient").as_deref(), Some("a@b.com"));
        assert_eq!(entry.field("attempt").as_deref(), Some("2"));
        assert_eq!(entry.field("ok").as_deref(), Some("false"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_record_link_fields() {
        let entry = entry_with(json!({"to": "x@y.org", "email_id": "17"}));
        assert_eq!(entry.recipient().as_deref(), Some("x@y.org"));
        assert_eq!(entry.record_id(), Some(RecordId(17)));
    }

    #[test]
    fn test_full_text_includes_continuation() {
        let mut entry = entry_with(json!({}));
        entry.continuation.push("Traceback".into());
        assert_eq!(entry.full_text(), "raw\nTraceback");
    }
}
