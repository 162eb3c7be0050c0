//! Parser for `timestamp - LEVEL - {json payload}` log lines.
//!
//! The backend writes through Python `logging`, so payloads are usually JSON
//! but sometimes the `repr()` of a dict. Lines that do not have the
//! three-part layout (tracebacks, wrapped text) belong to the previous entry.

use std::collections::BTreeMap;

use serde_json::Value;

use super::model::{LogEntry, LogLevel, value_to_text};
use crate::dates::parse_timestamp;

/// Separator between timestamp, level and payload.
const SEPARATOR: &str = " - ";

/// Payload keys tried, in order, for the primary message.
const MESSAGE_KEYS: &[&str] = &["message", "msg", "event", "detail"];

/// Parses a single line.
///
/// Returns `None` if the line does not have the `timestamp - LEVEL - payload`
/// layout or the level is not a single word.
#[must_use]
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (raw_timestamp, rest) = line.split_once(SEPARATOR)?;
    let (level, payload_text) = rest.split_once(SEPARATOR)?;

    let raw_timestamp = raw_timestamp.trim();
    let level = level.trim();
    if raw_timestamp.is_empty() || !is_level_word(level) {
        return None;
    }

    let timestamp = parse_timestamp(raw_timestamp);
    if timestamp.is_none() && !has_date_prefix(raw_timestamp) {
        return None;
    }

    let payload_text = payload_text.trim();
    let payload = parse_payload(payload_text);
    let message = payload
        .as_ref()
        .and_then(|p| MESSAGE_KEYS.iter().find_map(|k| p.get(*k)))
        .map_or_else(|| payload_text.to_string(), value_to_text);

    Some(LogEntry {
        line_number: 0,
        timestamp,
        raw_timestamp: raw_timestamp.to_string(),
        level: LogLevel::parse(level),
        message,
        payload,
        raw: line.to_string(),
        continuation: Vec::new(),
    })
}

/// Parses a whole log text.
///
/// Blank lines are skipped. Lines that are not entries attach to the
/// previous entry; if there is none yet they form a `RAW` entry.
#[must_use]
pub fn parse_log(text: &str) -> Vec<LogEntry> {
    let mut entries: Vec<LogEntry> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(mut entry) = parse_line(line) {
            entry.line_number = index + 1;
            entries.push(entry);
        } else if let Some(last) = entries.last_mut() {
            last.continuation.push(line.to_string());
        } else {
            entries.push(LogEntry {
                line_number: index + 1,
                timestamp: None,
                raw_timestamp: String::new(),
                level: LogLevel::Other("RAW".to_string()),
                message: line.trim().to_string(),
                payload: None,
                raw: line.to_string(),
                continuation: Vec::new(),
            });
        }
    }

    entries
}

/// Whether `text` starts with a `YYYY-MM-DD` shaped date.
fn has_date_prefix(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn is_level_word(level: &str) -> bool {
    !level.is_empty() && level.len() <= 10 && level.chars().all(|c| c.is_ascii_alphabetic())
}

/// Parses a payload into a JSON object, accepting Python dict syntax.
fn parse_payload(text: &str) -> Option<BTreeMap<String, Value>> {
    if !text.starts_with('{') {
        return None;
    }

    let value = serde_json::from_str::<Value>(text)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(&normalize_python_dict(text)).ok())?;

    match value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

/// Rewrites a Python dict literal into JSON.
///
/// Single-quoted strings become double-quoted (escaping embedded double
/// quotes), and the bare words `True`, `False` and `None` become their JSON
/// equivalents when they appear outside strings.
fn normalize_python_dict(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => match c {
                '\\' => {
                    if let Some(&next) = chars.peek() {
                        chars.next();
                        if next == '\'' {
                            out.push('\'');
                        } else {
                            out.push('\\');
                            out.push(next);
                        }
                    }
                }
                '"' if q == '\'' => out.push_str("\\\""),
                c if c == q => {
                    out.push('"');
                    quote = None;
                }
                c => out.push(c),
            },
            None => match c {
                '\'' | '"' => {
                    out.push('"');
                    quote = Some(c);
                }
                c if c.is_ascii_alphabetic() => {
                    let mut word = String::from(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            word.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    out.push_str(match word.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        other => other,
                    });
                }
                c => out.push(c),
            },
        }
    }

    out
}
