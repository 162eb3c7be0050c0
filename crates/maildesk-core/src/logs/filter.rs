//! Client-side log filtering, searching and statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use super::model::{LogEntry, LogLevel, value_to_text};

/// Filter applied to parsed log entries.
///
/// All criteria must match. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Allowed levels; empty allows all.
    pub levels: BTreeSet<LogLevel>,
    /// Minimum severity.
    pub min_level: Option<LogLevel>,
    /// Case-insensitive text search.
    pub search: String,
    /// Inclusive lower time bound.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper time bound.
    pub until: Option<DateTime<Utc>>,
    /// Payload equality filters (`key` → expected text, case-insensitive).
    pub fields: BTreeMap<String, String>,
}

impl LogFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes a level from the allowed set.
    pub fn toggle_level(&mut self, level: LogLevel) {
        if !self.levels.remove(&level) {
            self.levels.insert(level);
        }
    }

    /// Parses `key=value` field filters separated by whitespace or commas.
    ///
    /// Tokens without `=` are ignored.
    pub fn set_field_expression(&mut self, expression: &str) {
        self.fields = expression
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|token| token.split_once('='))
            .filter(|(k, v)| !k.trim().is_empty() && !v.trim().is_empty())
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_lowercase()))
            .collect();
    }

    /// Returns true if nothing is filtered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
            && self.min_level.is_none()
            && self.search.trim().is_empty()
            && self.since.is_none()
            && self.until.is_none()
            && self.fields.is_empty()
    }

    /// Returns true if the entry passes every criterion.
    ///
    /// Entries without a parsed timestamp never pass a time bound.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if !self.levels.is_empty() && !self.levels.contains(&entry.level) {
            return false;
        }

        if let Some(min) = &self.min_level
            && entry.level.severity() < min.severity()
        {
            return false;
        }

        if self.since.is_some() || self.until.is_some() {
            let Some(ts) = entry.timestamp else {
                return false;
            };
            if self.since.is_some_and(|since| ts < since) || self.until.is_some_and(|until| ts > until)
            {
                return false;
            }
        }

        for (key, expected) in &self.fields {
            match entry.field(key) {
                Some(actual) if actual.to_lowercase() == *expected => {}
                _ => return false,
            }
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || entry_contains(entry, &needle)
    }

    /// Returns the matching entries in their original order.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

fn entry_contains(entry: &LogEntry, needle: &str) -> bool {
    if entry.message.to_lowercase().contains(needle) || entry.raw.to_lowercase().contains(needle) {
        return true;
    }
    if entry
        .payload
        .as_ref()
        .is_some_and(|p| p.values().any(|v| value_to_text(v).to_lowercase().contains(needle)))
    {
        return true;
    }
    entry
        .continuation
        .iter()
        .any(|line| line.to_lowercase().contains(needle))
}

/// Aggregate counts over a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStats {
    /// Number of entries.
    pub total: usize,
    /// Entries per level.
    pub by_level: BTreeMap<LogLevel, usize>,
    /// Earliest parsed timestamp.
    pub first: Option<DateTime<Utc>>,
    /// Latest parsed timestamp.
    pub last: Option<DateTime<Utc>>,
}

impl LogStats {
    /// Computes statistics over entries.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut stats = Self::default();
        for entry in entries {
            stats.total += 1;
            *stats.by_level.entry(entry.level.clone()).or_insert(0) += 1;
            if let Some(ts) = entry.timestamp {
                stats.first = Some(stats.first.map_or(ts, |f| f.min(ts)));
                stats.last = Some(stats.last.map_or(ts, |l| l.max(ts)));
            }
        }
        stats
    }

    /// Count for a level.
    #[must_use]
    pub fn count(&self, level: &LogLevel) -> usize {
        self.by_level.get(level).copied().unwrap_or(0)
    }

    /// Number of error and critical entries.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.count(&LogLevel::Error) + self.count(&LogLevel::Critical)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dates::parse_timestamp;
    use crate::logs::parse_log;

    const SAMPLE: &str = r#"2024-05-01 10:00:00,000 - INFO - {"message": "Email queued", "recipient": "alice@example.com", "record_id": 1}
2024-05-01 10:00:05,000 - ERROR - {"message": "SMTP timeout", "recipient": "bob@example.com", "record_id": 2}
Traceback (most recent call last):
TimeoutError: connection to smtp.example.com timed out
2024-05-01 10:01:00,000 - WARNING - {"message": "Large attachment uploaded to Drive", "recipient": "carol@example.com"}
2024-05-01 10:02:00,000 - DEBUG - heartbeat"#;

    fn entries() -> Vec<LogEntry> {
        parse_log(SAMPLE)
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = LogFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&entries()).len(), 4);
    }

    #[test]
    fn test_level_set() {
        let mut filter = LogFilter::new();
        filter.toggle_level(LogLevel::Error);
        filter.toggle_level(LogLevel::Warning);
        assert_eq!(filter.apply(&entries()).len(), 2);
        filter.toggle_level(LogLevel::Warning);
        assert_eq!(filter.apply(&entries()).len(), 1);
    }

    #[test]
    fn test_min_level() {
        let filter = LogFilter {
            min_level: Some(LogLevel::Warning),
            ..LogFilter::default()
        };
        assert_eq!(filter.apply(&entries()).len(), 2);
    }

    #[test]
    fn test_search_covers_payload_and_traceback() {
        let entries = entries();
        let mut filter = LogFilter::new();
        filter.search = "CAROL".into();
        assert_eq!(filter.apply(&entries).len(), 1);
        filter.search = "timed out".into();
        let found = filter.apply(&entries);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].level, LogLevel::Error);
    }

    #[test]
    fn test_time_bounds() {
        let filter = LogFilter {
            since: parse_timestamp("2024-05-01 10:00:05"),
            until: parse_timestamp("2024-05-01 10:01:00"),
            ..LogFilter::default()
        };
        assert_eq!(filter.apply(&entries()).len(), 2);
    }

    #[test]
    fn test_field_expression() {
        let entries = entries();
        let mut filter = LogFilter::new();
        filter.set_field_expression("record_id=2, bogus");
        assert_eq!(filter.fields.len(), 1);
        let found = filter.apply(&entries);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "SMTP timeout");

        filter.set_field_expression("recipient=ALICE@example.com");
        assert_eq!(filter.apply(&entries).len(), 1);
    }

    #[test]
    fn test_stats() {
        let entries = entries();
        let stats = LogStats::from_entries(&entries);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.errors(), 1);
        assert_eq!(stats.count(&LogLevel::Debug), 1);
        assert_eq!(stats.first, parse_timestamp("2024-05-01 10:00:00"));
        assert_eq!(stats.last, parse_timestamp("2024-05-01 10:02:00"));
    }
}
