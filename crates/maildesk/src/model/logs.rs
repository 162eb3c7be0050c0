//! State of the log viewer page.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use maildesk_core::logs::parse_log;
use maildesk_core::{LogEntry, LogFilter, LogLevel, LogStats};

use super::debounce::Debounce;

/// Tail sizes offered in the picker.
pub const TAIL_SIZES: [usize; 5] = [100, 250, 500, 1000, 5000];

/// Most entries rendered at once; the rest are summarized.
pub const MAX_RENDERED: usize = 500;

#[derive(Debug, Clone)]
pub struct LogsState {
    pub entries: Vec<LogEntry>,
    pub stats: LogStats,
    pub filter: LogFilter,
    pub search_input: String,
    pub search_debounce: Debounce,
    pub field_input: String,
    /// Line numbers of expanded entries.
    pub expanded: BTreeSet<usize>,
    pub tail_lines: usize,
    pub auto_refresh: bool,
    pub loaded_at: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LogsState {
    pub fn new(tail_lines: usize) -> Self {
        Self {
            entries: Vec::new(),
            stats: LogStats::default(),
            filter: LogFilter::new(),
            search_input: String::new(),
            search_debounce: Debounce::default(),
            field_input: String::new(),
            expanded: BTreeSet::new(),
            tail_lines,
            auto_refresh: true,
            loaded_at: None,
            is_loading: false,
            error: None,
        }
    }

    /// Replaces the entries with freshly fetched log text.
    ///
    /// Expanded entries stay expanded if their line is still present.
    pub fn load_text(&mut self, text: &str, at: DateTime<Utc>) {
        self.entries = parse_log(text);
        self.stats = LogStats::from_entries(&self.entries);
        let lines: BTreeSet<usize> = self.entries.iter().map(|e| e.line_number).collect();
        self.expanded.retain(|line| lines.contains(line));
        self.loaded_at = Some(at);
        self.is_loading = false;
        self.error = None;
    }

    /// Entries passing the filter, newest first.
    pub fn visible(&self) -> Vec<&LogEntry> {
        let mut entries = self.filter.apply(&self.entries);
        entries.reverse();
        entries
    }

    pub fn toggle_level(&mut self, level: LogLevel) {
        self.filter.toggle_level(level);
    }

    pub fn is_level_active(&self, level: &LogLevel) -> bool {
        self.filter.levels.contains(level)
    }

    /// Applies the debounced search text.
    pub fn apply_search(&mut self) {
        self.filter.search = self.search_input.trim().to_string();
    }

    pub fn set_field_input(&mut self, input: String) {
        self.filter.set_field_expression(&input);
        self.field_input = input;
    }

    pub fn toggle_expanded(&mut self, line: usize) {
        if !self.expanded.remove(&line) {
            self.expanded.insert(line);
        }
    }

    pub fn clear_filters(&mut self) {
        self.filter = LogFilter::new();
        self.search_input.clear();
        self.field_input.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TEXT: &str = "\
2024-05-01 10:00:00,000 - INFO - {\"message\": \"Queued\", \"recipient\": \"a@example.com\"}
2024-05-01 10:00:01,000 - ERROR - {\"message\": \"SMTP timeout\", \"recipient\": \"b@example.com\"}
Traceback (most recent call last):
  File \"sender.py\", line 10
2024-05-01 10:00:02,000 - INFO - {\"message\": \"Sent\", \"recipient\": \"a@example.com\"}";

    #[test]
    fn test_visible_is_newest_first() {
        let mut state = LogsState::new(500);
        state.load_text(TEXT, Utc::now());
        let messages: Vec<_> = state.visible().iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, ["Sent", "SMTP timeout", "Queued"]);
        assert_eq!(state.stats.total, 3);
    }

    #[test]
    fn test_level_and_field_filters() {
        let mut state = LogsState::new(500);
        state.load_text(TEXT, Utc::now());

        state.toggle_level(LogLevel::Error);
        assert_eq!(state.visible().len(), 1);
        assert!(state.is_level_active(&LogLevel::Error));
        state.toggle_level(LogLevel::Error);

        state.set_field_input("recipient=A@example.com".into());
        assert_eq!(state.visible().len(), 2);

        state.clear_filters();
        assert_eq!(state.visible().len(), 3);
    }

    #[test]
    fn test_search_covers_traceback() {
        let mut state = LogsState::new(500);
        state.load_text(TEXT, Utc::now());
        state.search_input = "  sender.py ".into();
        state.apply_search();
        assert_eq!(state.visible().len(), 1);
    }

    #[test]
    fn test_expansion_survives_reload() {
        let mut state = LogsState::new(500);
        state.load_text(TEXT, Utc::now());
        state.toggle_expanded(2);
        state.toggle_expanded(99);
        state.load_text(TEXT, Utc::now());
        assert_eq!(state.expanded.iter().copied().collect::<Vec<_>>(), [2]);
    }
}
