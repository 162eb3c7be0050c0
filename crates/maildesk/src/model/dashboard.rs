//! Dashboard state: delivery summary and the latest failures.

use chrono::{DateTime, Utc};
use maildesk_core::{DeliveryStatus, EmailRecord, RecordQuery, StatusSummary};

/// Number of failures listed on the dashboard.
pub const RECENT_FAILURES: usize = 5;

/// Newest failed records, for the dashboard list.
pub fn failures_query() -> RecordQuery {
    RecordQuery::with_page_size(RECENT_FAILURES).with_status(Some(DeliveryStatus::Failed))
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub summary: Option<StatusSummary>,
    pub recent_failures: Vec<EmailRecord>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    /// Stores a new summary. Returns how many failures were added since the
    /// previous one; the first summary never counts as an increase.
    pub fn observe(&mut self, summary: StatusSummary, at: DateTime<Utc>) -> Option<u64> {
        let increase = self
            .summary
            .as_ref()
            .map(StatusSummary::failures)
            .and_then(|before| summary.failures().checked_sub(before))
            .filter(|added| *added > 0);
        self.summary = Some(summary);
        self.refreshed_at = Some(at);
        self.is_loading = false;
        self.error = None;
        increase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(failed: u64, bounced: u64) -> StatusSummary {
        StatusSummary {
            total: 100,
            failed,
            bounced,
            ..StatusSummary::default()
        }
    }

    #[test]
    fn test_first_summary_is_baseline() {
        let mut state = DashboardState::default();
        assert_eq!(state.observe(summary(3, 1), Utc::now()), None);
        assert_eq!(state.observe(summary(5, 1), Utc::now()), Some(2));
        assert_eq!(state.observe(summary(5, 1), Utc::now()), None);
        assert_eq!(state.observe(summary(2, 0), Utc::now()), None);
    }
}
