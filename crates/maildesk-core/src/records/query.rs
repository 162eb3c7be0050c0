//! Record queries: filtering, sorting and paging.
//!
//! The same query is sent to the backend as URL parameters and evaluated
//! client-side by the mock backend, so both paths agree on semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{DeliveryStatus, EmailRecord};
use crate::table::SortDirection;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Column a record listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Recipient address.
    Recipient,
    /// Subject line.
    Subject,
    /// Delivery status.
    Status,
}

impl SortKey {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Recipient => "recipient",
            Self::Subject => "subject",
            Self::Status => "status",
        }
    }

    /// Maps a table column key back to a sort key.
    #[must_use]
    pub fn from_column(key: &str) -> Option<Self> {
        match key {
            "created_at" => Some(Self::CreatedAt),
            "recipient" => Some(Self::Recipient),
            "subject" => Some(Self::Subject),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Creates an empty first page.
    #[must_use]
    pub const fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size,
        }
    }

    /// Number of pages, never less than one.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }
}

/// Number of pages needed for `total` items, never less than one.
#[must_use]
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Filter, sort and page parameters for listing records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Only records with this status.
    pub status: Option<DeliveryStatus>,
    /// Free-text search over recipient, subject and file name.
    pub search: String,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Sort column.
    pub sort: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            status: None,
            search: String::new(),
            from: None,
            to: None,
            sort: SortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl RecordQuery {
    /// Creates a query with the given page size.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Sets the status filter and returns to the first page.
    #[must_use]
    pub fn with_status(mut self, status: Option<DeliveryStatus>) -> Self {
        self.status = status;
        self.page = 1;
        self
    }

    /// Sets the search text and returns to the first page.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    /// Sets the date range and returns to the first page.
    #[must_use]
    pub const fn with_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self.page = 1;
        self
    }

    /// Sets the sort order and returns to the first page.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self.page = 1;
        self
    }

    /// Moves to another page. Values below one clamp to the first page.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Returns true if any filter narrows the result set.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.status.is_some()
            || !self.search.trim().is_empty()
            || self.from.is_some()
            || self.to.is_some()
    }

    /// Builds the URL query parameters understood by the backend.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("order", self.direction.as_str().to_string()),
        ];
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_rfc3339()));
        }
        pairs
    }

    /// Returns true if a record passes every filter of this query.
    #[must_use]
    pub fn matches(&self, record: &EmailRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.from.is_some_and(|from| record.created_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.created_at > to) {
            return false;
        }
        record.matches_search(&self.search.trim().to_lowercase())
    }

    /// Filters, sorts and pages records client-side.
    ///
    /// A page past the end clamps to the last page.
    #[must_use]
    pub fn apply(&self, records: &[EmailRecord]) -> Page<EmailRecord> {
        let mut matching: Vec<&EmailRecord> = records.iter().filter(|r| self.matches(r)).collect();

        matching.sort_by(|a, b| {
            let ordering = match self.sort {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::Recipient => a.recipient.to_lowercase().cmp(&b.recipient.to_lowercase()),
                SortKey::Subject => a.subject.to_lowercase().cmp(&b.subject.to_lowercase()),
                SortKey::Status => a.status.cmp(&b.status),
            }
            .then_with(|| a.id.cmp(&b.id));
            self.direction.apply(ordering)
        });

        let page_size = self.page_size.max(1);
        let total = matching.len();
        let page = self.page.clamp(1, total_pages(total, page_size));
        let items = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dates::parse_timestamp;
    use crate::records::RecordId;

    fn record(id: u64, recipient: &str, status: DeliveryStatus, created: &str) -> EmailRecord {
        EmailRecord {
            id: RecordId(id),
            recipient: recipient.to_string(),
            subject: format!("Subject {id}"),
            status,
            created_at: parse_timestamp(created).unwrap(),
            sent_at: None,
            file_name: None,
            file_url: None,
            error_message: None,
            retry_count: 0,
        }
    }

    fn sample() -> Vec<EmailRecord> {
        vec![
            record(1, "alice@example.com", DeliveryStatus::Sent, "2024-05-01T08:00:00Z"),
            record(2, "bob@example.com", DeliveryStatus::Failed, "2024-05-02T08:00:00Z"),
            record(3, "carol@example.com", DeliveryStatus::Sent, "2024-05-03T08:00:00Z"),
            record(4, "dave@example.com", DeliveryStatus::Bounced, "2024-05-04T08:00:00Z"),
            record(5, "erin@example.com", DeliveryStatus::Delivered, "2024-05-05T08:00:00Z"),
        ]
    }

    #[test]
    fn test_default_sorts_newest_first() {
        let page = RecordQuery::default().apply(&sample());
        let ids: Vec<u64> = page.items.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_status_filter() {
        let page = RecordQuery::default()
            .with_status(Some(DeliveryStatus::Sent))
            .apply(&sample());
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|r| r.status == DeliveryStatus::Sent));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let page = RecordQuery::default().with_search("  CAROL ").apply(&sample());
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, RecordId(3));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let from = parse_timestamp("2024-05-02T08:00:00Z");
        let to = parse_timestamp("2024-05-04T08:00:00Z");
        let page = RecordQuery::default().with_range(from, to).apply(&sample());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_paging_and_clamping() {
        let mut query = RecordQuery::with_page_size(2).with_sort(SortKey::Recipient, SortDirection::Ascending);
        query = query.with_page(2);
        let page = query.apply(&sample());
        let names: Vec<&str> = page.items.iter().map(|r| r.recipient.as_str()).collect();
        assert_eq!(names, vec!["carol@example.com", "dave@example.com"]);
        assert_eq!(page.total_pages(), 3);

        let past_end = query.with_page(99).apply(&sample());
        assert_eq!(past_end.page, 3);
        assert_eq!(past_end.items.len(), 1);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let query = RecordQuery::default().with_page(4).with_search("bob");
        assert_eq!(query.page, 1);
        assert!(query.is_filtered());
    }

    #[test]
    fn test_query_pairs() {
        let query = RecordQuery::default()
            .with_status(Some(DeliveryStatus::Failed))
            .with_search(" invoice ");
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("status", "failed".to_string())));
        assert!(pairs.contains(&("search", "invoice".to_string())));
        assert!(pairs.contains(&("order", "desc".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "from"));
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page = RecordQuery::default().with_search("nobody").apply(&sample());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages(), 1);
    }
}
