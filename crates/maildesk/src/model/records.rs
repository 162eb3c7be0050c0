//! State of the email records page.

use maildesk_core::dates::{day_bounds, parse_date_input};
use maildesk_core::table::Align;
use maildesk_core::{
    CheckState, ColumnDef, DeliveryStatus, EmailRecord, Page, RecordId, RecordQuery, SortDirection,
    SortKey, SortState, TableState,
};

use super::debounce::Debounce;

/// Column keys of the records table.
pub mod columns {
    pub const RECIPIENT: &str = "recipient";
    pub const SUBJECT: &str = "subject";
    pub const STATUS: &str = "status";
    pub const FILE: &str = "file";
    pub const CREATED: &str = "created_at";
    pub const RETRIES: &str = "retries";
}

fn record_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(columns::RECIPIENT, "Recipient", 4).sortable(),
        ColumnDef::new(columns::SUBJECT, "Subject", 5).sortable(),
        ColumnDef::new(columns::STATUS, "Status", 2).sortable(),
        ColumnDef::new(columns::FILE, "File", 3),
        ColumnDef::new(columns::CREATED, "Created", 3).sortable(),
        ColumnDef::new(columns::RETRIES, "Retries", 1).align(Align::End),
    ]
}

/// Records page state: the table, the active query and the filter inputs.
#[derive(Debug, Clone)]
pub struct RecordsState {
    pub table: TableState<RecordId>,
    pub query: RecordQuery,
    pub records: Vec<EmailRecord>,
    pub search_input: String,
    pub search_debounce: Debounce,
    pub from_input: String,
    pub to_input: String,
    pub date_error: Option<String>,
    /// Row whose error details are expanded.
    pub expanded: Option<RecordId>,
    /// A bulk delete is waiting for confirmation.
    pub confirm_delete: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl RecordsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            table: TableState::new(
                record_columns(),
                SortState::new(columns::CREATED, SortDirection::Descending),
                page_size,
            ),
            query: RecordQuery::with_page_size(page_size),
            records: Vec::new(),
            search_input: String::new(),
            search_debounce: Debounce::default(),
            from_input: String::new(),
            to_input: String::new(),
            date_error: None,
            expanded: None,
            confirm_delete: false,
            is_loading: false,
            error: None,
        }
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.table.pagination.page_size = page_size.max(1);
        self.query = RecordQuery {
            page_size: page_size.max(1),
            page: 1,
            ..self.query.clone()
        };
    }

    /// Keys of the rows on screen.
    pub fn visible_keys(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// State of the header checkbox.
    pub fn header_state(&self) -> CheckState {
        self.table.selection.page_state(&self.visible_keys())
    }

    /// Header checkbox click: selects the whole page unless it already is.
    pub fn toggle_all(&mut self) {
        let keys = self.visible_keys();
        self.table.selection.toggle_page(&keys);
    }

    pub fn toggle_row(&mut self, id: RecordId) {
        self.table.selection.toggle(id);
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.table.selection.to_vec()
    }

    /// Stores a loaded page.
    pub fn apply_page(&mut self, page: Page<EmailRecord>) {
        self.is_loading = false;
        self.error = None;
        self.query.page = page.page;
        self.table
            .apply_page(page.page, page.total, page.items.iter().map(|r| &r.id));
        if self
            .expanded
            .is_some_and(|id| !page.items.iter().any(|r| r.id == id))
        {
            self.expanded = None;
        }
        self.records = page.items;
    }

    /// Header click. Returns true if the query changed.
    pub fn sort_by(&mut self, column: &'static str) -> bool {
        if !self.table.sort_by(column) {
            return false;
        }
        let Some(key) = SortKey::from_column(self.table.sort.column) else {
            return false;
        };
        self.query = self
            .query
            .clone()
            .with_sort(key, self.table.sort.direction);
        true
    }

    pub fn set_status(&mut self, status: Option<DeliveryStatus>) {
        self.query = self.query.clone().with_status(status);
    }

    /// Applies the debounced search text.
    pub fn apply_search(&mut self) {
        self.query = self.query.clone().with_search(self.search_input.trim());
    }

    pub fn go_to_page(&mut self, page: usize) {
        let page = self.table.pagination.go_to(page);
        self.query = self.query.clone().with_page(page);
    }

    /// Parses the date inputs into the query range. Empty inputs clear the
    /// bound. The range is inclusive of both days.
    pub fn apply_dates(&mut self) -> Result<(), String> {
        let from = parse_bound(&self.from_input, "From")?.map(|d| day_bounds(d).0);
        let to = parse_bound(&self.to_input, "To")?.map(|d| day_bounds(d).1);
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            let message = "From date is after To date".to_string();
            self.date_error = Some(message.clone());
            return Err(message);
        }
        self.date_error = None;
        self.query = self.query.clone().with_range(from, to);
        Ok(())
    }

    /// Resets every filter.
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.from_input.clear();
        self.to_input.clear();
        self.date_error = None;
        self.query = RecordQuery::with_page_size(self.query.page_size).with_sort(
            self.query.sort,
            self.query.direction,
        );
    }

    /// Drops selected ids after a bulk delete.
    pub fn forget(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.table.selection.deselect(id);
        }
    }
}

fn parse_bound(input: &str, label: &str) -> Result<Option<chrono::NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    parse_date_input(input)
        .map(Some)
        .ok_or_else(|| format!("{label} date must be YYYY-MM-DD"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: u64) -> EmailRecord {
        EmailRecord {
            id: RecordId(id),
            recipient: format!("user{id}@example.com"),
            subject: "Report".into(),
            status: DeliveryStatus::Sent,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            sent_at: None,
            file_name: None,
            file_url: None,
            error_message: None,
            retry_count: 0,
        }
    }

    fn page(ids: &[u64], total: usize) -> Page<EmailRecord> {
        Page {
            items: ids.iter().map(|&id| record(id)).collect(),
            total,
            page: 1,
            page_size: 25,
        }
    }

    #[test]
    fn test_header_checkbox_cycle() {
        let mut state = RecordsState::new(25);
        state.apply_page(page(&[1, 2, 3], 3));
        assert_eq!(state.header_state(), CheckState::Unchecked);

        state.toggle_row(RecordId(2));
        assert_eq!(state.header_state(), CheckState::Partial);

        state.toggle_all();
        assert_eq!(state.header_state(), CheckState::Checked);
        assert_eq!(state.selected_ids().len(), 3);

        state.toggle_all();
        assert_eq!(state.header_state(), CheckState::Unchecked);
    }

    #[test]
    fn test_reload_drops_vanished_selection() {
        let mut state = RecordsState::new(25);
        state.apply_page(page(&[1, 2, 3], 3));
        state.toggle_all();
        state.apply_page(page(&[1, 3], 2));
        assert_eq!(state.selected_ids(), vec![RecordId(1), RecordId(3)]);
    }

    #[test]
    fn test_sort_maps_to_query() {
        let mut state = RecordsState::new(25);
        assert!(state.sort_by(columns::RECIPIENT));
        assert_eq!(state.query.sort, SortKey::Recipient);
        assert_eq!(state.query.direction, SortDirection::Ascending);
        assert!(!state.sort_by(columns::FILE));
    }

    #[test]
    fn test_date_range_validation() {
        let mut state = RecordsState::new(25);
        state.from_input = "2024-05-03".into();
        state.to_input = "2024-05-01".into();
        assert!(state.apply_dates().is_err());
        assert!(state.date_error.is_some());

        state.to_input = "2024-05-04".into();
        state.apply_dates().unwrap();
        assert!(state.query.from.is_some() && state.query.to.is_some());
        assert!(state.date_error.is_none());

        state.from_input = "yesterday".into();
        assert_eq!(state.apply_dates().unwrap_err(), "From date must be YYYY-MM-DD");
    }

    #[test]
    fn test_filters_return_to_first_page() {
        let mut state = RecordsState::new(10);
        state.table.pagination.set_total(100);
        state.go_to_page(4);
        assert_eq!(state.query.page, 4);
        state.set_status(Some(DeliveryStatus::Failed));
        assert_eq!(state.query.page, 1);
    }
}
