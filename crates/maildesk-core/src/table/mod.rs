//! Generic table state: columns, sorting, pagination and row selection.
//!
//! The GUI renders header, body, rows, cells and the pagination control from
//! this state; nothing here knows about the row type beyond its key.

mod column;
mod pagination;
mod selection;

pub use column::{Align, ColumnDef, SortDirection, SortState};
pub use pagination::{PageSlot, Pagination};
pub use selection::{CheckState, Selection};

/// Combined state of one table instance.
#[derive(Debug, Clone)]
pub struct TableState<K: Ord> {
    /// Column layout.
    pub columns: Vec<ColumnDef>,
    /// Current sort.
    pub sort: SortState,
    /// Pagination.
    pub pagination: Pagination,
    /// Selected rows.
    pub selection: Selection<K>,
}

impl<K: Ord + Clone> TableState<K> {
    /// Creates table state with the given columns and initial sort.
    #[must_use]
    pub fn new(columns: Vec<ColumnDef>, sort: SortState, page_size: usize) -> Self {
        Self {
            columns,
            sort,
            pagination: Pagination::new(page_size),
            selection: Selection::new(),
        }
    }

    /// Handles a header click. Returns false for non-sortable columns.
    ///
    /// Sorting returns to the first page.
    pub fn sort_by(&mut self, column: &'static str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == column && c.sortable);
        if sortable {
            self.sort.toggle(column);
            self.pagination.page = 1;
        }
        sortable
    }

    /// Applies a freshly loaded page: updates totals and, when the whole
    /// result fits on one page, drops selected keys that no longer exist.
    pub fn apply_page<'a, I>(&mut self, page: usize, total: usize, visible_keys: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        self.pagination.page = page;
        self.pagination.set_total(total);
        if total == 0 {
            self.selection.clear();
        } else if self.pagination.total_pages() == 1 {
            // Everything is visible, so anything not shown is gone.
            self.selection.retain(visible_keys);
        }
    }

    /// Sum of column width portions.
    #[must_use]
    pub fn total_width(&self) -> u16 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableState<u64> {
        TableState::new(
            vec![
                ColumnDef::new("recipient", "Recipient", 3).sortable(),
                ColumnDef::new("file", "File", 2),
            ],
            SortState::new("recipient", SortDirection::Ascending),
            10,
        )
    }

    #[test]
    fn test_sort_by_ignores_unsortable_columns() {
        let mut t = table();
        t.pagination.page = 3;
        assert!(!t.sort_by("file"));
        assert_eq!(t.pagination.page, 3);
        assert!(t.sort_by("recipient"));
        assert_eq!(t.sort.direction, SortDirection::Descending);
        assert_eq!(t.pagination.page, 1);
    }

    #[test]
    fn test_apply_page_single_page_prunes_selection() {
        let mut t = table();
        t.selection.select_page(&[1, 2, 3]);
        t.apply_page(1, 2, &[1, 3]);
        assert_eq!(t.selection.to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_apply_page_multi_page_keeps_selection() {
        let mut t = table();
        t.selection.select_page(&[1, 99]);
        t.apply_page(2, 35, &[11, 12]);
        assert_eq!(t.selection.len(), 2);
        assert_eq!(t.pagination.page, 2);
    }

    #[test]
    fn test_apply_empty_page_clears_selection() {
        let mut t = table();
        t.selection.select(4);
        t.apply_page(1, 0, &[]);
        assert!(t.selection.is_empty());
        assert_eq!(t.total_width(), 5);
    }
}
