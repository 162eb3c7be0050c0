//! Pagination state and the page-button window.

/// An entry in the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// A page button (1-based).
    Page(usize),
    /// A gap between page buttons.
    Ellipsis,
}

/// Maximum number of pages shown without gaps.
const MAX_CONTIGUOUS: usize = 7;

/// Pagination over a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-based).
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Total rows across all pages.
    pub total: usize,
}

impl Pagination {
    /// Creates pagination positioned on the first page.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            total: 0,
        }
    }

    /// Number of pages, never less than one.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        crate::records::total_pages(self.total, self.page_size)
    }

    /// Whether a following page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Advances one page if possible. Returns the new page.
    pub fn next(&mut self) -> usize {
        if self.has_next() {
            self.page += 1;
        }
        self.page
    }

    /// Goes back one page if possible. Returns the new page.
    pub const fn previous(&mut self) -> usize {
        if self.has_previous() {
            self.page -= 1;
        }
        self.page
    }

    /// Jumps to a page, clamped to the valid range. Returns the new page.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    /// Updates the total after a reload, keeping the page in range.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.clamp(1, self.total_pages());
    }

    /// Human-readable row range, e.g. `26–50 of 310`.
    #[must_use]
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "0 of 0".to_string();
        }
        if self.page_size == 0 {
            return format!("1\u{2013}{total} of {total}", total = self.total);
        }
        let page = self.page.clamp(1, self.total_pages());
        let start = (page - 1) * self.page_size + 1;
        let end = (page * self.page_size).min(self.total);
        format!("{start}\u{2013}{end} of {}", self.total)
    }

    /// Page buttons to render.
    ///
    /// Up to seven pages are listed directly. Beyond that the first and last
    /// pages are always shown with a window around the current page, and
    /// gaps become [`PageSlot::Ellipsis`].
    #[must_use]
    pub fn slots(&self) -> Vec<PageSlot> {
        let total = self.total_pages();
        let current = self.page.clamp(1, total);

        if total <= MAX_CONTIGUOUS {
            return (1..=total).map(PageSlot::Page).collect();
        }

        let (start, end) = if current <= 3 {
            (2, 5)
        } else if current + 2 >= total {
            (total.saturating_sub(4).max(2), total - 1)
        } else {
            (current - 2, current + 2)
        };

        let mut slots = Vec::with_capacity(MAX_CONTIGUOUS + 2);
        slots.push(PageSlot::Page(1));
        if start > 2 {
            slots.push(PageSlot::Ellipsis);
        }
        slots.extend((start..=end).map(PageSlot::Page));
        if end < total - 1 {
            slots.push(PageSlot::Ellipsis);
        }
        slots.push(PageSlot::Page(total));
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageSlot::{Ellipsis, Page};

    fn pagination(page: usize, total_pages: usize) -> Pagination {
        Pagination {
            page,
            page_size: 10,
            total: total_pages * 10,
        }
    }

    #[test]
    fn test_small_page_counts_list_everything() {
        assert_eq!(pagination(1, 1).slots(), vec![Page(1)]);
        assert_eq!(
            pagination(4, 7).slots(),
            (1..=7).map(Page).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_window_near_start() {
        assert_eq!(
            pagination(2, 20).slots(),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_window_in_middle() {
        assert_eq!(
            pagination(10, 20).slots(),
            vec![
                Page(1),
                Ellipsis,
                Page(8),
                Page(9),
                Page(10),
                Page(11),
                Page(12),
                Ellipsis,
                Page(20)
            ]
        );
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(
            pagination(19, 20).slots(),
            vec![Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut p = pagination(1, 3);
        assert!(!p.has_previous());
        assert_eq!(p.previous(), 1);
        assert_eq!(p.next(), 2);
        assert_eq!(p.next(), 3);
        assert_eq!(p.next(), 3);
        assert_eq!(p.go_to(0), 1);
        assert_eq!(p.go_to(42), 3);
    }

    #[test]
    fn test_range_label_handles_odd_state() {
        assert_eq!(pagination(2, 5).range_label(), "11\u{2013}20 of 50");
        let r#unsized = Pagination {
            page: 1,
            page_size: 0,
            total: 12,
        };
        assert_eq!(r#unsized.total_pages(), 1);
        assert_eq!(r#unsized.range_label(), "1\u{2013}12 of 12");
        let stale = Pagination {
            page: 9,
            page_size: 10,
            total: 25,
        };
        assert_eq!(stale.range_label(), "21\u{2013}25 of 25");
        assert_eq!(Pagination::new(25).range_label(), "0 of 0");
    }

    #[test]
    fn test_set_total_keeps_page_in_range() {
        let mut p = pagination(5, 5);
        p.set_total(12);
        assert_eq!(p.page, 2);
    }

    #[test]
    fn test_range_label() {
        let p = Pagination {
            page: 2,
            page_size: 25,
            total: 310,
        };
        assert_eq!(p.range_label(), "26\u{2013}50 of 310");
        let last = Pagination {
            page: 13,
            page_size: 25,
            total: 310,
        };
        assert_eq!(last.range_label(), "301\u{2013}310 of 310");
        assert_eq!(Pagination::new(25).range_label(), "0 of 0");
    }
}
