//! Column definitions and sort state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left aligned.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Right aligned.
    End,
}

/// Static description of a table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Stable key, also used as the sort key.
    pub key: &'static str,
    /// Header label.
    pub label: &'static str,
    /// Relative width (fill portion).
    pub width: u16,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Cell alignment.
    pub align: Align,
}

impl ColumnDef {
    /// Creates a non-sortable, left-aligned column.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str, width: u16) -> Self {
        Self {
            key,
            label,
            width,
            sortable: false,
            align: Align::Start,
        }
    }

    /// Marks the column sortable.
    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sets the alignment.
    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Header arrow glyph.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "\u{25B2}",
            Self::Descending => "\u{25BC}",
        }
    }
}

/// Current sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// Column key.
    pub column: &'static str,
    /// Direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Creates a sort state.
    #[must_use]
    pub const fn new(column: &'static str, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Handles a header click.
    ///
    /// The same column flips direction; a new column starts ascending.
    pub fn toggle(&mut self, column: &'static str) {
        if self.column == column {
            self.direction = self.direction.reversed();
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Returns the direction if `column` is the sorted one.
    #[must_use]
    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        (self.column == column).then_some(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_column_flips() {
        let mut sort = SortState::new("created_at", SortDirection::Descending);
        sort.toggle("created_at");
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.toggle("created_at");
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_toggle_new_column_starts_ascending() {
        let mut sort = SortState::new("created_at", SortDirection::Descending);
        sort.toggle("recipient");
        assert_eq!(sort.column, "recipient");
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(sort.direction_for("created_at"), None);
        assert_eq!(sort.direction_for("recipient"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
    }
}
