//! Row selection bookkeeping.
//!
//! Selection is keyed by row identity, not position, so it survives paging
//! and sorting. Keys that disappear after a reload are dropped with
//! [`Selection::retain`].

use std::collections::BTreeSet;

/// State of the header "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// No visible row is selected.
    Unchecked,
    /// Some visible rows are selected.
    Partial,
    /// Every visible row is selected.
    Checked,
}

/// Set of selected row keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Ord> {
    keys: BTreeSet<K>,
}

impl<K: Ord> Default for Selection<K> {
    fn default() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }
}

impl<K: Ord + Clone> Selection<K> {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is selected.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Selects a key.
    pub fn select(&mut self, key: K) {
        self.keys.insert(key);
    }

    /// Deselects a key.
    pub fn deselect(&mut self, key: &K) {
        self.keys.remove(key);
    }

    /// Flips a key. Returns whether it is now selected.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Selects every key on the current page.
    pub fn select_page<'a, I>(&mut self, page_keys: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        self.keys.extend(page_keys.into_iter().cloned());
    }

    /// Header checkbox click.
    ///
    /// Selects the whole page unless it is already fully selected, in which
    /// case the page's keys are deselected. Selections on other pages are
    /// left alone.
    pub fn toggle_page(&mut self, page_keys: &[K]) {
        if self.page_state(page_keys) == CheckState::Checked {
            for key in page_keys {
                self.keys.remove(key);
            }
        } else {
            self.select_page(page_keys);
        }
    }

    /// Header checkbox state for the visible rows.
    #[must_use]
    pub fn page_state(&self, page_keys: &[K]) -> CheckState {
        let selected = page_keys.iter().filter(|k| self.keys.contains(k)).count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == page_keys.len() {
            CheckState::Checked
        } else {
            CheckState::Partial
        }
    }

    /// Keeps only keys still present in `available`.
    pub fn retain<'a, I>(&mut self, available: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let available: BTreeSet<&K> = available.into_iter().collect();
        self.keys.retain(|k| available.contains(k));
    }

    /// Number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over selected keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// Selected keys as an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<K> {
        self.keys.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut sel = Selection::new();
        assert!(sel.toggle(3));
        assert!(sel.contains(&3));
        assert!(!sel.toggle(3));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_page_state_transitions() {
        let page = [1, 2, 3];
        let mut sel = Selection::new();
        assert_eq!(sel.page_state(&page), CheckState::Unchecked);
        sel.select(2);
        assert_eq!(sel.page_state(&page), CheckState::Partial);
        sel.toggle_page(&page);
        assert_eq!(sel.page_state(&page), CheckState::Checked);
        sel.toggle_page(&page);
        assert_eq!(sel.page_state(&page), CheckState::Unchecked);
    }

    #[test]
    fn test_toggle_page_keeps_other_pages() {
        let mut sel = Selection::new();
        sel.select(10);
        sel.toggle_page(&[1, 2]);
        sel.toggle_page(&[1, 2]);
        assert_eq!(sel.to_vec(), vec![10]);
    }

    #[test]
    fn test_empty_page_is_unchecked() {
        let sel: Selection<u32> = Selection::new();
        assert_eq!(sel.page_state(&[]), CheckState::Unchecked);
    }

    #[test]
    fn test_retain_drops_missing_keys() {
        let mut sel = Selection::new();
        sel.select_page(&[1, 2, 3, 4]);
        sel.retain(&[2, 4, 6]);
        assert_eq!(sel.to_vec(), vec![2, 4]);
        assert_eq!(sel.len(), 2);
    }
}
