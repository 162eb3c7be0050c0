//! Command-driven editor over a [`Document`].

use thiserror::Error;
use tracing::debug;

use super::document::{Block, BlockKind, Document, Mark, Marks};

/// Maximum number of undo snapshots kept.
pub const HISTORY_LIMIT: usize = 100;

/// Link schemes accepted by [`Command::CreateLink`].
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// A cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    /// Block index.
    pub block: usize,
    /// Offset within the block, in chars.
    pub offset: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A selection between an anchor and a focus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: Position,
    /// Where the selection ends (the caret).
    pub focus: Position,
}

impl Selection {
    /// Creates a selection.
    #[must_use]
    pub const fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Creates a collapsed selection (a caret).
    #[must_use]
    pub const fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// Selects `start..end` within one block.
    #[must_use]
    pub const fn within(block: usize, start: usize, end: usize) -> Self {
        Self {
            anchor: Position::new(block, start),
            focus: Position::new(block, end),
        }
    }

    /// Returns true if anchor and focus coincide.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Returns `(start, end)` in document order.
    #[must_use]
    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }
}

/// Editing commands, modelled on `execCommand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle bold.
    ToggleBold,
    /// Toggle italic.
    ToggleItalic,
    /// Toggle underline.
    ToggleUnderline,
    /// Toggle strikethrough.
    ToggleStrike,
    /// Set the kind of every touched block.
    SetBlock(BlockKind),
    /// Link the selection, or insert a link at the caret.
    CreateLink(String),
    /// Remove links from the selection.
    Unlink,
    /// Clear inline formatting from the selection.
    RemoveFormat,
    /// Replace the selection with text.
    InsertText(String),
    /// Split the current block.
    InsertParagraph,
    /// Delete the selection, or the char before the caret.
    Delete,
    /// Select the whole document.
    SelectAll,
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,
}

impl Command {
    const fn toggled_mark(&self) -> Option<Mark> {
        match self {
            Self::ToggleBold => Some(Mark::Bold),
            Self::ToggleItalic => Some(Mark::Italic),
            Self::ToggleUnderline => Some(Mark::Underline),
            Self::ToggleStrike => Some(Mark::Strike),
            _ => None,
        }
    }
}

/// Errors returned by [`Editor`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    /// The link target is not an http, https or mailto URL.
    #[error("invalid link: {0}")]
    InvalidLink(String),

    /// A position points outside the document.
    #[error("selection out of range: block {block}, offset {offset}")]
    OutOfRange {
        /// Block index.
        block: usize,
        /// Offset within the block.
        offset: usize,
    },

    /// The referenced block does not exist.
    #[error("no block at index {0}")]
    NoSuchBlock(usize),
}

#[derive(Debug, Clone)]
struct Snapshot {
    document: Document,
    selection: Selection,
}

/// A document plus selection, pending marks and undo history.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    document: Document,
    selection: Selection,
    pending: Option<Marks>,
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl Editor {
    /// Creates an editor over a document with the caret at the start.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Parses HTML into a fresh editor.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        Self::new(Document::from_html(html))
    }

    /// The document being edited.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Replaces the document and clears history.
    pub fn load(&mut self, document: Document) {
        *self = Self::new(document);
    }

    /// Returns true if there is something to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns true if there is something to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Moves the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfRange`] if either end lies outside the
    /// document.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.check(selection.anchor)?;
        self.check(selection.focus)?;
        if selection != self.selection {
            self.pending = None;
        }
        self.selection = selection;
        Ok(())
    }

    fn check(&self, pos: Position) -> Result<(), EditorError> {
        if pos.block < self.document.block_count() && pos.offset <= self.document.block_len(pos.block)
        {
            Ok(())
        } else {
            Err(EditorError::OutOfRange {
                block: pos.block,
                offset: pos.offset,
            })
        }
    }

    /// Kind of the block holding the caret.
    #[must_use]
    pub fn current_block(&self) -> BlockKind {
        self.document
            .blocks
            .get(self.selection.focus.block)
            .map_or(BlockKind::Paragraph, |b| b.kind)
    }

    /// Returns true if the mark is active, like `queryCommandState`.
    ///
    /// For a caret this reflects pending marks, or the marks of the char
    /// before it. For a range every selected char must carry the mark.
    #[must_use]
    pub fn query(&self, mark: Mark) -> bool {
        if self.selection.is_collapsed() {
            return self.caret_marks().has(mark);
        }
        let ranges = self.ranges();
        let mut any = false;
        for &(block, start, end) in &ranges {
            if start == end {
                continue;
            }
            any = true;
            if !self.document.blocks[block].range_all(start, end, |m| m.has(mark)) {
                return false;
            }
        }
        any
    }

    /// Link target at the caret or over the selection start.
    #[must_use]
    pub fn current_link(&self) -> Option<String> {
        let (start, _) = self.selection.ordered();
        let block = self.document.blocks.get(start.block)?;
        let lookup = if self.selection.is_collapsed() {
            start.offset
        } else {
            start.offset + 1
        };
        block.marks_at(lookup.min(block.len())).link
    }

    /// Runs a command.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidLink`] for a link with an unsupported
    /// scheme.
    pub fn execute(&mut self, command: Command) -> Result<(), EditorError> {
        debug!(?command, "Editor command");
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            command => {
                let before = self.snapshot();
                let result = self.apply(command);
                // Commands that leave the text and marks alone take no history slot.
                if self.document != before.document {
                    self.remember(before);
                }
                return result;
            }
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<(), EditorError> {
        if let Some(mark) = command.toggled_mark() {
            self.toggle_mark(mark);
            return Ok(());
        }
        match command {
            Command::SetBlock(kind) => self.set_block(kind),
            Command::CreateLink(url) => self.create_link(&url)?,
            Command::Unlink => self.unlink(),
            Command::RemoveFormat => self.remove_format(),
            Command::InsertText(text) => self.insert_text(&text),
            Command::InsertParagraph => self.insert_paragraph(),
            Command::Delete => self.delete(),
            Command::SelectAll => {
                let last = self.document.block_count().saturating_sub(1);
                self.selection = Selection::new(
                    Position::default(),
                    Position::new(last, self.document.block_len(last)),
                );
                self.pending = None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Replaces the text of one block, keeping the marks of the unchanged
    /// prefix and suffix. The caret moves to the end of the changed region.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoSuchBlock`] if the block does not exist.
    pub fn replace_block_text(&mut self, index: usize, text: &str) -> Result<(), EditorError> {
        let block = self
            .document
            .blocks
            .get(index)
            .ok_or(EditorError::NoSuchBlock(index))?;
        let old: Vec<char> = block.text().chars().collect();
        let new: Vec<char> = text.chars().collect();
        if old == new {
            return Ok(());
        }

        let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let inserted: String = new[prefix..new.len() - suffix].iter().collect();
        let marks = self.pending.take().unwrap_or_else(|| {
            let mut marks = self.document.blocks[index].marks_at(prefix);
            if !self.inside_link(index, prefix) {
                marks.link = None;
            }
            marks
        });

        let before = self.snapshot();
        self.remember(before);
        let block = &mut self.document.blocks[index];
        block.delete_range(prefix, old.len() - suffix);
        block.insert_text(prefix, &inserted, marks);
        self.selection = Selection::caret(Position::new(index, new.len() - suffix));
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection: self.selection,
        }
    }

    fn remember(&mut self, snapshot: Snapshot) {
        self.undo.push(snapshot);
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    fn undo(&mut self) {
        if let Some(previous) = self.undo.pop() {
            self.redo.push(Snapshot {
                document: std::mem::replace(&mut self.document, previous.document),
                selection: std::mem::replace(&mut self.selection, previous.selection),
            });
            self.pending = None;
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.redo.pop() {
            self.undo.push(Snapshot {
                document: std::mem::replace(&mut self.document, next.document),
                selection: std::mem::replace(&mut self.selection, next.selection),
            });
            self.pending = None;
        }
    }

    /// Per-block `(block, start, end)` ranges covered by the selection.
    fn ranges(&self) -> Vec<(usize, usize, usize)> {
        let (start, end) = self.selection.ordered();
        (start.block..=end.block)
            .map(|block| {
                let from = if block == start.block { start.offset } else { 0 };
                let to = if block == end.block {
                    end.offset
                } else {
                    self.document.block_len(block)
                };
                (block, from, to)
            })
            .collect()
    }

    fn caret_marks(&self) -> Marks {
        if let Some(pending) = &self.pending {
            return pending.clone();
        }
        let focus = self.selection.focus;
        self.document
            .blocks
            .get(focus.block)
            .map(|b| b.marks_at(focus.offset))
            .unwrap_or_default()
    }

    fn inside_link(&self, block: usize, offset: usize) -> bool {
        let block = &self.document.blocks[block];
        if offset == 0 || offset >= block.len() {
            return false;
        }
        let before = block.marks_at(offset).link;
        before.is_some() && before == block.marks_at(offset + 1).link
    }

    fn map_selection(&mut self, mut f: impl FnMut(&mut Marks)) {
        for (block, start, end) in self.ranges() {
            self.document.blocks[block].map_range(start, end, &mut f);
        }
    }

    fn toggle_mark(&mut self, mark: Mark) {
        if self.selection.is_collapsed() {
            let mut marks = self.caret_marks();
            let on = !marks.has(mark);
            marks.set(mark, on);
            self.pending = Some(marks);
            return;
        }
        let on = !self.query(mark);
        self.map_selection(|m| m.set(mark, on));
    }

    fn set_block(&mut self, kind: BlockKind) {
        let (start, end) = self.selection.ordered();
        let touched = start.block..=end.block;
        let all_same = self.document.blocks[touched.clone()]
            .iter()
            .all(|b| b.kind == kind);
        let target = if all_same { BlockKind::Paragraph } else { kind };
        for block in &mut self.document.blocks[touched] {
            block.kind = target;
        }
    }

    fn create_link(&mut self, url: &str) -> Result<(), EditorError> {
        let url = url.trim();
        let valid = url::Url::parse(url)
            .is_ok_and(|parsed| LINK_SCHEMES.contains(&parsed.scheme()));
        if !valid {
            return Err(EditorError::InvalidLink(url.to_string()));
        }

        if self.selection.is_collapsed() {
            let mut marks = self.caret_marks();
            marks.link = Some(url.to_string());
            let caret = self.selection.focus;
            self.document.blocks[caret.block].insert_text(caret.offset, url, marks);
            self.selection = Selection::caret(Position::new(
                caret.block,
                caret.offset + url.chars().count(),
            ));
            self.pending = None;
        } else {
            let target = url.to_string();
            self.map_selection(|m| m.link = Some(target.clone()));
        }
        Ok(())
    }

    fn unlink(&mut self) {
        if !self.selection.is_collapsed() {
            self.map_selection(|m| m.link = None);
            return;
        }

        let caret = self.selection.focus;
        let block = &self.document.blocks[caret.block];
        let lookup = caret.offset.saturating_sub(1);
        let mut start = 0;
        let mut found = None;
        for span in &block.spans {
            let len = span.text.chars().count();
            if lookup < start + len {
                if span.marks.link.is_some() {
                    found = Some((start, start + len));
                }
                break;
            }
            start += len;
        }
        if let Some((from, to)) = found {
            self.document.blocks[caret.block].map_range(from, to, |m| m.link = None);
        }
    }

    fn remove_format(&mut self) {
        if self.selection.is_collapsed() {
            self.pending = None;
            return;
        }
        self.map_selection(Marks::clear_formatting);
    }

    /// Deletes the selected range, leaving a caret at its start.
    fn delete_selection(&mut self) {
        let (start, end) = self.selection.ordered();
        if start.block == end.block {
            self.document.blocks[start.block].delete_range(start.offset, end.offset);
        } else {
            let first_len = self.document.block_len(start.block);
            self.document.blocks[start.block].delete_range(start.offset, first_len);
            let mut tail = self.document.blocks[end.block].clone();
            tail.delete_range(0, end.offset);
            self.document.blocks[start.block].append(tail);
            self.document.blocks.drain(start.block + 1..=end.block);
        }
        self.selection = Selection::caret(start);
    }

    fn insert_text(&mut self, text: &str) {
        if !self.selection.is_collapsed() {
            let marks = self.pending.take();
            self.delete_selection();
            self.pending = marks;
        }
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.insert_paragraph();
            }
            self.insert_line(line);
        }
    }

    fn insert_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let caret = self.selection.focus;
        let marks = self.pending.take().unwrap_or_else(|| {
            let mut marks = self.document.blocks[caret.block].marks_at(caret.offset);
            if !self.inside_link(caret.block, caret.offset) {
                marks.link = None;
            }
            marks
        });
        self.document.blocks[caret.block].insert_text(caret.offset, line, marks);
        self.selection = Selection::caret(Position::new(
            caret.block,
            caret.offset + line.chars().count(),
        ));
    }

    fn insert_paragraph(&mut self) {
        if !self.selection.is_collapsed() {
            self.delete_selection();
        }
        let caret = self.selection.focus;
        let block = &mut self.document.blocks[caret.block];

        // Enter on an empty list item leaves the list.
        if block.is_empty() && block.kind.is_list() {
            block.kind = BlockKind::Paragraph;
            return;
        }

        let tail: Block = block.split_off(caret.offset);
        self.document.blocks.insert(caret.block + 1, tail);
        self.selection = Selection::caret(Position::new(caret.block + 1, 0));
    }

    fn delete(&mut self) {
        if !self.selection.is_collapsed() {
            self.delete_selection();
            return;
        }

        let caret = self.selection.focus;
        if caret.offset > 0 {
            self.document.blocks[caret.block].delete_range(caret.offset - 1, caret.offset);
            self.selection = Selection::caret(Position::new(caret.block, caret.offset - 1));
        } else if caret.block > 0 {
            let block = self.document.blocks.remove(caret.block);
            let previous = caret.block - 1;
            let joint = self.document.block_len(previous);
            self.document.blocks[previous].append(block);
            self.selection = Selection::caret(Position::new(previous, joint));
        } else if self.document.blocks[0].kind != BlockKind::Paragraph {
            self.document.blocks[0].kind = BlockKind::Paragraph;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::template::document::Span;

    fn editor(text: &str) -> Editor {
        Editor::new(Document::from_plain_text(text))
    }

    #[test]
    fn test_toggle_bold_on_range() {
        let mut ed = editor("Hello world");
        ed.set_selection(Selection::within(0, 0, 5)).unwrap();
        ed.execute(Command::ToggleBold).unwrap();
        assert!(ed.query(Mark::Bold));
        assert_eq!(ed.document().blocks[0].spans[0].text, "Hello");

        ed.execute(Command::ToggleBold).unwrap();
        assert!(!ed.query(Mark::Bold));
        assert_eq!(ed.document().blocks[0].spans.len(), 1);
    }

    #[test]
    fn test_partial_selection_applies_everywhere() {
        let mut ed = editor("Hello world");
        ed.set_selection(Selection::within(0, 0, 5)).unwrap();
        ed.execute(Command::ToggleItalic).unwrap();
        ed.set_selection(Selection::within(0, 0, 11)).unwrap();
        assert!(!ed.query(Mark::Italic));
        ed.execute(Command::ToggleItalic).unwrap();
        assert!(ed.query(Mark::Italic));
        assert_eq!(ed.document().blocks[0].spans.len(), 1);
    }

    #[test]
    fn test_caret_toggle_sets_pending_marks() {
        let mut ed = editor("Hi");
        ed.set_selection(Selection::caret(Position::new(0, 2))).unwrap();
        ed.execute(Command::ToggleBold).unwrap();
        assert!(ed.query(Mark::Bold));
        ed.execute(Command::InsertText(" there".into())).unwrap();
        let spans = &ed.document().blocks[0].spans;
        assert_eq!(spans.len(), 2);
        assert!(spans[1].marks.bold);
        assert_eq!(ed.selection().focus, Position::new(0, 8));
    }

    #[test]
    fn test_set_block_toggles_back_to_paragraph() {
        let mut ed = editor("one\ntwo");
        ed.set_selection(Selection::new(Position::new(0, 1), Position::new(1, 1)))
            .unwrap();
        ed.execute(Command::SetBlock(BlockKind::BulletItem)).unwrap();
        assert!(ed.document().blocks.iter().all(|b| b.kind == BlockKind::BulletItem));
        ed.execute(Command::SetBlock(BlockKind::BulletItem)).unwrap();
        assert!(ed.document().blocks.iter().all(|b| b.kind == BlockKind::Paragraph));
    }

    #[test]
    fn test_create_link_validates_scheme() {
        let mut ed = editor("docs");
        ed.set_selection(Selection::within(0, 0, 4)).unwrap();
        assert_eq!(
            ed.execute(Command::CreateLink("javascript:alert(1)".into())),
            Err(EditorError::InvalidLink("javascript:alert(1)".into()))
        );
        ed.execute(Command::CreateLink("https://example.com".into())).unwrap();
        assert_eq!(ed.current_link().as_deref(), Some("https://example.com"));
        assert!(ed.query(Mark::Link));

        ed.set_selection(Selection::caret(Position::new(0, 2))).unwrap();
        ed.execute(Command::Unlink).unwrap();
        assert!(!ed.document().blocks[0].spans[0].marks.has(Mark::Link));
    }

    #[test]
    fn test_create_link_at_caret_inserts_url() {
        let mut ed = editor("See ");
        ed.set_selection(Selection::caret(Position::new(0, 4))).unwrap();
        ed.execute(Command::CreateLink("mailto:ops@example.com".into()))
            .unwrap();
        let block = &ed.document().blocks[0];
        assert_eq!(block.text(), "See mailto:ops@example.com");
        assert_eq!(block.spans[1].marks.link.as_deref(), Some("mailto:ops@example.com"));
    }

    #[test]
    fn test_typing_after_link_is_not_linked() {
        let mut ed = editor("");
        ed.execute(Command::CreateLink("https://a.io".into())).unwrap();
        ed.execute(Command::InsertText(" end".into())).unwrap();
        let spans = &ed.document().blocks[0].spans;
        assert_eq!(spans.len(), 2);
        assert!(spans[1].marks.link.is_none());
    }

    #[test]
    fn test_remove_format_keeps_links() {
        let mut ed = Editor::new(Document::from_blocks(vec![Block::with_spans(
            BlockKind::Paragraph,
            vec![Span::new(
                "x",
                Marks {
                    bold: true,
                    link: Some("https://a.io".into()),
                    ..Marks::default()
                },
            )],
        )]));
        ed.execute(Command::SelectAll).unwrap();
        ed.execute(Command::RemoveFormat).unwrap();
        let marks = &ed.document().blocks[0].spans[0].marks;
        assert!(!marks.bold);
        assert!(marks.link.is_some());
    }

    #[test]
    fn test_insert_paragraph_and_delete_merge() {
        let mut ed = editor("HelloWorld");
        ed.set_selection(Selection::caret(Position::new(0, 5))).unwrap();
        ed.execute(Command::InsertParagraph).unwrap();
        assert_eq!(ed.document().block_count(), 2);
        assert_eq!(ed.selection().focus, Position::new(1, 0));

        ed.execute(Command::Delete).unwrap();
        assert_eq!(ed.document().block_count(), 1);
        assert_eq!(ed.document().blocks[0].text(), "HelloWorld");
        assert_eq!(ed.selection().focus, Position::new(0, 5));
    }

    #[test]
    fn test_enter_on_empty_list_item_exits_list() {
        let mut ed = editor("item");
        ed.execute(Command::SetBlock(BlockKind::BulletItem)).unwrap();
        ed.set_selection(Selection::caret(Position::new(0, 4))).unwrap();
        ed.execute(Command::InsertParagraph).unwrap();
        assert_eq!(ed.current_block(), BlockKind::BulletItem);
        ed.execute(Command::InsertParagraph).unwrap();
        assert_eq!(ed.current_block(), BlockKind::Paragraph);
        assert_eq!(ed.document().block_count(), 2);
    }

    #[test]
    fn test_delete_across_blocks() {
        let mut ed = editor("abc\ndef\nghi");
        ed.set_selection(Selection::new(Position::new(2, 1), Position::new(0, 1)))
            .unwrap();
        ed.execute(Command::Delete).unwrap();
        assert_eq!(ed.document().block_count(), 1);
        assert_eq!(ed.document().blocks[0].text(), "ahi");
    }

    #[test]
    fn test_insert_text_with_newlines() {
        let mut ed = editor("");
        ed.execute(Command::InsertText("a\nb".into())).unwrap();
        assert_eq!(ed.document().block_count(), 2);
        assert_eq!(ed.selection().focus, Position::new(1, 1));
    }

    #[test]
    fn test_undo_redo() {
        let mut ed = editor("abc");
        ed.execute(Command::SelectAll).unwrap();
        ed.execute(Command::ToggleUnderline).unwrap();
        ed.execute(Command::Undo).unwrap();
        assert!(!ed.query(Mark::Underline));
        assert!(ed.can_redo());
        ed.execute(Command::Redo).unwrap();
        assert!(ed.query(Mark::Underline));
        assert!(!ed.can_redo());
    }

    #[test]
    fn test_no_op_commands_leave_history_alone() {
        let mut ed = editor("abc");
        ed.execute(Command::InsertText(String::new())).unwrap();
        ed.execute(Command::SelectAll).unwrap();
        ed.execute(Command::Unlink).unwrap();
        ed.execute(Command::RemoveFormat).unwrap();
        assert!(!ed.can_undo());

        ed.execute(Command::ToggleBold).unwrap();
        ed.set_selection(Selection::caret(Position::new(0, 3))).unwrap();
        ed.execute(Command::InsertText(String::new())).unwrap();
        ed.execute(Command::Undo).unwrap();
        assert!(!ed.query(Mark::Bold));
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_toggle_over_empty_range_takes_no_slot() {
        let mut ed = editor("ab\ncd");
        ed.set_selection(Selection::new(Position::new(0, 2), Position::new(1, 0)))
            .unwrap();
        ed.execute(Command::ToggleBold).unwrap();
        assert!(!ed.can_undo());
        assert_eq!(ed.document(), &Document::from_plain_text("ab\ncd"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut ed = editor("");
        for _ in 0..(HISTORY_LIMIT + 20) {
            ed.execute(Command::InsertText("x".into())).unwrap();
        }
        let mut undone = 0;
        while ed.can_undo() {
            ed.execute(Command::Undo).unwrap();
            undone += 1;
        }
        assert_eq!(undone, HISTORY_LIMIT);
        assert_eq!(ed.document().blocks[0].len(), 20);
    }

    #[test]
    fn test_replace_block_text_keeps_marks() {
        let mut ed = editor("Hello world");
        ed.set_selection(Selection::within(0, 6, 11)).unwrap();
        ed.execute(Command::ToggleBold).unwrap();
        ed.replace_block_text(0, "Hi world").unwrap();
        assert_eq!(ed.selection().focus, Position::new(0, 2));
        ed.replace_block_text(0, "Hi world!").unwrap();
        let block = &ed.document().blocks[0];
        assert_eq!(block.text(), "Hi world!");
        assert_eq!(block.spans[0].text, "Hi ");
        assert!(block.spans[1].marks.bold);
        assert_eq!(block.spans[1].text, "world!");
        assert_eq!(ed.selection().focus, Position::new(0, 9));
        assert_eq!(ed.replace_block_text(4, "x"), Err(EditorError::NoSuchBlock(4)));
    }

    #[test]
    fn test_selection_out_of_range() {
        let mut ed = editor("ab");
        assert!(ed.set_selection(Selection::caret(Position::new(0, 3))).is_err());
        assert!(ed.set_selection(Selection::caret(Position::new(1, 0))).is_err());
    }
}
