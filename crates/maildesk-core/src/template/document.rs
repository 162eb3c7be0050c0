//! Rich-text document model.
//!
//! A document is a list of blocks; each block is a list of spans carrying
//! inline marks. Offsets are counted in `char`s. After every mutation a block
//! is normalized: empty spans are dropped and neighbours with equal marks
//! are merged, so two documents with the same content compare equal.

use serde::{Deserialize, Serialize};

/// An inline formatting mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Underlined text.
    Underline,
    /// Struck-through text.
    Strike,
    /// Hyperlink.
    Link,
}

/// The set of marks applied to a span.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Marks {
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
    /// Strikethrough.
    pub strike: bool,
    /// Link target.
    pub link: Option<String>,
}

impl Marks {
    /// Returns true if the mark is present.
    #[must_use]
    pub const fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strike => self.strike,
            Mark::Link => self.link.is_some(),
        }
    }

    /// Sets or clears a boolean mark. Setting [`Mark::Link`] is a no-op;
    /// clearing it removes the link.
    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
            Mark::Strike => self.strike = on,
            Mark::Link => {
                if !on {
                    self.link = None;
                }
            }
        }
    }

    /// Clears bold, italic, underline and strike. Links survive.
    pub const fn clear_formatting(&mut self) {
        self.bold = false;
        self.italic = false;
        self.underline = false;
        self.strike = false;
    }

    /// Returns true if no mark is set.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline && !self.strike && self.link.is_none()
    }
}

/// A run of text sharing the same marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Text content.
    pub text: String,
    /// Marks applied to the whole run.
    pub marks: Marks,
}

impl Span {
    /// Creates an unformatted span.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    /// Creates a span with marks.
    #[must_use]
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Block-level formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockKind {
    /// Normal paragraph.
    #[default]
    Paragraph,
    /// Heading level 1 to 3.
    Heading(u8),
    /// Item of a bulleted list.
    BulletItem,
    /// Item of a numbered list.
    NumberedItem,
    /// Block quote.
    Quote,
}

impl BlockKind {
    /// Clamps heading levels into 1..=3.
    #[must_use]
    pub fn heading(level: u8) -> Self {
        Self::Heading(level.clamp(1, 3))
    }

    /// Short toolbar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paragraph => "P",
            Self::Heading(1) => "H1",
            Self::Heading(2) => "H2",
            Self::Heading(_) => "H3",
            Self::BulletItem => "\u{2022} List",
            Self::NumberedItem => "1. List",
            Self::Quote => "\u{201C} Quote",
        }
    }

    /// Kind of the block created when the user presses Enter at the end of
    /// a block of this kind.
    #[must_use]
    pub const fn continuation(self) -> Self {
        match self {
            Self::Heading(_) => Self::Paragraph,
            other => other,
        }
    }

    /// Returns true for list items.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::BulletItem | Self::NumberedItem)
    }
}

/// A block of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Block formatting.
    pub kind: BlockKind,
    /// Inline runs.
    pub spans: Vec<Span>,
}

impl Block {
    /// Creates an empty block.
    #[must_use]
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    /// Creates a block from spans and normalizes it.
    #[must_use]
    pub fn with_spans(kind: BlockKind, spans: Vec<Span>) -> Self {
        let mut block = Self { kind, spans };
        block.normalize();
        block
    }

    /// Creates a paragraph holding plain text.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::with_spans(BlockKind::Paragraph, vec![Span::plain(text)])
    }

    /// Concatenated text of all spans.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.iter().map(Span::char_len).sum()
    }

    /// Returns true if the block has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    /// Drops empty spans and merges neighbours with equal marks.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            if span.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.marks == span.marks => last.text.push_str(&span.text),
                _ => merged.push(span),
            }
        }
        self.spans = merged;
    }

    /// Ensures a span boundary at `offset` and returns the index of the first
    /// span starting at or after it.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for index in 0..self.spans.len() {
            let len = self.spans[index].char_len();
            if offset == start {
                return index;
            }
            if offset < start + len {
                let local = byte_index(&self.spans[index].text, offset - start);
                let tail = self.spans[index].text.split_off(local);
                let marks = self.spans[index].marks.clone();
                self.spans.insert(index + 1, Span::new(tail, marks));
                return index + 1;
            }
            start += len;
        }
        self.spans.len()
    }

    /// Marks in effect at a cursor position.
    ///
    /// Uses the character before the cursor, or the first character when the
    /// cursor is at the start.
    #[must_use]
    pub fn marks_at(&self, offset: usize) -> Marks {
        let lookup = offset.saturating_sub(1);
        let mut start = 0;
        for span in &self.spans {
            let len = span.char_len();
            if lookup < start + len {
                return span.marks.clone();
            }
            start += len;
        }
        self.spans
            .last()
            .map(|s| s.marks.clone())
            .unwrap_or_default()
    }

    /// Returns true if every char in `start..end` satisfies `pred`.
    ///
    /// An empty range yields false.
    #[must_use]
    pub fn range_all(&self, start: usize, end: usize, pred: impl Fn(&Marks) -> bool) -> bool {
        if start >= end {
            return false;
        }
        let mut pos = 0;
        for span in &self.spans {
            let len = span.char_len();
            let overlaps = pos < end && pos + len > start;
            if overlaps && !pred(&span.marks) {
                return false;
            }
            pos += len;
        }
        true
    }

    /// Applies `f` to the marks of every char in `start..end`.
    pub fn map_range(&mut self, start: usize, end: usize, mut f: impl FnMut(&mut Marks)) {
        let end = end.min(self.len());
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for span in &mut self.spans[first..last] {
            f(&mut span.marks);
        }
        self.normalize();
    }

    /// Inserts text with the given marks at `offset`.
    pub fn insert_text(&mut self, offset: usize, text: &str, marks: Marks) {
        if text.is_empty() {
            return;
        }
        let index = self.split_at(offset.min(self.len()));
        self.spans.insert(index, Span::new(text, marks));
        self.normalize();
    }

    /// Removes the chars in `start..end`.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.len());
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.spans.drain(first..last);
        self.normalize();
    }

    /// Splits the block at `offset`, returning the tail as a new block.
    pub fn split_off(&mut self, offset: usize) -> Self {
        let index = self.split_at(offset.min(self.len()));
        let tail = self.spans.split_off(index);
        Self::with_spans(self.kind.continuation(), tail)
    }

    /// Appends another block's spans to this one.
    pub fn append(&mut self, other: Self) {
        self.spans.extend(other.spans);
        self.normalize();
    }
}

/// A rich-text document. Always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Blocks in order.
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Paragraph)],
        }
    }
}

impl Document {
    /// Creates an empty document with a single empty paragraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from blocks. An empty list yields an empty
    /// paragraph.
    #[must_use]
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::default();
        }
        Self { blocks }
    }

    /// Creates a document from plain text, one paragraph per line.
    #[must_use]
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_blocks(text.lines().map(Block::paragraph).collect())
    }

    /// Returns true if no block has text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Length of a block in chars, zero if it does not exist.
    #[must_use]
    pub fn block_len(&self, index: usize) -> usize {
        self.blocks.get(index).map_or(0, Block::len)
    }
}

/// Byte index of the `char_offset`-th char, or the string length.
pub(crate) fn byte_index(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map_or(s.len(), |(index, _)| index)
}
