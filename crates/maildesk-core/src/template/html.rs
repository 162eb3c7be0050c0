//! HTML import and export for [`Document`].
//!
//! Export produces a small, fixed tag set. Import parses with `scraper`,
//! accepts that set plus the variants browsers emit from contentEditable
//! (`<b>`, `<i>`, `<strike>`, `<div>`, `<br>`) and drops everything else
//! while keeping its text.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Html, Node};

use super::document::{Block, BlockKind, Document, Marks, Span};

impl Document {
    /// Renders the document as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut open_list: Option<BlockKind> = None;

        for block in &self.blocks {
            let list = block.kind.is_list().then_some(block.kind);
            if open_list != list {
                if let Some(kind) = open_list {
                    out.push_str(list_tag(kind).1);
                }
                if let Some(kind) = list {
                    out.push_str(list_tag(kind).0);
                }
                open_list = list;
            }

            let (open, close) = block_tag(block.kind);
            out.push_str(open);
            if block.is_empty() && list.is_none() {
                out.push_str("<br>");
            }
            for span in &block.spans {
                write_span(&mut out, span);
            }
            out.push_str(close);
        }

        if let Some(kind) = open_list {
            out.push_str(list_tag(kind).1);
        }
        out
    }

    /// Parses HTML into a document.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let mut importer = Importer::default();
        importer.walk(fragment.root_element());
        importer.finish()
    }

    /// Plain-text rendering with list markers, one line per block.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut number = 0;
        let mut lines = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            number = if block.kind == BlockKind::NumberedItem {
                number + 1
            } else {
                0
            };
            let text = block.text();
            lines.push(match block.kind {
                BlockKind::BulletItem => format!("\u{2022} {text}"),
                BlockKind::NumberedItem => format!("{number}. {text}"),
                BlockKind::Quote => format!("> {text}"),
                _ => text,
            });
        }
        lines.join("\n")
    }

    /// Markdown rendering of the HTML output.
    ///
    /// Falls back to plain text if conversion fails.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        htmd::convert(&self.to_html()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Markdown conversion failed");
            self.to_plain_text()
        })
    }
}

const fn block_tag(kind: BlockKind) -> (&'static str, &'static str) {
    match kind {
        BlockKind::Paragraph => ("<p>", "</p>"),
        BlockKind::Heading(1) => ("<h1>", "</h1>"),
        BlockKind::Heading(2) => ("<h2>", "</h2>"),
        BlockKind::Heading(_) => ("<h3>", "</h3>"),
        BlockKind::BulletItem | BlockKind::NumberedItem => ("<li>", "</li>"),
        BlockKind::Quote => ("<blockquote>", "</blockquote>"),
    }
}

const fn list_tag(kind: BlockKind) -> (&'static str, &'static str) {
    match kind {
        BlockKind::NumberedItem => ("<ol>", "</ol>"),
        _ => ("<ul>", "</ul>"),
    }
}

fn write_span(out: &mut String, span: &Span) {
    let marks = &span.marks;
    if marks.is_plain() {
        out.push_str(&encode_text(&span.text));
        return;
    }
    if let Some(href) = &marks.link {
        let _ = write!(out, "<a href=\"{}\">", encode_double_quoted_attribute(href));
    }
    if marks.bold {
        out.push_str("<strong>");
    }
    if marks.italic {
        out.push_str("<em>");
    }
    if marks.underline {
        out.push_str("<u>");
    }
    if marks.strike {
        out.push_str("<s>");
    }
    out.push_str(&encode_text(&span.text));
    if marks.strike {
        out.push_str("</s>");
    }
    if marks.underline {
        out.push_str("</u>");
    }
    if marks.italic {
        out.push_str("</em>");
    }
    if marks.bold {
        out.push_str("</strong>");
    }
    if marks.link.is_some() {
        out.push_str("</a>");
    }
}

/// Walks a parsed fragment and collects blocks.
#[derive(Default)]
struct Importer {
    blocks: Vec<Block>,
    current: Option<Block>,
    lists: Vec<BlockKind>,
    in_item: usize,
    quote: usize,
    heading: Option<u8>,
    bold: usize,
    italic: usize,
    underline: usize,
    strike: usize,
    links: Vec<Option<String>>,
}

impl Importer {
    fn finish(mut self) -> Document {
        self.flush(false);
        Document::from_blocks(self.blocks)
    }

    fn kind(&self) -> BlockKind {
        if let Some(level) = self.heading {
            BlockKind::heading(level)
        } else if self.in_item > 0 {
            self.lists.last().copied().unwrap_or(BlockKind::BulletItem)
        } else if self.quote > 0 {
            BlockKind::Quote
        } else {
            BlockKind::Paragraph
        }
    }

    fn marks(&self) -> Marks {
        Marks {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
            strike: self.strike > 0,
            link: self.links.iter().rev().find_map(Clone::clone),
        }
    }

    /// Closes the open block. Empty blocks survive only with `keep_empty`.
    fn flush(&mut self, keep_empty: bool) {
        if let Some(mut block) = self.current.take() {
            block.normalize();
            if keep_empty || !block.is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn walk(&mut self, parent: ElementRef<'_>) {
        for child in parent.children() {
            match child.value() {
                Node::Text(text) => self.text(text),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        self.element(element);
                    }
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        match element.value().name() {
            "script" | "style" | "head" | "title" | "template" => {}
            "br" => self.line_break(),
            "p" | "div" => self.block(element),
            name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let level = name[1..].parse().unwrap_or(1);
                let outer = self.heading.replace(level);
                self.block(element);
                self.heading = outer;
            }
            "li" => {
                self.in_item += 1;
                self.block(element);
                self.in_item -= 1;
            }
            "blockquote" => {
                self.quote += 1;
                self.block(element);
                self.quote -= 1;
            }
            name @ ("ul" | "ol") => {
                self.flush(false);
                self.lists.push(if name == "ol" {
                    BlockKind::NumberedItem
                } else {
                    BlockKind::BulletItem
                });
                self.walk(element);
                self.lists.pop();
            }
            "b" | "strong" => {
                self.bold += 1;
                self.walk(element);
                self.bold -= 1;
            }
            "i" | "em" => {
                self.italic += 1;
                self.walk(element);
                self.italic -= 1;
            }
            "u" | "ins" => {
                self.underline += 1;
                self.walk(element);
                self.underline -= 1;
            }
            "s" | "strike" | "del" => {
                self.strike += 1;
                self.walk(element);
                self.strike -= 1;
            }
            "a" => {
                let href = element
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|href| !href.is_empty())
                    .map(str::to_string);
                self.links.push(href);
                self.walk(element);
                self.links.pop();
            }
            _ => self.walk(element),
        }
    }

    fn block(&mut self, element: ElementRef<'_>) {
        self.flush(false);
        let before = self.blocks.len();
        self.current = Some(Block::new(self.kind()));
        self.walk(element);
        // Only a leaf block may stay empty; wrappers around other blocks may not.
        self.flush(self.blocks.len() == before);
    }

    fn line_break(&mut self) {
        let kind = self.current.as_ref().map_or_else(|| self.kind(), |b| b.kind);
        self.flush(false);
        self.current = Some(Block::new(kind));
    }

    fn text(&mut self, raw: &str) {
        let mut collapsed = String::with_capacity(raw.len());
        let mut last_space = false;
        for c in raw.chars() {
            if c.is_ascii_whitespace() {
                if !last_space {
                    collapsed.push(' ');
                }
                last_space = true;
            } else {
                collapsed.push(if c == '\u{a0}' { ' ' } else { c });
                last_space = false;
            }
        }

        let starts_block = self.current.as_ref().is_none_or(Block::is_empty);
        let ends_with_space = self
            .current
            .as_ref()
            .and_then(|b| b.spans.last())
            .is_some_and(|s| s.text.ends_with(' '));
        let text = if starts_block || ends_with_space {
            collapsed.trim_start()
        } else {
            collapsed.as_str()
        };
        if text.is_empty() {
            return;
        }

        let marks = self.marks();
        let kind = self.kind();
        self.current
            .get_or_insert_with(|| Block::new(kind))
            .spans
            .push(Span::new(text, marks));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> Marks {
        Marks {
            bold: true,
            ..Marks::default()
        }
    }

    #[test]
    fn test_to_html_groups_lists_and_escapes() {
        let doc = Document::from_blocks(vec![
            Block::with_spans(BlockKind::Heading(2), vec![Span::plain("Hi <team>")]),
            Block::with_spans(BlockKind::BulletItem, vec![Span::plain("one")]),
            Block::with_spans(BlockKind::BulletItem, vec![Span::new("two", bold())]),
            Block::paragraph("Q&A"),
        ]);
        assert_eq!(
            doc.to_html(),
            "<h2>Hi &lt;team&gt;</h2><ul><li>one</li><li><strong>two</strong></li></ul><p>Q&amp;A</p>"
        );
    }

    #[test]
    fn test_link_nesting() {
        let doc = Document::from_blocks(vec![Block::with_spans(
            BlockKind::Paragraph,
            vec![Span::new(
                "site",
                Marks {
                    italic: true,
                    link: Some("https://a.io/?x=1&y=2".into()),
                    ..Marks::default()
                },
            )],
        )]);
        assert_eq!(
            doc.to_html(),
            "<p><a href=\"https://a.io/?x=1&amp;y=2\"><em>site</em></a></p>"
        );
        assert_eq!(Document::from_html(&doc.to_html()), doc);
    }

    #[test]
    fn test_from_html_browser_markup() {
        let html = "<div>Hello <b>bold</b> and <i>it</i></div><div><br></div>\
                    <ol><li>first</li><li><strike>second</strike></li></ol>\
                    <p>a<br>b</p><script>alert(1)</script><span>kept &amp; decoded</span>";
        let doc = Document::from_html(html);
        let texts: Vec<String> = doc.blocks.iter().map(Block::text).collect();
        assert_eq!(
            texts,
            vec!["Hello bold and it", "", "first", "second", "a", "b", "kept & decoded"]
        );
        assert!(doc.blocks[0].spans[1].marks.bold);
        assert!(doc.blocks[0].spans[3].marks.italic);
        assert_eq!(doc.blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(doc.blocks[2].kind, BlockKind::NumberedItem);
        assert!(doc.blocks[3].spans[0].marks.strike);
    }

    #[test]
    fn test_from_html_whitespace_and_entities() {
        let doc = Document::from_html("<p>\n  Dear   &#123;&#x7D;\n  customer,&nbsp;hi  </p>");
        assert_eq!(doc.blocks[0].text(), "Dear {} customer, hi ");
        let doc = Document::from_html("<p>fish &zz; chips</p>");
        assert_eq!(doc.blocks[0].text(), "fish &zz; chips");
    }

    #[test]
    fn test_from_html_empty_input() {
        assert_eq!(Document::from_html(""), Document::new());
        assert_eq!(Document::from_html("<p>   </p><!-- note -->"), Document::new());
        assert_eq!(Document::from_html(&Document::new().to_html()), Document::new());
    }

    #[test]
    fn test_round_trip_keeps_blank_lines_and_trailing_space() {
        let doc = Document::from_blocks(vec![
            Block::paragraph("a"),
            Block::new(BlockKind::Paragraph),
            Block::with_spans(
                BlockKind::Paragraph,
                vec![Span::plain("Dear "), Span::new("Ada", bold())],
            ),
            Block::new(BlockKind::Paragraph),
            Block::paragraph("Regards "),
            Block::new(BlockKind::BulletItem),
        ]);
        assert_eq!(
            doc.to_html(),
            "<p>a</p><p><br></p><p>Dear <strong>Ada</strong></p><p><br></p><p>Regards </p><ul><li></li></ul>"
        );
        assert_eq!(Document::from_html(&doc.to_html()), doc);
    }

    #[test]
    fn test_wrappers_do_not_leave_empty_blocks() {
        let doc = Document::from_html(
            "<div><p>one</p></div>\n<blockquote><p>quoted</p></blockquote><ul>\n<li><p>item</p></li>\n</ul>",
        );
        let kinds: Vec<BlockKind> = doc.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Paragraph, BlockKind::Quote, BlockKind::BulletItem]
        );
        assert_eq!(doc.blocks[1].text(), "quoted");
    }

    #[test]
    fn test_markup_in_text_stays_text() {
        let doc = Document::from_blocks(vec![Block::paragraph("5 < 6 & \"quotes\"")]);
        assert_eq!(doc.to_html(), "<p>5 &lt; 6 &amp; \"quotes\"</p>");
        assert_eq!(Document::from_html(&doc.to_html()), doc);
    }

    #[test]
    fn test_heading_levels_clamped() {
        let doc = Document::from_html("<h5>Small</h5><blockquote>quoted</blockquote>");
        assert_eq!(doc.blocks[0].kind, BlockKind::Heading(3));
        assert_eq!(doc.blocks[1].kind, BlockKind::Quote);
    }

    #[test]
    fn test_round_trip_structure() {
        let html = "<h1>Title</h1><p>Body with <strong><em>both</em></strong> and <u>under</u></p>\
                    <ul><li>a</li></ul><ol><li>b</li></ol><blockquote>q</blockquote>";
        let doc = Document::from_html(html);
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_plain_text() {
        let doc = Document::from_html("<p>Intro</p><ol><li>a</li><li>b</li></ol><ul><li>c</li></ul>");
        assert_eq!(doc.to_plain_text(), "Intro\n1. a\n2. b\n\u{2022} c");
    }

    #[test]
    fn test_markdown_preview() {
        let doc = Document::from_html("<h1>Title</h1><p>Some <strong>bold</strong> text</p>");
        let md = doc.to_markdown();
        assert!(md.contains("Title"));
        assert!(md.contains("bold"));
        assert!(!md.contains("<strong>"));
    }
}
