//! State of the template editor page.
//!
//! The editor works on one block at a time. The active block is edited as
//! plain text and formatting commands apply to the text matched by the
//! "format text" field inside that block, or to the whole block when the
//! field is empty. With document scope they apply to everything.

use std::collections::{BTreeMap, HashMap};

use maildesk_core::drafts::{Draft, DraftKey};
use maildesk_core::template::{BlockKind, Mark, Position, Selection, TemplateProblem};
use maildesk_core::{Command, Document, Editor, EditorError, EmailTemplate};
use tracing::warn;

use super::debounce::Debounce;

/// What the preview panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewMode {
    #[default]
    Rendered,
    PlainText,
    Markdown,
    Html,
}

impl PreviewMode {
    pub const ALL: [Self; 4] = [Self::Rendered, Self::PlainText, Self::Markdown, Self::Html];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rendered => "Rendered",
            Self::PlainText => "Plain text",
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
        }
    }
}

#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct TemplatesState {
    pub templates: Vec<EmailTemplate>,
    /// Template being edited, with `body_html` kept in sync with the editor.
    pub current: EmailTemplate,
    pub editor: Editor,
    pub active_block: usize,
    pub format_text: String,
    pub document_scope: bool,
    pub link_input: String,
    pub preview: PreviewMode,
    /// Values substituted for placeholders in the preview.
    pub sample_values: BTreeMap<String, String>,
    pub problems: Vec<TemplateProblem>,
    pub editor_error: Option<String>,
    pub dirty: bool,
    pub restored_draft: bool,
    pub draft_debounce: Debounce,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
}

impl Default for TemplatesState {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplatesState {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            current: EmailTemplate::new("", ""),
            editor: Editor::default(),
            active_block: 0,
            format_text: String::new(),
            document_scope: false,
            link_input: String::new(),
            preview: PreviewMode::default(),
            sample_values: BTreeMap::new(),
            problems: Vec::new(),
            editor_error: None,
            dirty: false,
            restored_draft: false,
            draft_debounce: Debounce::default(),
            is_loading: false,
            is_saving: false,
            error: None,
        }
    }

    /// Stores the template list. The open template stays open unless it is
    /// unmodified and gone from the list.
    pub fn set_templates(&mut self, templates: Vec<EmailTemplate>) {
        self.templates = templates;
        self.is_loading = false;
        self.error = None;
        if self.dirty {
            return;
        }
        let reopened = self
            .current
            .id
            .and_then(|id| self.templates.iter().find(|t| t.id == Some(id)))
            .or_else(|| self.templates.first())
            .cloned();
        if let Some(template) = reopened {
            self.open(template);
        }
    }

    /// Opens a template for editing.
    pub fn open(&mut self, template: EmailTemplate) {
        self.editor = Editor::from_html(&template.body_html);
        self.current = template;
        self.current.body_html = self.editor.document().to_html();
        self.active_block = 0;
        self.format_text.clear();
        self.link_input.clear();
        self.problems.clear();
        self.editor_error = None;
        self.dirty = false;
        self.restored_draft = false;
        self.sync_selection();
    }

    pub fn open_new(&mut self) {
        self.open(EmailTemplate::new("Untitled template", ""));
    }

    /// Draft key of the open template.
    pub fn draft_key(&self) -> DraftKey {
        DraftKey::of(&self.current)
    }

    /// Replaces the open template with a stored draft if it belongs to it and
    /// holds changes. Returns true if the draft was applied.
    pub fn restore_draft(&mut self, draft: Draft) -> bool {
        if draft.key() != self.draft_key() || !draft.differs_from(&self.current) {
            return false;
        }
        self.open(draft.template);
        self.dirty = true;
        self.restored_draft = true;
        true
    }

    /// Snapshot for autosave.
    pub fn draft(&self) -> Draft {
        Draft::new(self.current.clone())
    }

    pub fn set_name(&mut self, name: String) {
        self.current.name = name;
        self.dirty = true;
    }

    pub fn set_subject(&mut self, subject: String) {
        self.current.subject = subject;
        self.dirty = true;
    }

    pub fn focus_block(&mut self, index: usize) {
        self.active_block = index;
        self.format_text.clear();
        self.sync_selection();
    }

    pub fn set_format_text(&mut self, text: String) {
        self.format_text = text;
        self.sync_selection();
    }

    pub fn set_document_scope(&mut self, on: bool) {
        self.document_scope = on;
        self.sync_selection();
    }

    /// Replaces the text of the active block.
    pub fn edit_active_block(&mut self, text: &str) {
        let index = self.active_block;
        match self.editor.replace_block_text(index, text) {
            Ok(()) => self.body_changed(),
            Err(e) => self.editor_error = Some(e.to_string()),
        }
    }

    /// Runs a formatting or structure command against the current scope.
    pub fn run(&mut self, command: Command) -> Result<(), EditorError> {
        match &command {
            Command::InsertParagraph => {
                let end = self.editor.document().block_len(self.active_block);
                self.editor
                    .set_selection(Selection::caret(Position::new(self.active_block, end)))?;
            }
            Command::Delete => {
                self.editor
                    .set_selection(Selection::caret(Position::new(self.active_block, 0)))?;
            }
            Command::Undo | Command::Redo | Command::SelectAll => {}
            _ => self.sync_selection(),
        }

        let result = self.editor.execute(command);
        self.editor_error = result.as_ref().err().map(ToString::to_string);
        result?;

        let focus = self.editor.selection().focus.block;
        if focus != self.active_block {
            self.active_block = focus;
            self.format_text.clear();
        }
        self.sync_selection();
        self.body_changed();
        Ok(())
    }

    /// Toolbar state for a mark.
    pub fn is_active(&self, mark: Mark) -> bool {
        self.editor.query(mark)
    }

    pub fn current_block(&self) -> BlockKind {
        self.editor.current_block()
    }

    /// Points the editor selection at the current scope.
    fn sync_selection(&mut self) {
        let document = self.editor.document();
        let last = document.block_count().saturating_sub(1);
        self.active_block = self.active_block.min(last);

        let selection = if self.document_scope {
            Selection::new(Position::default(), Position::new(last, document.block_len(last)))
        } else {
            let block = self.active_block;
            let text = document.blocks[block].text();
            let (start, end) = find_chars(&text, &self.format_text)
                .unwrap_or_else(|| (0, text.chars().count()));
            Selection::within(block, start, end)
        };

        if let Err(e) = self.editor.set_selection(selection) {
            warn!("Selection out of range: {}", e);
        }
    }

    fn body_changed(&mut self) {
        self.current.body_html = self.editor.document().to_html();
        self.dirty = true;
    }

    /// Runs validation and returns true if the template can be saved.
    pub fn validate(&mut self) -> bool {
        self.problems = self.current.validate().err().unwrap_or_default();
        self.problems.is_empty()
    }

    /// Applies the server's copy after a save started under `key`.
    ///
    /// The list entry is always updated. The editor only switches to the
    /// server copy if it still shows the template that was saved; returns
    /// true in that case.
    pub fn saved(&mut self, key: DraftKey, template: EmailTemplate) -> bool {
        self.is_saving = false;
        if let Some(existing) = self
            .templates
            .iter_mut()
            .find(|t| t.id.is_some() && t.id == template.id)
        {
            *existing = template.clone();
        } else {
            self.templates.push(template.clone());
        }
        if self.draft_key() != key {
            return false;
        }
        let active = self.active_block;
        self.open(template);
        self.active_block = active.min(self.editor.document().block_count().saturating_sub(1));
        self.sync_selection();
        true
    }

    /// Placeholder names with the sample values entered for them.
    pub fn placeholder_values(&self) -> HashMap<String, String> {
        self.current
            .placeholders()
            .into_iter()
            .filter_map(|name| {
                let value = self.sample_values.get(&name)?;
                (!value.is_empty()).then(|| (name, value.clone()))
            })
            .collect()
    }

    /// Subject and body document with sample values substituted.
    pub fn rendered(&self) -> (String, Document) {
        let (subject, body) = self.current.render(&self.placeholder_values());
        (subject, Document::from_html(&body))
    }

    /// Preview text for the non-rendered modes.
    pub fn preview_text(&self) -> String {
        let (_, document) = self.rendered();
        match self.preview {
            PreviewMode::Rendered | PreviewMode::PlainText => document.to_plain_text(),
            PreviewMode::Markdown => document.to_markdown(),
            PreviewMode::Html => document.to_html(),
        }
    }
}

/// Char range of the first occurrence of `needle` in `haystack`.
fn find_chars(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let byte = haystack.find(needle)?;
    let start = haystack[..byte].chars().count();
    Some((start, start + needle.chars().count()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maildesk_core::TemplateId;

    fn template(body: &str) -> EmailTemplate {
        EmailTemplate {
            id: Some(TemplateId(1)),
            body_html: body.into(),
            ..EmailTemplate::new("Welcome", "Hello {{name}}")
        }
    }

    #[test]
    fn test_find_chars_counts_characters() {
        assert_eq!(find_chars("héllo world", "world"), Some((6, 11)));
        assert_eq!(find_chars("abc", ""), None);
        assert_eq!(find_chars("abc", "x"), None);
    }

    #[test]
    fn test_bold_applies_to_format_text() {
        let mut state = TemplatesState::new();
        state.open(template("<p>Hello world</p>"));
        state.set_format_text("world".into());
        state.run(Command::ToggleBold).unwrap();

        assert_eq!(state.current.body_html, "<p>Hello <strong>world</strong></p>");
        assert!(state.is_active(Mark::Bold));
        assert!(state.dirty);

        state.set_format_text(String::new());
        assert!(!state.is_active(Mark::Bold));
    }

    #[test]
    fn test_enter_adds_block_after_active() {
        let mut state = TemplatesState::new();
        state.open(template("<p>One</p>"));
        state.run(Command::InsertParagraph).unwrap();
        assert_eq!(state.active_block, 1);
        state.edit_active_block("Two");
        assert_eq!(state.current.body_html, "<p>One</p><p>Two</p>");
    }

    #[test]
    fn test_block_kind_and_undo() {
        let mut state = TemplatesState::new();
        state.open(template("<p>Title</p>"));
        state.run(Command::SetBlock(BlockKind::heading(1))).unwrap();
        assert_eq!(state.current_block(), BlockKind::Heading(1));
        state.run(Command::Undo).unwrap();
        assert_eq!(state.current.body_html, "<p>Title</p>");
    }

    #[test]
    fn test_invalid_link_reports_error() {
        let mut state = TemplatesState::new();
        state.open(template("<p>Click</p>"));
        assert!(state.run(Command::CreateLink("javascript:alert(1)".into())).is_err());
        assert!(state.editor_error.is_some());
        assert_eq!(state.current.body_html, "<p>Click</p>");
    }

    #[test]
    fn test_draft_restore_only_when_different() {
        let mut state = TemplatesState::new();
        state.open(template("<p>Saved</p>"));

        let same = state.draft();
        assert!(!state.restore_draft(same));

        let mut changed = state.current.clone();
        changed.subject = "Draft subject".into();
        assert!(state.restore_draft(Draft::new(changed)));
        assert!(state.dirty && state.restored_draft);
        assert_eq!(state.current.subject, "Draft subject");
    }

    #[test]
    fn test_preview_substitutes_samples() {
        let mut state = TemplatesState::new();
        state.open(template("<p>Hi {{name}}</p>"));
        state.sample_values.insert("name".into(), "Ada".into());
        let (subject, body) = state.rendered();
        assert_eq!(subject, "Hello Ada");
        assert_eq!(body.to_plain_text(), "Hi Ada");
    }

    #[test]
    fn test_save_reopens_the_saved_template() {
        let mut state = TemplatesState::new();
        state.open_new();
        state.set_name("Receipt".into());
        state.set_subject("Your receipt".into());
        let key = state.draft_key();
        let stored = EmailTemplate {
            id: Some(TemplateId(9)),
            ..state.current.clone()
        };

        assert!(state.saved(key, stored));
        assert_eq!(state.current.id, Some(TemplateId(9)));
        assert!(!state.dirty);
        assert_eq!(state.templates.len(), 1);
    }

    #[test]
    fn test_save_after_switching_keeps_other_template() {
        let mut state = TemplatesState::new();
        let other = EmailTemplate {
            id: Some(TemplateId(2)),
            ..EmailTemplate::new("Reminder", "Don't forget")
        };
        state.set_templates(vec![template("<p>A</p>"), other.clone()]);
        state.set_subject("Hello again".into());
        let key = state.draft_key();
        let stored = state.current.clone();

        state.open(other);
        state.set_name("Reminder v2".into());
        state.is_saving = true;

        assert!(!state.saved(key, stored));
        assert!(!state.is_saving);
        assert_eq!(state.current.id, Some(TemplateId(2)));
        assert_eq!(state.current.name, "Reminder v2");
        assert!(state.dirty);
        assert_eq!(state.templates[0].subject, "Hello again");
        assert_ne!(state.draft_key(), key);
    }

    #[test]
    fn test_set_templates_keeps_dirty_edit() {
        let mut state = TemplatesState::new();
        state.set_templates(vec![template("<p>A</p>")]);
        assert_eq!(state.current.name, "Welcome");
        state.set_name("Edited".into());
        state.set_templates(vec![template("<p>B</p>")]);
        assert_eq!(state.current.name, "Edited");
    }
}
