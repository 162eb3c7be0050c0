//! Rich-text email templates.
//!
//! [`Editor`] applies formatting commands to a [`Document`] with the toggle
//! rules of browser rich-text editing and keeps an undo history. Documents
//! convert to and from HTML for storage on the server.

mod document;
mod editor;
mod html;
mod model;

pub use document::{Block, BlockKind, Document, Mark, Marks, Span};
pub use editor::{Command, Editor, EditorError, HISTORY_LIMIT, Position, Selection};
pub use model::{EmailTemplate, TemplateId, TemplateProblem};
