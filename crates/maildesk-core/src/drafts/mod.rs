//! Local autosave of template edits.
//!
//! Drafts live in a SQLite file under the platform data dir so that unsaved
//! template changes survive a restart. A draft is discarded once the
//! template is saved to the backend.

mod model;
mod repository;

pub use model::{Draft, DraftKey};
pub use repository::DraftRepository;
