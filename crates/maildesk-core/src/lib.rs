//! # maildesk-core
//!
//! Core logic for the `MailDesk` email management dashboard.
//!
//! This crate provides:
//! - Email delivery records, status summaries and record queries
//! - Table state: sorting, pagination slots and tri-state row selection
//! - **Log Viewer** - parsing of `timestamp - LEVEL - {json}` lines, filtering and statistics
//! - **Template Editor** - a rich-text document model driven by formatting commands
//! - **Drive Sharing** - attachment upload policy and validation
//! - REST client and an in-process mock backend
//! - Configuration, keyring-backed API token and local draft storage (`SQLite`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod credentials;
pub mod dates;
pub mod drafts;
mod error;
pub mod logs;
pub mod records;
pub mod sharing;
pub mod table;
pub mod template;

pub use api::{ApiClient, HttpApi, MockApi};
pub use config::{AppConfig, ConfigError};
pub use credentials::{CredentialError, CredentialResult};
pub use drafts::{Draft, DraftKey, DraftRepository};
pub use error::{Error, Result};
pub use logs::{LogEntry, LogFilter, LogLevel, LogStats};
pub use records::{DeliveryStatus, EmailRecord, Page, RecordId, RecordQuery, SortKey, StatusSummary};
pub use sharing::{SharingError, SharingOption, SharingSettings};
pub use table::{
    CheckState, ColumnDef, PageSlot, Pagination, Selection, SortDirection, SortState, TableState,
};
pub use template::{Command, Document, Editor, EditorError, EmailTemplate, TemplateId};
