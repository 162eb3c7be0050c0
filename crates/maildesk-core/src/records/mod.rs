//! Email delivery records.
//!
//! Provides the record model, status summaries and the query type used to
//! filter, sort and page record listings.

mod model;
mod query;

pub use model::{DeliveryStatus, EmailRecord, RecordId, StatusSummary};
pub use query::{DEFAULT_PAGE_SIZE, Page, RecordQuery, SortKey, total_pages};
