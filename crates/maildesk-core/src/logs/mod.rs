//! Log viewer support: parsing, filtering and statistics.
//!
//! # Example
//!
//! ```
//! use maildesk_core::logs::{LogFilter, LogLevel, parse_log};
//!
//! let text = "2024-05-01 10:00:00,000 - ERROR - {\"message\": \"SMTP timeout\"}";
//! let entries = parse_log(text);
//!
//! let mut filter = LogFilter::new();
//! filter.toggle_level(LogLevel::Error);
//! assert_eq!(filter.apply(&entries).len(), 1);
//! ```

mod filter;
mod model;
mod parser;

pub use filter::{LogFilter, LogStats};
pub use model::{LogEntry, LogLevel};
pub use parser::{parse_line, parse_log};
