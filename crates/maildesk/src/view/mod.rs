//! View components for the application.

mod components;
mod dashboard;
mod header;
mod logs;
mod records;
mod settings;
mod sharing;
mod sidebar;
mod table;
mod templates;

pub use components::{view_breadcrumb, view_footer, view_toasts};
pub use dashboard::view_dashboard;
pub use header::view_header;
pub use logs::view_logs;
pub use records::view_records;
pub use settings::view_settings;
pub use sharing::view_sharing;
pub use sidebar::view_sidebar;
pub use templates::view_templates;
