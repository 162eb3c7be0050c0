//! Page state for the dashboard.

pub mod dashboard;
pub mod debounce;
pub mod logs;
pub mod records;
mod settings;
pub mod sharing;
pub mod templates;
pub mod toasts;

pub use dashboard::DashboardState;
pub use debounce::Debounce;
pub use logs::LogsState;
pub use records::RecordsState;
pub use settings::{AppSettings, SettingsState};
pub use sharing::SharingState;
pub use templates::{PreviewMode, TemplatesState};
pub use toasts::{Toast, ToastKind, Toasts};
