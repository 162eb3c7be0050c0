//! Message types for application events.
//!
//! In the Elm architecture, Messages are events that trigger state changes.

use maildesk_core::{
    AppConfig, DeliveryStatus, Draft, DraftKey, DraftRepository, EmailRecord, EmailTemplate,
    LogLevel, Page, RecordId, RecordQuery, SharingOption, SharingSettings, StatusSummary,
};
use maildesk_core::template::BlockKind;

use crate::model::{AppSettings, PreviewMode};

/// Application messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    /// Navigate to a different view.
    NavigateTo(View),
    /// Toggle sidebar visibility.
    ToggleSidebar,
    /// Toggle between light and dark theme.
    ToggleTheme,
    /// Reload the data behind the current view.
    Refresh,
    /// Auto-refresh timer fired.
    AutoRefreshTick,
    /// Toast expiry timer fired.
    ToastTick,
    /// Close a toast.
    DismissToast(u64),
    /// Open a URL in the system browser.
    OpenLink(String),

    // Startup
    /// Configuration and stored API token loaded.
    ConfigLoaded(Result<(AppConfig, Option<String>), String>),
    /// UI preferences loaded.
    SettingsLoaded(Result<AppSettings, String>),
    /// UI preferences saved.
    SettingsSaved(Result<(), String>),
    /// Local draft store opened.
    DraftStoreOpened(Result<DraftRepository, String>),

    // Dashboard
    /// Status summary loaded.
    SummaryLoaded(Result<StatusSummary, String>),
    /// Most recent failures loaded.
    FailuresLoaded(Result<Page<EmailRecord>, String>),
    /// Desktop notification finished.
    NotificationShown(Result<(), String>),

    // Records
    /// Records page messages.
    Records(RecordsMessage),
    /// A records page loaded for the given query.
    RecordsLoaded(RecordQuery, Result<Page<EmailRecord>, String>),
    /// Bulk resend finished.
    RecordsResent(Result<usize, String>),
    /// Bulk delete finished.
    RecordsDeleted(Vec<RecordId>, Result<usize, String>),

    // Logs
    /// Logs page messages.
    Logs(LogsMessage),
    /// Log text loaded.
    LogsLoaded(Result<String, String>),

    // Templates
    /// Template editor messages.
    Templates(TemplatesMessage),
    /// Template list loaded.
    TemplatesLoaded(Result<Vec<EmailTemplate>, String>),
    /// Template saved; carries the server copy.
    TemplateSaved(DraftKey, Result<EmailTemplate, String>),
    /// Stored draft for the open template looked up.
    DraftLoaded(Result<Option<Draft>, String>),
    /// Draft written to the local store.
    DraftSaved(Result<(), String>),
    /// Draft removed after a save or discard.
    DraftDeleted(Result<bool, String>),

    // Sharing
    /// Sharing page messages.
    Sharing(SharingMessage),
    /// Sharing settings loaded.
    SharingLoaded(Result<SharingSettings, String>),
    /// Sharing settings saved.
    SharingSaved(Result<SharingSettings, String>),

    // Settings
    /// Settings screen messages.
    Settings(SettingsMessage),
    /// Configuration saved; carries the new config and the token to use.
    ConfigSaved(Result<(AppConfig, Option<String>), String>),
    /// Stored API token removed.
    TokenForgotten(Result<(), String>),

    // Keyboard Events
    /// Keyboard shortcut pressed.
    KeyPressed(KeyboardAction),
    /// Keyboard event without a shortcut.
    Ignored,
}

/// Keyboard actions that can be triggered by shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    /// Jump to a page (Ctrl+1..5).
    Navigate(View),
    /// Reload the current page (F5).
    Refresh,
    /// Clear selection, expansion or the format scope (Escape).
    Cancel,
    /// Toggle bold in the template editor (Ctrl+B).
    Bold,
    /// Toggle italic in the template editor (Ctrl+I).
    Italic,
    /// Toggle underline in the template editor (Ctrl+U).
    Underline,
    /// Undo in the template editor (Ctrl+Z).
    Undo,
    /// Redo in the template editor (Ctrl+Shift+Z).
    Redo,
    /// Save the current form (Ctrl+S).
    Save,
    /// Open settings (Ctrl+,).
    Settings,
}

/// Messages for the records page.
#[derive(Debug, Clone)]
pub enum RecordsMessage {
    /// Search text changed.
    SearchChanged(String),
    /// Search debounce elapsed.
    SearchSettled(u64),
    /// Status chip clicked.
    StatusFilter(Option<DeliveryStatus>),
    /// From date input changed.
    FromChanged(String),
    /// To date input changed.
    ToChanged(String),
    /// Apply the date inputs.
    ApplyDates,
    /// Reset every filter.
    ClearFilters,
    /// Header clicked.
    SortBy(&'static str),
    /// Header checkbox clicked.
    ToggleAll,
    /// Row checkbox clicked.
    ToggleRow(RecordId),
    /// Show or hide a row's error details.
    ToggleDetails(RecordId),
    /// Pagination button clicked.
    GoToPage(usize),
    /// Rows per page picked.
    PageSize(usize),
    /// Resend the selected records.
    ResendSelected,
    /// Ask to delete the selected records.
    DeleteSelected,
    /// Confirm the pending delete.
    ConfirmDelete,
    /// Cancel the pending delete.
    CancelDelete,
    /// Clear the selection.
    ClearSelection,
}

/// Messages for the logs page.
#[derive(Debug, Clone)]
pub enum LogsMessage {
    /// Level chip clicked.
    ToggleLevel(LogLevel),
    /// Search text changed.
    SearchChanged(String),
    /// Search debounce elapsed.
    SearchSettled(u64),
    /// Field filter changed (`key=value, ...`).
    FieldChanged(String),
    /// Reset every filter.
    ClearFilters,
    /// Expand or collapse an entry by line number.
    ToggleEntry(usize),
    /// Tail size picked.
    TailSize(usize),
    /// Auto-refresh toggled.
    AutoRefresh(bool),
}

/// Messages for the template editor.
#[derive(Debug, Clone)]
pub enum TemplatesMessage {
    /// Open a template from the list.
    Open(usize),
    /// Start a new template.
    New,
    /// Name changed.
    NameChanged(String),
    /// Subject changed.
    SubjectChanged(String),
    /// Make a block the active one.
    FocusBlock(usize),
    /// Active block text changed.
    BlockEdited(String),
    /// Enter pressed in the active block.
    SplitBlock,
    /// Merge the active block into the previous one.
    MergeBlock,
    /// Text to format within the active block changed.
    FormatTextChanged(String),
    /// Format the whole document instead of the active block.
    DocumentScope(bool),
    /// Toggle bold.
    Bold,
    /// Toggle italic.
    Italic,
    /// Toggle underline.
    Underline,
    /// Toggle strikethrough.
    Strike,
    /// Change the kind of the active block.
    SetBlock(BlockKind),
    /// Link URL input changed.
    LinkChanged(String),
    /// Apply the link URL.
    ApplyLink,
    /// Remove links from the scope.
    Unlink,
    /// Clear inline formatting from the scope.
    RemoveFormat,
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,
    /// Preview mode picked.
    Preview(PreviewMode),
    /// Sample value for a placeholder changed.
    SampleChanged(String, String),
    /// Draft autosave debounce elapsed.
    DraftSettled(u64),
    /// Throw away local changes.
    Discard,
    /// Save to the backend.
    Save,
}

/// Messages for the sharing page.
#[derive(Debug, Clone)]
pub enum SharingMessage {
    /// Radio picked.
    Option(SharingOption),
    /// Address input changed.
    EmailChanged(String),
    /// Add the typed address.
    AddEmail,
    /// Remove an address.
    RemoveEmail(String),
    /// Threshold input changed.
    ThresholdChanged(String),
    /// Notify toggle changed.
    Notify(bool),
    /// Discard edits.
    Reset,
    /// Save to the backend.
    Save,
}

/// Messages for the settings screen.
#[derive(Debug, Clone)]
pub enum SettingsMessage {
    /// API URL changed.
    ApiUrlChanged(String),
    /// Mock backend toggled.
    UseMock(bool),
    /// Page size changed.
    PageSizeChanged(String),
    /// Refresh interval changed.
    RefreshChanged(String),
    /// Token input changed.
    TokenChanged(String),
    /// Remove the stored token.
    ForgetToken,
    /// Save and reconnect.
    Save,
}

/// Application views/screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Delivery summary.
    #[default]
    Dashboard,
    /// Email records table.
    Records,
    /// Log viewer.
    Logs,
    /// Template editor.
    Templates,
    /// Drive sharing settings.
    Sharing,
    /// Connection settings.
    Settings,
}

impl View {
    /// Pages listed in the sidebar, in shortcut order.
    pub const NAVIGATION: [Self; 5] = [
        Self::Dashboard,
        Self::Records,
        Self::Logs,
        Self::Templates,
        Self::Sharing,
    ];

    /// Page title, also used in the breadcrumb.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Records => "Email Records",
            Self::Logs => "Logs",
            Self::Templates => "Templates",
            Self::Sharing => "Sharing Settings",
            Self::Settings => "Settings",
        }
    }

    /// Sidebar icon.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Dashboard => "◧",
            Self::Records => "✉",
            Self::Logs => "☰",
            Self::Templates => "✎",
            Self::Sharing => "⇪",
            Self::Settings => "⚙",
        }
    }
}
