//! `MailDesk` - Desktop admin dashboard for email delivery
//!
//! Built with Rust and the iced GUI framework, talking to the mail service's
//! REST API or to an in-process mock backend.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod model;
mod style;
mod view;

use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::{DateTime, Utc};
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{column, container, row, stack};
use iced::{Element, Length, Subscription, Task};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maildesk_core::credentials::{delete_api_token, get_api_token, store_api_token};
use maildesk_core::dates::format_datetime;
use maildesk_core::{
    ApiClient, AppConfig, Command, Draft, DraftKey, DraftRepository, EmailRecord, EmailTemplate,
    Page, RecordId, RecordQuery, SharingSettings, StatusSummary,
};

use message::{
    KeyboardAction, LogsMessage, Message, RecordsMessage, SettingsMessage, SharingMessage,
    TemplatesMessage, View,
};
use model::debounce::{DRAFT_DELAY, SEARCH_DELAY, settle};
use model::{
    AppSettings, DashboardState, LogsState, RecordsState, SettingsState, SharingState,
    TemplatesState, Toasts,
};
use style::widgets::palette::ThemeMode;

/// How often expired toasts are swept while any are shown.
const TOAST_TICK: Duration = Duration::from_millis(500);

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maildesk=debug,maildesk_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MailDesk");

    iced::application(MailDesk::new, MailDesk::update, MailDesk::view)
        .title("MailDesk")
        .subscription(MailDesk::subscription)
        .run()
}

/// Main application state.
struct MailDesk {
    /// Current view/screen.
    current_view: View,
    /// Whether sidebar is visible.
    sidebar_visible: bool,
    /// Current theme mode (light/dark).
    theme_mode: ThemeMode,
    /// Active configuration.
    config: AppConfig,
    /// Backend client; `None` until the configuration is loaded.
    api: Option<ApiClient>,
    /// Bearer token for the HTTP backend.
    api_token: Option<String>,
    /// Local draft store; `None` if it could not be opened.
    drafts: Option<DraftRepository>,
    dashboard: DashboardState,
    records: RecordsState,
    logs: LogsState,
    templates: TemplatesState,
    sharing: SharingState,
    settings: SettingsState,
    toasts: Toasts,
    /// Time of the last successful load from the backend.
    last_refresh: Option<DateTime<Utc>>,
}

impl Default for MailDesk {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            current_view: View::Dashboard,
            sidebar_visible: true,
            theme_mode: ThemeMode::Light,
            api: None,
            api_token: None,
            drafts: None,
            dashboard: DashboardState::default(),
            records: RecordsState::new(config.page_size),
            logs: LogsState::new(config.log_tail_lines),
            templates: TemplatesState::new(),
            sharing: SharingState::default(),
            settings: SettingsState::from_config(&config, false),
            toasts: Toasts::default(),
            last_refresh: None,
            config,
        }
    }
}

impl MailDesk {
    /// Applies the current theme mode to the global palette.
    fn apply_theme(&self) {
        style::widgets::palette::set_theme(self.theme_mode);
    }

    fn app_settings(&self) -> AppSettings {
        AppSettings {
            theme_mode: self.theme_mode,
            sidebar_visible: self.sidebar_visible,
        }
    }

    fn mark_refreshed(&mut self) {
        self.last_refresh = Some(Utc::now());
    }

    /// Builds the backend client for a configuration and reloads data.
    fn connect(&mut self, config: AppConfig, token: Option<String>) -> Task<Message> {
        self.records.set_page_size(config.page_size);
        self.logs.tail_lines = config.log_tail_lines;
        self.settings = SettingsState::from_config(&config, token.is_some());

        match ApiClient::from_config(&config, token.clone()) {
            Ok(api) => self.api = Some(api),
            Err(e) => {
                warn!("Failed to create API client: {}", e);
                self.api = None;
                self.toasts.error(format!("Cannot connect to backend: {e}"));
            }
        }
        self.api_token = token;
        self.config = config;

        if self.current_view == View::Dashboard {
            self.load_view(View::Dashboard)
        } else {
            Task::batch([self.load_dashboard(), self.load_view(self.current_view)])
        }
    }

    fn load_view(&mut self, view: View) -> Task<Message> {
        match view {
            View::Dashboard => self.load_dashboard(),
            View::Records => self.load_records(),
            View::Logs => self.load_logs(),
            View::Templates => self.load_templates(),
            View::Sharing => self.load_sharing(),
            View::Settings => Task::none(),
        }
    }

    fn load_dashboard(&mut self) -> Task<Message> {
        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        self.dashboard.is_loading = true;
        Task::batch([
            Task::perform(fetch_summary(api.clone()), Message::SummaryLoaded),
            Task::perform(
                fetch_records(api, model::dashboard::failures_query()),
                Message::FailuresLoaded,
            ),
        ])
    }

    fn load_records(&mut self) -> Task<Message> {
        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        self.records.is_loading = true;
        let query = self.records.query.clone();
        Task::perform(fetch_records(api, query.clone()), move |result| {
            Message::RecordsLoaded(query, result)
        })
    }

    fn load_logs(&mut self) -> Task<Message> {
        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        self.logs.is_loading = true;
        Task::perform(fetch_logs(api, self.logs.tail_lines), Message::LogsLoaded)
    }

    fn load_templates(&mut self) -> Task<Message> {
        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        self.templates.is_loading = true;
        Task::perform(fetch_templates(api), Message::TemplatesLoaded)
    }

    fn load_sharing(&mut self) -> Task<Message> {
        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        self.sharing.is_loading = true;
        Task::perform(fetch_sharing(api), Message::SharingLoaded)
    }
}

impl MailDesk {
    /// Create new application instance.
    fn new() -> (Self, Task<Message>) {
        let app = Self::default();
        app.apply_theme();
        let settings_task = Task::perform(load_settings(), Message::SettingsLoaded);
        let config_task = Task::perform(load_config(), Message::ConfigLoaded);
        let drafts_task = Task::perform(open_draft_store(), Message::DraftStoreOpened);
        (app, Task::batch([settings_task, config_task, drafts_task]))
    }

    /// Update state based on message.
    #[allow(clippy::needless_pass_by_value)]
    #[allow(clippy::too_many_lines)] // Large match is idiomatic for Elm architecture
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NavigateTo(view) => {
                if view != self.current_view {
                    info!("Navigating to {:?}", view);
                }
                let flush = if self.current_view == View::Templates && view != View::Templates {
                    self.flush_draft()
                } else {
                    Task::none()
                };
                self.current_view = view;
                return Task::batch([flush, self.load_view(view)]);
            }
            Message::ToggleSidebar => {
                self.sidebar_visible = !self.sidebar_visible;
                return Task::perform(save_settings(self.app_settings()), Message::SettingsSaved);
            }
            Message::ToggleTheme => {
                self.theme_mode = self.theme_mode.toggled();
                self.apply_theme();
                info!("Theme changed to {:?}", self.theme_mode);
                return Task::perform(save_settings(self.app_settings()), Message::SettingsSaved);
            }
            Message::Refresh => {
                return self.load_view(self.current_view);
            }
            Message::AutoRefreshTick => {
                return self.auto_refresh();
            }
            Message::ToastTick => {
                self.toasts.expire(Instant::now());
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
            }
            Message::OpenLink(url) => {
                info!("Opening {}", url);
                if let Err(e) = opener::open(&url) {
                    warn!("Failed to open {}: {}", url, e);
                    self.toasts.error(format!("Could not open link: {e}"));
                }
            }
            Message::ConfigLoaded(result) => {
                let (config, token) = result.unwrap_or_else(|e| {
                    warn!("Failed to load config, using defaults: {}", e);
                    self.toasts.error(format!("Config not loaded: {e}"));
                    (AppConfig::default(), None)
                });
                return self.connect(config, token);
            }
            Message::SettingsLoaded(result) => match result {
                Ok(settings) => {
                    info!("Settings loaded: theme={:?}", settings.theme_mode);
                    self.theme_mode = settings.theme_mode;
                    self.sidebar_visible = settings.sidebar_visible;
                    self.apply_theme();
                }
                Err(e) => {
                    info!("Failed to load settings, using defaults: {}", e);
                }
            },
            Message::SettingsSaved(result) => {
                if let Err(e) = result {
                    self.toasts.error(format!("Failed to save settings: {e}"));
                }
            }
            Message::DraftStoreOpened(result) => match result {
                Ok(repo) => {
                    self.drafts = Some(repo);
                    if self.current_view == View::Templates {
                        return self.lookup_draft();
                    }
                }
                Err(e) => {
                    warn!("Draft store unavailable: {}", e);
                    self.toasts.info("Drafts will not be saved locally");
                }
            },
            Message::SummaryLoaded(result) => match result {
                Ok(summary) => {
                    self.mark_refreshed();
                    if let Some(added) = self.dashboard.observe(summary, Utc::now()) {
                        let total = summary.failures();
                        info!("{} new failed deliveries", added);
                        self.toasts
                            .error(format!("{added} new failed deliveries ({total} total)"));
                        return Task::perform(
                            notify_failures(added, total),
                            Message::NotificationShown,
                        );
                    }
                }
                Err(e) => {
                    warn!("Failed to load summary: {}", e);
                    self.dashboard.is_loading = false;
                    self.dashboard.error = Some(e);
                }
            },
            Message::FailuresLoaded(result) => match result {
                Ok(page) => self.dashboard.recent_failures = page.items,
                Err(e) => warn!("Failed to load recent failures: {}", e),
            },
            Message::NotificationShown(result) => {
                if let Err(e) = result {
                    warn!("Desktop notification failed: {}", e);
                }
            }
            Message::Records(msg) => {
                return self.handle_records(msg);
            }
            Message::RecordsLoaded(query, result) => {
                if query != self.records.query {
                    return Task::none();
                }
                match result {
                    Ok(page) => {
                        self.mark_refreshed();
                        self.records.apply_page(page);
                    }
                    Err(e) => {
                        warn!("Failed to load records: {}", e);
                        self.records.is_loading = false;
                        self.records.error = Some(e);
                    }
                }
            }
            Message::RecordsResent(result) => match result {
                Ok(count) => {
                    self.toasts.success(format!("Queued {count} email(s) for resend"));
                    self.records.table.selection.clear();
                    return Task::batch([self.load_records(), self.load_dashboard()]);
                }
                Err(e) => self.toasts.error(format!("Resend failed: {e}")),
            },
            Message::RecordsDeleted(ids, result) => match result {
                Ok(count) => {
                    self.records.forget(&ids);
                    self.toasts.success(format!("Deleted {count} record(s)"));
                    return Task::batch([self.load_records(), self.load_dashboard()]);
                }
                Err(e) => self.toasts.error(format!("Delete failed: {e}")),
            },
            Message::Logs(msg) => {
                return self.handle_logs(msg);
            }
            Message::LogsLoaded(result) => match result {
                Ok(text) => {
                    self.mark_refreshed();
                    self.logs.load_text(&text, Utc::now());
                }
                Err(e) => {
                    warn!("Failed to load logs: {}", e);
                    self.logs.is_loading = false;
                    self.logs.error = Some(e);
                }
            },
            Message::Templates(msg) => {
                return self.handle_templates(msg);
            }
            Message::TemplatesLoaded(result) => match result {
                Ok(templates) => {
                    self.mark_refreshed();
                    info!("Loaded {} templates", templates.len());
                    self.templates.set_templates(templates);
                    return self.lookup_draft();
                }
                Err(e) => {
                    warn!("Failed to load templates: {}", e);
                    self.templates.is_loading = false;
                    self.templates.error = Some(e);
                }
            },
            Message::TemplateSaved(key, result) => {
                self.templates.is_saving = false;
                match result {
                    Ok(template) => {
                        self.toasts.success(format!("Template \"{}\" saved", template.name));
                        if !self.templates.saved(key, template) {
                            debug!("Saved template is no longer open, editor left as is");
                        }
                        return self.delete_draft(key);
                    }
                    Err(e) => self.toasts.error(format!("Save failed: {e}")),
                }
            }
            Message::DraftLoaded(result) => match result {
                Ok(Some(draft)) => {
                    let saved_at = draft.saved_at;
                    if self.templates.restore_draft(draft) {
                        self.toasts.info(format!(
                            "Restored unsaved changes from {}",
                            format_datetime(&saved_at)
                        ));
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to read draft: {}", e),
            },
            Message::DraftSaved(result) => {
                if let Err(e) = result {
                    warn!("Failed to save draft: {}", e);
                }
            }
            Message::DraftDeleted(result) => {
                if let Err(e) = result {
                    warn!("Failed to delete draft: {}", e);
                }
            }
            Message::Sharing(msg) => {
                return self.handle_sharing(msg);
            }
            Message::SharingLoaded(result) => match result {
                Ok(settings) => {
                    self.mark_refreshed();
                    self.sharing.apply(settings);
                }
                Err(e) => {
                    warn!("Failed to load sharing settings: {}", e);
                    self.sharing.is_loading = false;
                    self.sharing.error = Some(e);
                }
            },
            Message::SharingSaved(result) => match result {
                Ok(settings) => {
                    self.sharing.apply(settings);
                    self.toasts.success("Sharing settings saved");
                }
                Err(e) => {
                    self.sharing.is_saving = false;
                    self.toasts.error(format!("Save failed: {e}"));
                }
            },
            Message::Settings(msg) => {
                return self.handle_settings(msg);
            }
            Message::ConfigSaved(result) => match result {
                Ok((config, token)) => {
                    self.toasts.success("Settings saved");
                    return self.connect(config, token);
                }
                Err(e) => {
                    self.settings.is_saving = false;
                    self.settings.error = Some(e);
                }
            },
            Message::TokenForgotten(result) => match result {
                Ok(()) => {
                    self.toasts.info("API token removed");
                    let config = self.config.clone();
                    return self.connect(config, None);
                }
                Err(e) => self.toasts.error(format!("Could not remove token: {e}")),
            },
            Message::KeyPressed(action) => {
                return self.handle_keyboard_action(action);
            }
            Message::Ignored => {}
        }
        Task::none()
    }

    /// Reloads the summary, plus the current page where it makes sense.
    fn auto_refresh(&mut self) -> Task<Message> {
        let summary = if self.dashboard.is_loading {
            Task::none()
        } else {
            self.load_dashboard()
        };
        let page = match self.current_view {
            View::Records if !self.records.is_loading && !self.records.confirm_delete => {
                self.load_records()
            }
            View::Logs if self.logs.auto_refresh && !self.logs.is_loading => self.load_logs(),
            _ => Task::none(),
        };
        Task::batch([summary, page])
    }

    /// Handle keyboard shortcut actions.
    fn handle_keyboard_action(&mut self, action: KeyboardAction) -> Task<Message> {
        let in_editor = self.current_view == View::Templates;
        match action {
            KeyboardAction::Navigate(view) => return Task::done(Message::NavigateTo(view)),
            KeyboardAction::Refresh => return Task::done(Message::Refresh),
            KeyboardAction::Settings => return Task::done(Message::NavigateTo(View::Settings)),
            KeyboardAction::Cancel => match self.current_view {
                View::Records => {
                    if self.records.confirm_delete {
                        self.records.confirm_delete = false;
                    } else {
                        self.records.table.selection.clear();
                        self.records.expanded = None;
                    }
                }
                View::Logs => self.logs.expanded.clear(),
                View::Templates => {
                    self.templates.set_document_scope(false);
                    self.templates.set_format_text(String::new());
                }
                View::Dashboard | View::Sharing | View::Settings => {}
            },
            KeyboardAction::Bold if in_editor => return self.run_command(Command::ToggleBold),
            KeyboardAction::Bold => return Task::done(Message::ToggleSidebar),
            KeyboardAction::Italic if in_editor => return self.run_command(Command::ToggleItalic),
            KeyboardAction::Underline if in_editor => {
                return self.run_command(Command::ToggleUnderline);
            }
            KeyboardAction::Undo if in_editor => return self.run_command(Command::Undo),
            KeyboardAction::Redo if in_editor => return self.run_command(Command::Redo),
            KeyboardAction::Save => match self.current_view {
                View::Templates => return self.handle_templates(TemplatesMessage::Save),
                View::Sharing => return self.handle_sharing(SharingMessage::Save),
                View::Settings => return self.handle_settings(SettingsMessage::Save),
                View::Dashboard | View::Records | View::Logs => {}
            },
            KeyboardAction::Italic
            | KeyboardAction::Underline
            | KeyboardAction::Undo
            | KeyboardAction::Redo => {}
        }
        Task::none()
    }

    /// Handle records page messages.
    fn handle_records(&mut self, msg: RecordsMessage) -> Task<Message> {
        match msg {
            RecordsMessage::SearchChanged(search) => {
                self.records.search_input = search;
                let generation = self.records.search_debounce.bump();
                return Task::perform(settle(SEARCH_DELAY, generation), |g| {
                    Message::Records(RecordsMessage::SearchSettled(g))
                });
            }
            RecordsMessage::SearchSettled(generation) => {
                if self.records.search_debounce.is_current(generation) {
                    self.records.apply_search();
                    return self.load_records();
                }
            }
            RecordsMessage::StatusFilter(status) => {
                self.records.set_status(status);
                return self.load_records();
            }
            RecordsMessage::FromChanged(input) => {
                self.records.from_input = input;
                self.records.date_error = None;
            }
            RecordsMessage::ToChanged(input) => {
                self.records.to_input = input;
                self.records.date_error = None;
            }
            RecordsMessage::ApplyDates => {
                if self.records.apply_dates().is_ok() {
                    return self.load_records();
                }
            }
            RecordsMessage::ClearFilters => {
                self.records.clear_filters();
                return self.load_records();
            }
            RecordsMessage::SortBy(column) => {
                if self.records.sort_by(column) {
                    return self.load_records();
                }
            }
            RecordsMessage::ToggleAll => self.records.toggle_all(),
            RecordsMessage::ToggleRow(id) => self.records.toggle_row(id),
            RecordsMessage::ToggleDetails(id) => {
                self.records.expanded = if self.records.expanded == Some(id) {
                    None
                } else {
                    Some(id)
                };
            }
            RecordsMessage::GoToPage(page) => {
                self.records.go_to_page(page);
                return self.load_records();
            }
            RecordsMessage::PageSize(size) => {
                self.records.set_page_size(size);
                return self.load_records();
            }
            RecordsMessage::ResendSelected => {
                let ids = self.records.selected_ids();
                if let Some(api) = self.api.clone()
                    && !ids.is_empty()
                {
                    info!("Resending {} records", ids.len());
                    return Task::perform(resend_records(api, ids), Message::RecordsResent);
                }
            }
            RecordsMessage::DeleteSelected => {
                if !self.records.table.selection.is_empty() {
                    self.records.confirm_delete = true;
                }
            }
            RecordsMessage::ConfirmDelete => {
                self.records.confirm_delete = false;
                let ids = self.records.selected_ids();
                if let Some(api) = self.api.clone()
                    && !ids.is_empty()
                {
                    info!("Deleting {} records", ids.len());
                    let deleted = ids.clone();
                    return Task::perform(delete_records(api, ids), move |result| {
                        Message::RecordsDeleted(deleted, result)
                    });
                }
            }
            RecordsMessage::CancelDelete => self.records.confirm_delete = false,
            RecordsMessage::ClearSelection => self.records.table.selection.clear(),
        }
        Task::none()
    }

    /// Handle logs page messages.
    fn handle_logs(&mut self, msg: LogsMessage) -> Task<Message> {
        match msg {
            LogsMessage::ToggleLevel(level) => self.logs.toggle_level(level),
            LogsMessage::SearchChanged(search) => {
                self.logs.search_input = search;
                let generation = self.logs.search_debounce.bump();
                return Task::perform(settle(SEARCH_DELAY, generation), |g| {
                    Message::Logs(LogsMessage::SearchSettled(g))
                });
            }
            LogsMessage::SearchSettled(generation) => {
                if self.logs.search_debounce.is_current(generation) {
                    self.logs.apply_search();
                }
            }
            LogsMessage::FieldChanged(input) => self.logs.set_field_input(input),
            LogsMessage::ClearFilters => self.logs.clear_filters(),
            LogsMessage::ToggleEntry(line) => self.logs.toggle_expanded(line),
            LogsMessage::TailSize(lines) => {
                self.logs.tail_lines = lines;
                return self.load_logs();
            }
            LogsMessage::AutoRefresh(on) => self.logs.auto_refresh = on,
        }
        Task::none()
    }

    /// Handle template editor messages.
    fn handle_templates(&mut self, msg: TemplatesMessage) -> Task<Message> {
        match msg {
            TemplatesMessage::Open(index) => {
                let Some(template) = self.templates.templates.get(index).cloned() else {
                    return Task::none();
                };
                let flush = self.flush_draft();
                self.templates.open(template);
                return Task::batch([flush, self.lookup_draft()]);
            }
            TemplatesMessage::New => {
                let flush = self.flush_draft();
                self.templates.open_new();
                return Task::batch([flush, self.lookup_draft()]);
            }
            TemplatesMessage::NameChanged(name) => {
                self.templates.set_name(name);
                return self.schedule_draft();
            }
            TemplatesMessage::SubjectChanged(subject) => {
                self.templates.set_subject(subject);
                return self.schedule_draft();
            }
            TemplatesMessage::FocusBlock(index) => self.templates.focus_block(index),
            TemplatesMessage::BlockEdited(text) => {
                self.templates.edit_active_block(&text);
                return self.schedule_draft();
            }
            TemplatesMessage::SplitBlock => return self.run_command(Command::InsertParagraph),
            TemplatesMessage::MergeBlock => return self.run_command(Command::Delete),
            TemplatesMessage::FormatTextChanged(text) => self.templates.set_format_text(text),
            TemplatesMessage::DocumentScope(on) => self.templates.set_document_scope(on),
            TemplatesMessage::Bold => return self.run_command(Command::ToggleBold),
            TemplatesMessage::Italic => return self.run_command(Command::ToggleItalic),
            TemplatesMessage::Underline => return self.run_command(Command::ToggleUnderline),
            TemplatesMessage::Strike => return self.run_command(Command::ToggleStrike),
            TemplatesMessage::SetBlock(kind) => return self.run_command(Command::SetBlock(kind)),
            TemplatesMessage::LinkChanged(url) => self.templates.link_input = url,
            TemplatesMessage::ApplyLink => {
                let url = self.templates.link_input.trim().to_string();
                if url.is_empty() {
                    return Task::none();
                }
                let task = self.run_command(Command::CreateLink(url));
                if self.templates.editor_error.is_none() {
                    self.templates.link_input.clear();
                }
                return task;
            }
            TemplatesMessage::Unlink => return self.run_command(Command::Unlink),
            TemplatesMessage::RemoveFormat => return self.run_command(Command::RemoveFormat),
            TemplatesMessage::Undo => return self.run_command(Command::Undo),
            TemplatesMessage::Redo => return self.run_command(Command::Redo),
            TemplatesMessage::Preview(mode) => self.templates.preview = mode,
            TemplatesMessage::SampleChanged(name, value) => {
                self.templates.sample_values.insert(name, value);
            }
            TemplatesMessage::DraftSettled(generation) => {
                if self.templates.draft_debounce.is_current(generation) && self.templates.dirty {
                    return self.save_draft();
                }
            }
            TemplatesMessage::Discard => {
                let key = self.templates.draft_key();
                let saved = self.templates.current.id.and_then(|id| {
                    self.templates
                        .templates
                        .iter()
                        .find(|t| t.id == Some(id))
                        .cloned()
                });
                match saved {
                    Some(template) => self.templates.open(template),
                    None => self.templates.open_new(),
                }
                self.templates.draft_debounce.bump();
                self.toasts.info("Changes discarded");
                return self.delete_draft(key);
            }
            TemplatesMessage::Save => {
                if !self.templates.validate() {
                    return Task::none();
                }
                if let Some(api) = self.api.clone() {
                    self.templates.is_saving = true;
                    self.templates.draft_debounce.bump();
                    let template = self.templates.current.clone();
                    let key = self.templates.draft_key();
                    info!("Saving template {:?}", template.name);
                    return Task::perform(save_template(api, template), move |result| {
                        Message::TemplateSaved(key, result)
                    });
                }
            }
        }
        Task::none()
    }

    /// Runs an editor command and schedules a draft save.
    fn run_command(&mut self, command: Command) -> Task<Message> {
        match self.templates.run(command) {
            Ok(()) => self.schedule_draft(),
            Err(e) => {
                self.toasts.error(e.to_string());
                Task::none()
            }
        }
    }

    fn schedule_draft(&mut self) -> Task<Message> {
        if self.drafts.is_none() {
            return Task::none();
        }
        let generation = self.templates.draft_debounce.bump();
        Task::perform(settle(DRAFT_DELAY, generation), |g| {
            Message::Templates(TemplatesMessage::DraftSettled(g))
        })
    }

    fn save_draft(&self) -> Task<Message> {
        let Some(repo) = self.drafts.clone() else {
            return Task::none();
        };
        Task::perform(store_draft(repo, self.templates.draft()), Message::DraftSaved)
    }

    /// Saves pending edits now instead of waiting for the debounce.
    fn flush_draft(&mut self) -> Task<Message> {
        if !self.templates.dirty {
            return Task::none();
        }
        self.templates.draft_debounce.bump();
        self.save_draft()
    }

    fn lookup_draft(&self) -> Task<Message> {
        let Some(repo) = self.drafts.clone() else {
            return Task::none();
        };
        Task::perform(
            load_draft(repo, self.templates.draft_key()),
            Message::DraftLoaded,
        )
    }

    fn delete_draft(&self, key: DraftKey) -> Task<Message> {
        let Some(repo) = self.drafts.clone() else {
            return Task::none();
        };
        Task::perform(remove_draft(repo, key), Message::DraftDeleted)
    }

    /// Handle sharing page messages.
    fn handle_sharing(&mut self, msg: SharingMessage) -> Task<Message> {
        match msg {
            SharingMessage::Option(option) => self.sharing.set_option(option),
            SharingMessage::EmailChanged(email) => self.sharing.email_input = email,
            SharingMessage::AddEmail => self.sharing.add_email(),
            SharingMessage::RemoveEmail(email) => self.sharing.remove_email(&email),
            SharingMessage::ThresholdChanged(input) => self.sharing.set_threshold_input(input),
            SharingMessage::Notify(on) => self.sharing.set_notify(on),
            SharingMessage::Reset => self.sharing.reset(),
            SharingMessage::Save => {
                if let Some(api) = self.api.clone()
                    && let Some(settings) = self.sharing.prepare_save()
                {
                    info!("Saving sharing settings: {}", settings.option.as_str());
                    return Task::perform(save_sharing(api, settings), Message::SharingSaved);
                }
            }
        }
        Task::none()
    }

    /// Handle settings messages.
    fn handle_settings(&mut self, msg: SettingsMessage) -> Task<Message> {
        match msg {
            SettingsMessage::ApiUrlChanged(url) => self.settings.api_url_input = url,
            SettingsMessage::UseMock(on) => self.settings.use_mock = on,
            SettingsMessage::PageSizeChanged(size) => self.settings.page_size_input = size,
            SettingsMessage::RefreshChanged(secs) => self.settings.refresh_input = secs,
            SettingsMessage::TokenChanged(token) => self.settings.token_input = token,
            SettingsMessage::ForgetToken => {
                let url = self.config.api_base_url.clone();
                return Task::perform(forget_token(url), Message::TokenForgotten);
            }
            SettingsMessage::Save => match self.settings.to_config(&self.config) {
                Ok(config) => {
                    self.settings.is_saving = true;
                    self.settings.error = None;
                    let new_token = Some(self.settings.token_input.trim().to_string())
                        .filter(|t| !t.is_empty());
                    return Task::perform(
                        save_config(config, new_token, self.api_token.clone()),
                        Message::ConfigSaved,
                    );
                }
                Err(e) => self.settings.error = Some(e),
            },
        }
        Task::none()
    }

    /// Render current state as UI.
    fn view(&self) -> Element<'_, Message> {
        let busy = self.dashboard.is_loading
            || self.records.is_loading
            || self.logs.is_loading
            || self.templates.is_loading
            || self.sharing.is_loading;
        let header = view::view_header(self.current_view, self.theme_mode, busy);

        let page = match self.current_view {
            View::Dashboard => view::view_dashboard(&self.dashboard),
            View::Records => view::view_records(&self.records),
            View::Logs => view::view_logs(&self.logs),
            View::Templates => view::view_templates(&self.templates),
            View::Sharing => view::view_sharing(&self.sharing),
            View::Settings => view::view_settings(&self.settings, self.theme_mode),
        };

        let content = container(
            column![view::view_breadcrumb(self.current_view), page]
                .spacing(16)
                .padding([20, 24]),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::widgets::page_style);

        let mut main_content = row![];
        if self.sidebar_visible {
            let failures = self.dashboard.summary.map_or(0, |s| s.failures());
            main_content = main_content.push(view::view_sidebar(self.current_view, failures));
        }
        main_content = main_content.push(content);

        let backend = self
            .api
            .as_ref()
            .map_or_else(|| "Not connected".to_string(), ApiClient::describe);
        let layout = column![
            header,
            main_content.height(Length::Fill),
            view::view_footer(backend, self.last_refresh),
        ]
        .width(Length::Fill)
        .height(Length::Fill);

        stack![layout, view::view_toasts(&self.toasts)].into()
    }

    /// Keyboard shortcuts, auto-refresh and toast expiry.
    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![keyboard::listen().map(|event| {
            if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
                handle_key_press(key, modifiers).unwrap_or(Message::Ignored)
            } else {
                Message::Ignored
            }
        })];

        if let Some(interval) = self.config.auto_refresh()
            && self.api.is_some()
        {
            subscriptions.push(iced::time::every(interval).map(|_| Message::AutoRefreshTick));
        }
        if !self.toasts.is_empty() {
            subscriptions.push(iced::time::every(TOAST_TICK).map(|_| Message::ToastTick));
        }
        Subscription::batch(subscriptions)
    }
}

/// Handle keyboard shortcuts and return appropriate message.
fn handle_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    let ctrl = modifiers.command(); // Ctrl on Linux/Windows, Cmd on macOS
    let shift = modifiers.shift();
    let press = |action| Some(Message::KeyPressed(action));

    match key {
        Key::Named(keyboard::key::Named::F5) => press(KeyboardAction::Refresh),
        Key::Named(keyboard::key::Named::Escape) => press(KeyboardAction::Cancel),
        Key::Character(c) if ctrl => match c.to_lowercase().as_str() {
            digit @ ("1" | "2" | "3" | "4" | "5") => {
                let index = digit.parse::<usize>().ok()?.checked_sub(1)?;
                press(KeyboardAction::Navigate(*View::NAVIGATION.get(index)?))
            }
            "b" if !shift => press(KeyboardAction::Bold),
            "i" if !shift => press(KeyboardAction::Italic),
            "u" if !shift => press(KeyboardAction::Underline),
            "z" if shift => press(KeyboardAction::Redo),
            "z" => press(KeyboardAction::Undo),
            "y" => press(KeyboardAction::Redo),
            "s" => press(KeyboardAction::Save),
            "," => press(KeyboardAction::Settings),
            _ => None,
        },
        _ => None,
    }
}

fn settings_path() -> std::path::PathBuf {
    maildesk_core::config::config_dir().join("settings.json")
}

/// Load UI preferences from file.
async fn load_settings() -> Result<AppSettings, String> {
    let settings_path = settings_path();

    if !settings_path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = tokio::fs::read_to_string(&settings_path)
        .await
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// Save UI preferences to file.
async fn save_settings(settings: AppSettings) -> Result<(), String> {
    let settings_path = settings_path();
    if let Some(dir) = settings_path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| e.to_string())?;
    }

    let contents = serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())?;

    tokio::fs::write(&settings_path, contents)
        .await
        .map_err(|e| e.to_string())?;

    tracing::info!("Settings saved to {:?}", settings_path);
    Ok(())
}

/// Load the configuration and the token stored for its backend.
async fn load_config() -> Result<(AppConfig, Option<String>), String> {
    async fn inner() -> anyhow::Result<(AppConfig, Option<String>)> {
        let config = AppConfig::load().await.context("loading config")?;
        let url = config.api_base_url.clone();
        let token = tokio::task::spawn_blocking(move || get_api_token(&url))
            .await
            .context("keyring task")?
            .unwrap_or_else(|e| {
                warn!("Could not read API token: {}", e);
                None
            });
        Ok((config, token))
    }
    inner().await.map_err(|e| format!("{e:#}"))
}

/// Save the configuration and, if given, a new token for its backend.
async fn save_config(
    config: AppConfig,
    new_token: Option<String>,
    current_token: Option<String>,
) -> Result<(AppConfig, Option<String>), String> {
    async fn inner(
        config: AppConfig,
        new_token: Option<String>,
        current_token: Option<String>,
    ) -> anyhow::Result<(AppConfig, Option<String>)> {
        config.save().await.context("saving config")?;
        let Some(token) = new_token else {
            return Ok((config, current_token));
        };
        let url = config.api_base_url.clone();
        let stored = token.clone();
        tokio::task::spawn_blocking(move || store_api_token(&url, &stored))
            .await
            .context("keyring task")?
            .context("storing API token")?;
        info!("API token stored for {}", config.api_base_url);
        Ok((config, Some(token)))
    }
    inner(config, new_token, current_token)
        .await
        .map_err(|e| format!("{e:#}"))
}

/// Remove the token stored for a backend.
async fn forget_token(base_url: String) -> Result<(), String> {
    tokio::task::spawn_blocking(move || delete_api_token(&base_url))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

/// Open the local draft store.
async fn open_draft_store() -> Result<DraftRepository, String> {
    DraftRepository::open_default()
        .await
        .map_err(|e| e.to_string())
}

async fn load_draft(repo: DraftRepository, key: DraftKey) -> Result<Option<Draft>, String> {
    repo.get(key).await.map_err(|e| e.to_string())
}

async fn store_draft(repo: DraftRepository, draft: Draft) -> Result<(), String> {
    repo.save(&draft).await.map_err(|e| e.to_string())
}

async fn remove_draft(repo: DraftRepository, key: DraftKey) -> Result<bool, String> {
    repo.delete(key).await.map_err(|e| e.to_string())
}

async fn fetch_summary(api: ApiClient) -> Result<StatusSummary, String> {
    api.status_summary().await.map_err(|e| e.to_string())
}

async fn fetch_records(api: ApiClient, query: RecordQuery) -> Result<Page<EmailRecord>, String> {
    api.list_records(&query).await.map_err(|e| e.to_string())
}

async fn resend_records(api: ApiClient, ids: Vec<RecordId>) -> Result<usize, String> {
    api.resend(&ids).await.map_err(|e| e.to_string())
}

async fn delete_records(api: ApiClient, ids: Vec<RecordId>) -> Result<usize, String> {
    api.delete_records(&ids).await.map_err(|e| e.to_string())
}

async fn fetch_logs(api: ApiClient, lines: usize) -> Result<String, String> {
    api.fetch_logs(lines).await.map_err(|e| e.to_string())
}

async fn fetch_templates(api: ApiClient) -> Result<Vec<EmailTemplate>, String> {
    api.list_templates().await.map_err(|e| e.to_string())
}

async fn save_template(api: ApiClient, template: EmailTemplate) -> Result<EmailTemplate, String> {
    api.save_template(&template).await.map_err(|e| e.to_string())
}

async fn fetch_sharing(api: ApiClient) -> Result<SharingSettings, String> {
    api.sharing_settings().await.map_err(|e| e.to_string())
}

async fn save_sharing(api: ApiClient, settings: SharingSettings) -> Result<SharingSettings, String> {
    api.save_sharing_settings(&settings)
        .await
        .map_err(|e| e.to_string())?;
    Ok(settings)
}

/// Show a desktop notification about new failures.
async fn notify_failures(added: u64, total: u64) -> Result<(), String> {
    tokio::task::spawn_blocking(move || {
        notify_rust::Notification::new()
            .summary("MailDesk: delivery failures")
            .body(&format!(
                "{added} new failed deliveries ({total} failed or bounced in total)"
            ))
            .show()
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}
