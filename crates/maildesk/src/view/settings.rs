//! Settings view.

use iced::widget::{Column, Space, button, column, row, scrollable, text, text_input, toggler};
use iced::{Alignment, Element, Length};

use maildesk_core::config::PAGE_SIZE_RANGE;

use crate::message::{Message, SettingsMessage};
use crate::model::SettingsState;
use crate::style::widgets::{
    ThemeMode, danger_button_style, input_style, palette, primary_button_style, scrollable_style,
};
use crate::view::components::{card, error_banner, muted, page_title, section_title};

fn settings(message: SettingsMessage) -> Message {
    Message::Settings(message)
}

/// Renders the settings view.
pub fn view_settings(state: &SettingsState, theme_mode: ThemeMode) -> Element<'_, Message> {
    let mut layout = Column::new()
        .spacing(16)
        .push(page_title("Settings", "Backend connection and appearance"))
        .width(Length::Fill)
        .max_width(760);

    if let Some(error) = &state.error {
        layout = layout.push(error_banner(error));
    }

    layout = layout
        .push(view_connection_section(state))
        .push(view_appearance_section(theme_mode))
        .push(view_about_section());

    scrollable(layout)
        .height(Length::Fill)
        .style(scrollable_style)
        .into()
}

/// Connection settings: backend URL, token and list behavior.
fn view_connection_section(state: &SettingsState) -> Element<'_, Message> {
    let mut api_url = text_input("http://localhost:5000/api", &state.api_url_input)
        .padding([6, 10])
        .size(14)
        .width(Length::Fill)
        .style(input_style);
    if !state.use_mock {
        api_url = api_url.on_input(|s| settings(SettingsMessage::ApiUrlChanged(s)));
    }

    let token_hint = if state.has_token {
        "A token is stored in the system keyring. Enter a new one to replace it."
    } else {
        "No token stored. Requests are sent without authorization."
    };

    let mut forget = button(text("Forget token").size(13))
        .padding([6, 14])
        .style(danger_button_style);
    if state.has_token {
        forget = forget.on_press(settings(SettingsMessage::ForgetToken));
    }

    let token = row![
        text_input("API token", &state.token_input)
            .on_input(|s| settings(SettingsMessage::TokenChanged(s)))
            .secure(true)
            .padding([6, 10])
            .size(14)
            .width(Length::Fill)
            .style(input_style),
        forget,
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let page_size = text_input("25", &state.page_size_input)
        .on_input(|s| settings(SettingsMessage::PageSizeChanged(s)))
        .padding([6, 10])
        .size(14)
        .width(Length::Fixed(100.0))
        .style(input_style);

    let refresh = text_input("0", &state.refresh_input)
        .on_input(|s| settings(SettingsMessage::RefreshChanged(s)))
        .padding([6, 10])
        .size(14)
        .width(Length::Fixed(100.0))
        .style(input_style);

    let save_label = if state.is_saving { "Saving\u{2026}" } else { "Save and reconnect" };
    let mut save = button(text(save_label).size(13))
        .padding([8, 18])
        .style(primary_button_style);
    if !state.is_saving {
        save = save.on_press(settings(SettingsMessage::Save));
    }

    card(
        column![
            section_title("Connection"),
            toggler(state.use_mock)
                .label("Use the built-in mock backend")
                .text_size(14)
                .on_toggle(|on| settings(SettingsMessage::UseMock(on))),
            settings_row("API URL", api_url),
            settings_row("Token", token),
            muted(token_hint, 12),
            settings_row(
                "Rows per page",
                row![
                    page_size,
                    muted(
                        format!("{} to {}", PAGE_SIZE_RANGE.start(), PAGE_SIZE_RANGE.end()),
                        12
                    ),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            ),
            settings_row(
                "Auto-refresh",
                row![refresh, muted("seconds, 0 turns it off", 12)]
                    .spacing(8)
                    .align_y(Alignment::Center),
            ),
            row![Space::new().width(Length::Fill), save],
        ]
        .spacing(12),
    )
}

/// Appearance settings section with theme toggle.
fn view_appearance_section(theme_mode: ThemeMode) -> Element<'static, Message> {
    let is_dark = theme_mode == ThemeMode::Dark;
    let theme_label = if is_dark { "Dark Mode" } else { "Light Mode" };

    let theme_description = if is_dark {
        "Using dark theme for reduced eye strain"
    } else {
        "Using light theme for bright environments"
    };

    card(
        column![
            section_title("Appearance"),
            settings_row(
                "Theme",
                toggler(is_dark)
                    .label(theme_label)
                    .on_toggle(|_| Message::ToggleTheme)
                    .text_size(14)
                    .width(Length::Shrink),
            ),
            muted(theme_description, 12),
        ]
        .spacing(12),
    )
}

/// About section.
fn view_about_section() -> Element<'static, Message> {
    card(
        column![
            section_title("About"),
            settings_row("Version", muted(env!("CARGO_PKG_VERSION"), 14)),
            muted(
                "Desktop dashboard for the email sender: delivery records, logs, templates and Drive sharing.",
                13
            ),
            muted("Built with the iced GUI framework", 12),
        ]
        .spacing(8),
    )
}

/// Creates a settings row with a fixed-width label.
fn settings_row<'a>(label: &'static str, value: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    row![
        text(label)
            .size(14)
            .style(|_theme| text::Style {
                color: Some(palette::current().ink_soft),
            })
            .width(Length::Fixed(120.0)),
        value.into(),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
