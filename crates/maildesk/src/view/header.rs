//! Header/toolbar view component.

use iced::widget::{Row, Space, button, container, row, text};
use iced::{Element, Length};

use crate::message::{Message, View};
use crate::style::widgets::{
    header_style, palette, palette::ThemeMode, primary_button_style, secondary_button_style,
};
use crate::view::components::BOLD;

fn icon_text(glyph: &'static str, size: u32) -> text::Text<'static> {
    text(glyph).size(size).style(|_theme| {
        let p = palette::current();
        text::Style {
            color: Some(p.ink_soft),
        }
    })
}

/// Renders the application header.
pub fn view_header(current: View, theme_mode: ThemeMode, busy: bool) -> Element<'static, Message> {
    let title = text("MailDesk").size(22).font(BOLD).style(|_theme| {
        let p = palette::current();
        text::Style {
            color: Some(p.accent),
        }
    });

    let subtitle = text("Email Management").size(13).style(|_theme| {
        let p = palette::current();
        text::Style {
            color: Some(p.ink_faint),
        }
    });

    let hamburger = button(icon_text("\u{2630}", 20))
        .padding([8, 12])
        .style(secondary_button_style)
        .on_press(Message::ToggleSidebar);

    let refresh_label = if busy { "Loading\u{2026}" } else { "\u{21BB} Refresh" };
    let mut refresh_btn = button(text(refresh_label).size(13))
        .padding([8, 16])
        .style(primary_button_style);
    if !busy && current != View::Settings {
        refresh_btn = refresh_btn.on_press(Message::Refresh);
    }

    let theme_icon = match theme_mode {
        ThemeMode::Light => "\u{263E}",
        ThemeMode::Dark => "\u{2600}",
    };
    let theme_btn = button(icon_text(theme_icon, 18))
        .padding([8, 12])
        .style(secondary_button_style)
        .on_press(Message::ToggleTheme);

    let settings_btn = button(icon_text("\u{2699}", 20))
        .padding([8, 12])
        .style(secondary_button_style)
        .on_press(Message::NavigateTo(View::Settings));

    let header_content: Row<'_, Message> = row![
        hamburger,
        title,
        subtitle,
        Space::new().width(Length::Fill),
        refresh_btn,
        theme_btn,
        settings_btn,
    ]
    .spacing(12)
    .padding([12, 20])
    .align_y(iced::Alignment::Center);

    container(header_content)
        .width(Length::Fill)
        .style(header_style)
        .into()
}
