//! Small presentation pieces shared by the pages.

use chrono::{DateTime, Utc};
use iced::widget::{Column, Space, button, column, container, row, text};
use iced::{Alignment, Color, Element, Font, Length, Pixels};

use maildesk_core::dates::format_relative;
use maildesk_core::{CheckState, DeliveryStatus, LogLevel};

use crate::message::{Message, View};
use crate::model::{ToastKind, Toasts};
use crate::style::widgets::{
    alert_style, badge_style, card_style, footer_style, palette, row_button_style, toast_style,
};

pub const BOLD: Font = Font {
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

pub const SEMIBOLD: Font = Font {
    weight: iced::font::Weight::Semibold,
    ..Font::DEFAULT
};

pub const MONOSPACE: Font = Font::MONOSPACE;

/// Text in the primary text color.
pub fn label<'a>(content: impl text::IntoFragment<'a>, size: impl Into<Pixels>) -> text::Text<'a> {
    text(content).size(size).style(|_theme| text::Style {
        color: Some(palette::current().ink),
    })
}

/// Text in the secondary text color.
pub fn muted<'a>(content: impl text::IntoFragment<'a>, size: impl Into<Pixels>) -> text::Text<'a> {
    text(content).size(size).style(|_theme| text::Style {
        color: Some(palette::current().ink_soft),
    })
}

/// Page heading.
pub fn page_title<'a>(title: &'a str, subtitle: &'a str) -> Element<'a, Message> {
    column![label(title, 24).font(BOLD), muted(subtitle, 13)]
        .spacing(4)
        .into()
}

/// Section heading inside a card.
pub fn section_title(title: &str) -> text::Text<'_> {
    text(title.to_uppercase())
        .size(11)
        .font(BOLD)
        .style(|_theme| text::Style {
            color: Some(palette::current().ink_faint),
        })
}

/// Rounded pill with a colored label.
pub fn badge<'a>(label: impl text::IntoFragment<'a>, color: Color) -> Element<'a, Message> {
    container(text(label).size(11).font(SEMIBOLD).color(color))
        .padding([2, 8])
        .style(badge_style(color))
        .into()
}

pub fn status_badge(status: DeliveryStatus) -> Element<'static, Message> {
    badge(status.label(), palette::current().status_color(status))
}

pub fn level_badge(level: &LogLevel) -> Element<'static, Message> {
    badge(level.label().to_string(), palette::current().level_color(level))
}

/// White card with padding.
pub fn card<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

/// Red banner for a failed load.
pub fn error_banner(message: &str) -> Element<'_, Message> {
    let p = palette::current();
    container(
        row![
            text("\u{26A0}").size(14).color(p.danger),
            text(message).size(13).color(p.danger),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    )
    .padding([10, 14])
    .width(Length::Fill)
    .style(alert_style)
    .into()
}

/// Centered placeholder for empty or loading content.
pub fn empty_state(message: &str) -> Element<'_, Message> {
    container(muted(message, 14))
        .padding(32)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

/// Checkbox drawn as a glyph button so it can show a partial state.
pub fn check_box(state: CheckState, on_press: Message) -> Element<'static, Message> {
    let glyph = match state {
        CheckState::Unchecked => "\u{2610}",
        CheckState::Checked => "\u{2611}",
        CheckState::Partial => "\u{25A3}",
    };
    button(text(glyph).size(16).style(move |_theme| {
        let p = palette::current();
        text::Style {
            color: Some(if state == CheckState::Unchecked {
                p.ink_faint
            } else {
                p.accent
            }),
        }
    }))
    .padding([0, 4])
    .style(row_button_style)
    .on_press(on_press)
    .into()
}

/// `Home / Page` trail.
pub fn view_breadcrumb(current: View) -> Element<'static, Message> {
    let home = button(muted("Home", 12))
        .padding(0)
        .style(row_button_style)
        .on_press(Message::NavigateTo(View::Dashboard));
    row![
        home,
        muted("/", 12),
        label(current.title(), 12).font(SEMIBOLD)
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

/// Status bar with the backend and the time of the last refresh.
pub fn view_footer(backend: String, last_refresh: Option<DateTime<Utc>>) -> Element<'static, Message> {
    let refreshed = last_refresh.map_or_else(
        || "Not refreshed yet".to_string(),
        |at| format!("Updated {}", format_relative(&at, Utc::now())),
    );
    container(
        row![
            muted(format!("Backend: {backend}"), 11),
            Space::new().width(Length::Fill),
            muted(refreshed, 11),
        ]
        .align_y(Alignment::Center),
    )
    .padding([6, 16])
    .width(Length::Fill)
    .style(footer_style)
    .into()
}

/// Toast stack in the bottom-right corner.
pub fn view_toasts<'a>(toasts: &'a Toasts) -> Element<'a, Message> {
    if toasts.is_empty() {
        return Space::new().width(0).into();
    }
    let p = palette::current();
    let items = toasts.iter().map(|toast| -> Element<'a, Message> {
        let (icon, accent) = match toast.kind {
            ToastKind::Success => ("\u{2713}", p.success),
            ToastKind::Info => ("\u{2139}", p.info),
            ToastKind::Error => ("\u{2717}", p.danger),
        };
        let close = button(muted("\u{2715}", 12))
            .padding([0, 4])
            .style(row_button_style)
            .on_press(Message::DismissToast(toast.id));
        container(
            row![
                text(icon).size(14).color(accent),
                label(toast.message.as_str(), 13).width(Length::Fill),
                close,
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        )
        .padding([10, 14])
        .width(Length::Fixed(340.0))
        .style(toast_style(accent))
        .into()
    });

    container(Column::with_children(items).spacing(8))
        .padding(20)
        .align_right(Length::Fill)
        .align_bottom(Length::Fill)
        .into()
}
