//! Container styles: window chrome, cards, table rows and badges.

use iced::widget::container;
use iced::{Background, Border, Color};

use maildesk_core::{DeliveryStatus, LogLevel};

use super::palette::{self, tint};
use super::shadows::{self, radius};

fn boxed(background: Color, edge: Color, corner: f32) -> container::Style {
    container::Style {
        background: Some(Background::Color(background)),
        border: Border {
            color: edge,
            width: 1.0,
            radius: corner.into(),
        },
        ..Default::default()
    }
}

/// Top bar.
pub fn header_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    boxed(p.panel, p.rule, radius::NONE)
}

/// Navigation sidebar.
pub fn sidebar_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    boxed(p.panel, p.rule, radius::NONE)
}

/// Status bar with backend name and last refresh time.
pub fn footer_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        text_color: Some(p.ink_faint),
        ..boxed(p.well, p.rule, radius::NONE)
    }
}

/// Page background behind the cards.
pub fn page_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        background: Some(Background::Color(p.canvas)),
        text_color: Some(p.ink),
        ..Default::default()
    }
}

pub fn card_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        shadow: shadows::card(),
        ..boxed(p.raised, p.rule, radius::LARGE)
    }
}

/// Recessed panel for log payloads and template previews.
pub fn sunken_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    boxed(p.well, p.rule, radius::SMALL)
}

/// Band around filter rows, the bulk action bar and the editor toolbar.
pub fn toolbar_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    boxed(p.stripe, p.rule, radius::MEDIUM)
}

/// Column headers of the records table.
pub fn table_header_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        text_color: Some(p.ink_soft),
        ..boxed(p.stripe, p.rule_strong, radius::NONE)
    }
}

/// A records table row. Selected rows are highlighted; failed and bounced
/// rows carry a faint tint of their status color.
pub fn record_row_style(
    status: DeliveryStatus,
    selected: bool,
) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();
        let background = if selected {
            p.highlight
        } else if status.is_failure() {
            tint(p.status_color(status), 0.05)
        } else {
            p.panel
        };
        let edge = if selected { p.highlight_edge } else { p.rule };
        boxed(background, edge, radius::NONE)
    }
}

/// A log entry row, tinted for warnings and above.
pub fn log_entry_style(level: LogLevel, expanded: bool) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();
        let background = if expanded {
            p.highlight
        } else if level.is_error() || matches!(level, LogLevel::Warning) {
            tint(p.level_color(&level), 0.06)
        } else {
            p.panel
        };
        boxed(background, p.rule, radius::NONE)
    }
}

/// Pill behind a status, level or recipient label.
pub fn badge_style(color: Color) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| container::Style {
        text_color: Some(color),
        ..boxed(tint(color, 0.14), tint(color, 0.5), radius::PILL)
    }
}

/// Banner for a failed load or save.
pub fn alert_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        text_color: Some(p.danger),
        ..boxed(tint(p.danger, 0.08), p.danger, radius::MEDIUM)
    }
}

/// Toast with an edge in its kind's color.
pub fn toast_style(accent: Color) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();
        container::Style {
            shadow: shadows::floating(),
            text_color: Some(p.ink),
            ..boxed(p.raised, accent, radius::LARGE)
        }
    }
}
