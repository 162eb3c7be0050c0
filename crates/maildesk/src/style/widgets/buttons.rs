//! Button styles.
//!
//! Fixed styles are plain functions. Styles that depend on view state
//! (selected page, active filter, focused block) take that state and return
//! a closure.

use iced::widget::button;
use iced::{Background, Border, Color};

use maildesk_core::{DeliveryStatus, LogLevel};

use super::palette::{self, Palette, tint};
use super::shadows::{self, radius};

fn build(background: Color, text_color: Color, edge: Color, corner: f32) -> button::Style {
    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: edge,
            width: if edge.a > 0.0 { 1.0 } else { 0.0 },
            radius: corner.into(),
        },
        shadow: shadows::none(),
        snap: false,
    }
}

/// Solid button in `color`, used for the accent and for active chips.
fn filled(p: &Palette, color: Color, status: button::Status, corner: f32) -> button::Style {
    match status {
        button::Status::Active => build(color, p.on_accent, color, corner),
        button::Status::Hovered => build(tint(color, 0.88), p.on_accent, color, corner),
        button::Status::Pressed => button::Style {
            shadow: shadows::floating(),
            ..build(color, p.on_accent, p.ink, corner)
        },
        button::Status::Disabled => build(p.stripe, p.ink_faint, p.rule, corner),
    }
}

/// Transparent button that picks up `hover` and `highlight` backgrounds.
fn ghost(p: &Palette, status: button::Status, text_color: Color, corner: f32) -> button::Style {
    let clear = Color::TRANSPARENT;
    match status {
        button::Status::Active => build(clear, text_color, clear, corner),
        button::Status::Hovered => build(p.hover, text_color, p.rule, corner),
        button::Status::Pressed => build(p.highlight, text_color, p.rule, corner),
        button::Status::Disabled => build(clear, p.ink_faint, clear, corner),
    }
}

/// Save, apply and other confirming actions.
pub fn primary_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();
    match status {
        button::Status::Hovered => build(p.accent_hover, p.on_accent, p.accent_hover, radius::MEDIUM),
        button::Status::Pressed => build(p.accent_pressed, p.on_accent, p.accent_pressed, radius::MEDIUM),
        _ => filled(&p, p.accent, status, radius::MEDIUM),
    }
}

/// Outlined neutral button: clear, cancel, reset, pagination arrows.
pub fn secondary_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();
    match status {
        button::Status::Active => build(p.raised, p.ink, p.rule_strong, radius::MEDIUM),
        button::Status::Hovered => build(p.hover, p.ink, p.ink_faint, radius::MEDIUM),
        button::Status::Pressed => build(p.highlight, p.ink, p.highlight_edge, radius::MEDIUM),
        button::Status::Disabled => build(p.raised, p.ink_faint, p.rule, radius::MEDIUM),
    }
}

/// Bulk delete and forget-token, red outline that fills on hover.
pub fn danger_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();
    match status {
        button::Status::Active => build(Color::TRANSPARENT, p.danger, p.danger, radius::MEDIUM),
        button::Status::Disabled => build(Color::TRANSPARENT, p.ink_faint, p.rule, radius::MEDIUM),
        _ => filled(&p, p.danger, status, radius::MEDIUM),
    }
}

/// Clickable table row, log entry or link cell.
pub fn row_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();
    ghost(&p, status, p.ink, radius::NONE)
}

/// Sidebar page and template list entry; `selected` marks the open one.
pub fn nav_style(selected: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let p = palette::current();
        if selected {
            build(p.highlight, p.accent, p.highlight_edge, radius::MEDIUM)
        } else {
            ghost(&p, status, p.ink_soft, radius::MEDIUM)
        }
    }
}

/// Template block in the editor; the focused block is outlined.
pub fn block_style(focused: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let p = palette::current();
        if focused {
            build(p.raised, p.ink, p.highlight_edge, radius::SMALL)
        } else {
            ghost(&p, status, p.ink, radius::SMALL)
        }
    }
}

/// Formatting toolbar button; `active` when the mark or block kind applies
/// at the selection.
pub fn format_button_style(active: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let p = palette::current();
        match (active, status) {
            (_, button::Status::Disabled) => build(p.raised, p.ink_faint, p.rule, radius::SMALL),
            (true, _) => build(p.highlight, p.accent, p.highlight_edge, radius::SMALL),
            (false, button::Status::Active) => build(p.raised, p.ink, p.rule, radius::SMALL),
            (false, _) => build(p.hover, p.ink, p.rule_strong, radius::SMALL),
        }
    }
}

/// Page number in the pagination bar.
pub fn page_button_style(current: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |theme, status| {
        if current {
            let p = palette::current();
            filled(&p, p.accent, button::Status::Active, radius::SMALL)
        } else {
            let style = secondary_button_style(theme, status);
            button::Style {
                border: Border {
                    radius: radius::SMALL.into(),
                    ..style.border
                },
                ..style
            }
        }
    }
}

fn chip(p: &Palette, color: Color, active: bool, status: button::Status) -> button::Style {
    if active {
        return filled(p, color, status, radius::PILL);
    }
    match status {
        button::Status::Hovered | button::Status::Pressed => {
            build(tint(color, 0.12), p.ink, color, radius::PILL)
        }
        _ => build(p.raised, p.ink_soft, p.rule_strong, radius::PILL),
    }
}

/// Records status filter; `None` is the "All" chip and uses the accent.
pub fn status_chip_style(
    status: Option<DeliveryStatus>,
    active: bool,
) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, button_status| {
        let p = palette::current();
        let color = status.map_or(p.accent, |s| p.status_color(s));
        chip(&p, color, active, button_status)
    }
}

/// Log level filter chip in the level's color.
pub fn level_chip_style(
    level: LogLevel,
    active: bool,
) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let p = palette::current();
        chip(&p, p.level_color(&level), active, status)
    }
}
