//! Text input and scrollable styles.

use iced::widget::{container, scrollable, text_input};
use iced::{Background, Border, Color};

use super::palette::{self, Palette};
use super::shadows::{self, radius};

fn field(p: &Palette, status: text_input::Status, edge: Option<Color>) -> text_input::Style {
    let (background, border, value) = match status {
        text_input::Status::Active => (p.raised, p.rule_strong, p.ink),
        text_input::Status::Hovered => (p.raised, p.ink_faint, p.ink),
        text_input::Status::Focused { .. } => (p.raised, p.accent, p.ink),
        text_input::Status::Disabled => (p.stripe, p.rule, p.ink_faint),
    };
    text_input::Style {
        background: Background::Color(background),
        border: Border {
            color: edge.unwrap_or(border),
            width: if edge.is_some() { 1.5 } else { 1.0 },
            radius: radius::MEDIUM.into(),
        },
        icon: p.ink_faint,
        placeholder: p.ink_faint,
        value,
        selection: p.highlight_edge,
    }
}

/// Filter, settings and editor inputs.
pub fn input_style(_theme: &iced::Theme, status: text_input::Status) -> text_input::Style {
    field(&palette::current(), status, None)
}

/// Input whose value failed validation: bad dates, thresholds, blank names.
pub fn invalid_input_style(_theme: &iced::Theme, status: text_input::Status) -> text_input::Style {
    let p = palette::current();
    field(&p, status, Some(p.danger))
}

/// Thin scrollbars that darken while hovered or dragged.
pub fn scrollable_style(_theme: &iced::Theme, status: scrollable::Status) -> scrollable::Style {
    let p = palette::current();
    let (vertical, horizontal) = match status {
        scrollable::Status::Active { .. } => (p.rule_strong, p.rule_strong),
        scrollable::Status::Hovered {
            is_vertical_scrollbar_hovered,
            is_horizontal_scrollbar_hovered,
            ..
        } => (
            if is_vertical_scrollbar_hovered { p.ink_faint } else { p.rule_strong },
            if is_horizontal_scrollbar_hovered { p.ink_faint } else { p.rule_strong },
        ),
        scrollable::Status::Dragged {
            is_vertical_scrollbar_dragged,
            is_horizontal_scrollbar_dragged,
            ..
        } => (
            if is_vertical_scrollbar_dragged { p.accent } else { p.rule_strong },
            if is_horizontal_scrollbar_dragged { p.accent } else { p.rule_strong },
        ),
    };
    let rail = |color: Color| scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: Background::Color(color),
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: radius::PILL.into(),
            },
        },
    };

    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: rail(vertical),
        horizontal_rail: rail(horizontal),
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: Background::Color(p.raised),
            border: Border {
                color: p.rule,
                width: 1.0,
                radius: radius::PILL.into(),
            },
            shadow: shadows::none(),
            icon: p.ink_soft,
        },
    }
}
