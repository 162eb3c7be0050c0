//! Dashboard colors for the light and dark themes.
//!
//! Style functions read the active palette through [`current`]; switching
//! theme only calls [`set_theme`].

use std::sync::{LazyLock, RwLock};

use iced::Color;

use maildesk_core::{DeliveryStatus, LogLevel};

/// Application theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Semantic colors used by the dashboard widgets.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Buttons, links and the current page marker.
    pub accent: Color,
    pub accent_hover: Color,
    pub accent_pressed: Color,
    /// Text drawn on top of `accent`.
    pub on_accent: Color,

    /// Window background behind the cards.
    pub canvas: Color,
    /// Header, sidebar and table rows.
    pub panel: Color,
    /// Cards, inputs and toasts.
    pub raised: Color,
    /// Recessed areas: log payloads, previews, footer.
    pub well: Color,
    /// Table header band.
    pub stripe: Color,

    pub ink: Color,
    pub ink_soft: Color,
    pub ink_faint: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub critical: Color,

    /// Selected rows and the focused template block.
    pub highlight: Color,
    pub highlight_edge: Color,
    pub hover: Color,

    pub rule: Color,
    pub rule_strong: Color,

    pub shadow: Color,
    pub shadow_strong: Color,
}

impl Palette {
    /// Slate on white with an indigo accent.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            accent: Color::from_rgb(0.31, 0.36, 0.90),
            accent_hover: Color::from_rgb(0.42, 0.47, 0.95),
            accent_pressed: Color::from_rgb(0.24, 0.28, 0.75),
            on_accent: Color::WHITE,

            canvas: Color::from_rgb(0.953, 0.961, 0.973),
            panel: Color::WHITE,
            raised: Color::WHITE,
            well: Color::from_rgb(0.973, 0.976, 0.984),
            stripe: Color::from_rgb(0.937, 0.945, 0.961),

            ink: Color::from_rgb(0.07, 0.09, 0.15),
            ink_soft: Color::from_rgb(0.29, 0.33, 0.41),
            ink_faint: Color::from_rgb(0.58, 0.62, 0.69),

            info: Color::from_rgb(0.15, 0.45, 0.92),
            success: Color::from_rgb(0.09, 0.60, 0.36),
            warning: Color::from_rgb(0.85, 0.55, 0.04),
            danger: Color::from_rgb(0.86, 0.15, 0.15),
            critical: Color::from_rgb(0.58, 0.20, 0.85),

            highlight: Color::from_rgb(0.93, 0.94, 1.0),
            highlight_edge: Color::from_rgb(0.51, 0.55, 0.97),
            hover: Color::from_rgb(0.965, 0.969, 0.98),

            rule: Color::from_rgb(0.89, 0.91, 0.94),
            rule_strong: Color::from_rgb(0.80, 0.83, 0.88),

            shadow: Color::from_rgba(0.06, 0.09, 0.16, 0.05),
            shadow_strong: Color::from_rgba(0.06, 0.09, 0.16, 0.12),
        }
    }

    /// Near-black slate with a softer indigo accent.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            accent: Color::from_rgb(0.51, 0.55, 0.97),
            accent_hover: Color::from_rgb(0.63, 0.66, 0.99),
            accent_pressed: Color::from_rgb(0.40, 0.44, 0.90),
            on_accent: Color::from_rgb(0.06, 0.07, 0.12),

            canvas: Color::from_rgb(0.059, 0.067, 0.090),
            panel: Color::from_rgb(0.086, 0.098, 0.125),
            raised: Color::from_rgb(0.110, 0.122, 0.153),
            well: Color::from_rgb(0.071, 0.078, 0.102),
            stripe: Color::from_rgb(0.125, 0.137, 0.169),

            ink: Color::from_rgb(0.90, 0.92, 0.95),
            ink_soft: Color::from_rgb(0.66, 0.69, 0.75),
            ink_faint: Color::from_rgb(0.46, 0.49, 0.56),

            info: Color::from_rgb(0.38, 0.65, 0.98),
            success: Color::from_rgb(0.20, 0.83, 0.53),
            warning: Color::from_rgb(0.98, 0.75, 0.14),
            danger: Color::from_rgb(0.97, 0.44, 0.44),
            critical: Color::from_rgb(0.75, 0.52, 0.99),

            highlight: Color::from_rgb(0.15, 0.16, 0.29),
            highlight_edge: Color::from_rgb(0.40, 0.44, 0.90),
            hover: Color::from_rgb(0.13, 0.14, 0.18),

            rule: Color::from_rgb(0.17, 0.19, 0.23),
            rule_strong: Color::from_rgb(0.25, 0.27, 0.32),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.25),
            shadow_strong: Color::from_rgba(0.0, 0.0, 0.0, 0.40),
        }
    }

    #[must_use]
    pub const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Color of a delivery status in badges, chips and row markers.
    #[must_use]
    pub const fn status_color(&self, status: DeliveryStatus) -> Color {
        match status {
            DeliveryStatus::Pending => self.warning,
            DeliveryStatus::Sent => self.info,
            DeliveryStatus::Delivered => self.success,
            DeliveryStatus::Failed => self.danger,
            DeliveryStatus::Bounced => self.critical,
        }
    }

    /// Color of a log level in badges, chips and entry tints.
    #[must_use]
    pub const fn level_color(&self, level: &LogLevel) -> Color {
        match level {
            LogLevel::Debug | LogLevel::Other(_) => self.ink_faint,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.danger,
            LogLevel::Critical => self.critical,
        }
    }
}

/// `color` at the given opacity, for tinted backgrounds.
#[must_use]
pub const fn tint(color: Color, alpha: f32) -> Color {
    Color { a: alpha, ..color }
}

static CURRENT: LazyLock<RwLock<Palette>> = LazyLock::new(|| RwLock::new(Palette::light()));

/// Switches the palette every style function reads.
pub fn set_theme(mode: ThemeMode) {
    if let Ok(mut palette) = CURRENT.write() {
        *palette = Palette::for_mode(mode);
    }
}

/// Copy of the active palette.
#[must_use]
pub fn current() -> Palette {
    CURRENT.read().map_or_else(|_| Palette::light(), |p| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_share_the_danger_color() {
        let p = Palette::light();
        assert_eq!(p.status_color(DeliveryStatus::Failed), p.danger);
        assert_eq!(p.level_color(&LogLevel::Error), p.danger);
        assert_eq!(p.level_color(&LogLevel::Other("TRACE".into())), p.ink_faint);
    }

    #[test]
    fn test_tint_keeps_channels() {
        let c = tint(Palette::dark().success, 0.2);
        assert!((c.a - 0.2).abs() < f32::EPSILON);
        assert!((c.g - Palette::dark().success.g).abs() < f32::EPSILON);
    }
}
