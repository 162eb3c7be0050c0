//! Shadow presets and corner radii.

use iced::{Shadow, Vector};

use super::palette;

/// Corner radii.
pub mod radius {
    pub const NONE: f32 = 0.0;
    pub const SMALL: f32 = 4.0;
    pub const MEDIUM: f32 = 6.0;
    pub const LARGE: f32 = 10.0;
    pub const PILL: f32 = 999.0;
}

pub fn none() -> Shadow {
    Shadow::default()
}

/// Resting elevation for cards.
pub fn card() -> Shadow {
    Shadow {
        color: palette::current().shadow,
        offset: Vector::new(0.0, 1.0),
        blur_radius: 2.0,
    }
}

/// Floating elevation for toasts and the pressed accent button.
pub fn floating() -> Shadow {
    Shadow {
        color: palette::current().shadow_strong,
        offset: Vector::new(0.0, 6.0),
        blur_radius: 16.0,
    }
}
