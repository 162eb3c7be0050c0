//! Widget styles for the dashboard.

#![allow(clippy::needless_update)]

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use palette::ThemeMode;

pub use containers::{
    alert_style, badge_style, card_style, footer_style, header_style, log_entry_style, page_style,
    record_row_style, sidebar_style, sunken_style, table_header_style, toast_style, toolbar_style,
};

pub use buttons::{
    block_style, danger_button_style, format_button_style, level_chip_style, nav_style,
    page_button_style, primary_button_style, row_button_style, secondary_button_style,
    status_chip_style,
};

pub use inputs::{input_style, invalid_input_style, scrollable_style};
