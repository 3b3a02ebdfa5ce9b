//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Color constants for the Catppuccin Mocha theme and the styles the
//! spotlight overlay is drawn with.
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

/// Initialize theme colors - logs color palette information
#[instrument(level = "debug")]
pub fn init_theme() {
    debug!("Initializing Catppuccin Mocha theme");
    debug!("Background: {:?}", BACKGROUND);
    debug!("Foreground: {:?}", FOREGROUND);
    debug!("Current line: {:?}", CURRENT_LINE);
}

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const MANTLE: Color = Color::Rgb(24, 24, 37); // Mantle
pub const CRUST: Color = Color::Rgb(17, 17, 27); // Crust
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub fn toolbar_style() -> Style {
    Style::default().bg(MANTLE).fg(FOREGROUND)
}

pub fn trigger_style(overlay_open: bool) -> Style {
    if overlay_open {
        Style::default().bg(PURPLE).fg(CRUST).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(CURRENT_LINE).fg(FOREGROUND)
    }
}

pub fn main_view_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn main_view_border_style() -> Style {
    Style::default().fg(COMMENT)
}

/// Everything behind the open dialog.
pub fn backdrop_style() -> Style {
    Style::default().bg(CRUST).fg(COMMENT)
}

pub fn overlay_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn overlay_border_style() -> Style {
    Style::default().fg(PURPLE)
}

pub fn input_style() -> Style {
    Style::default().fg(FOREGROUND)
}

pub fn input_prompt_style() -> Style {
    Style::default().fg(CYAN)
}

pub fn separator_style() -> Style {
    Style::default().fg(CURRENT_LINE)
}

pub fn group_header_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn record_style() -> Style {
    Style::default().fg(FOREGROUND)
}

pub fn selected_record_style() -> Style {
    Style::default()
        .bg(CURRENT_LINE)
        .fg(GREEN)
        .add_modifier(Modifier::BOLD)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(COMMENT).add_modifier(Modifier::ITALIC)
}
