//! src/view/icons.rs
//! ============================================================================
//! # Result Group Icons (Nerd Fonts)
//!
//! Backends name icons with Font-Awesome keys (`fa-address-book`). The
//! terminal shows the matching Nerd Font glyph.

pub const FILE_ICON: &str = "\u{f15b}";
pub const SEARCH_ICON: &str = "\u{f002}";

const ICONS: [(&str, &str); 7] = [
    ("fa-address-book", "\u{f2b9}"),
    ("fa-shopping-cart", "\u{f07a}"),
    ("fa-folder", "\u{f07b}"),
    ("fa-tasks", "\u{f0ae}"),
    ("fa-file-text", "\u{f15c}"),
    ("fa-filter", "\u{f0b0}"),
    ("fa-file", FILE_ICON),
];

/// Glyph for an icon key; unknown keys get the generic file glyph.
pub fn glyph(key: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(FILE_ICON, |(_, glyph)| glyph)
}
