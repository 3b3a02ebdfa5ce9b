//! Terminal event handlers registered with the
//! [`HandlerRegistry`](crate::controller::handler_registry::HandlerRegistry).

use crossterm::event::{Event, KeyEvent, KeyEventKind};

pub mod app_handler;
pub mod mouse_handler;
pub mod overlay_handler;
pub mod shortcut_handler;

pub use app_handler::AppHandler;
pub use mouse_handler::MouseHandler;
pub use overlay_handler::OverlayHandler;
pub use shortcut_handler::ShortcutHandler;

/// The key event behind `event`, if it is a press.
///
/// Terminals with keyboard enhancement also report repeats and releases;
/// only presses drive the overlay.
pub(crate) fn key_press(event: &Event) -> Option<&KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}
