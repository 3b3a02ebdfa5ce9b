//! Global Ctrl+K / Cmd+K shortcut.
//!
//! Runs before every other handler and captures the chord, so the key
//! never reaches the search input or the host: the overlay toggles
//! whether it is open or not.

use crossterm::event::{Event, KeyCode, KeyModifiers};
use tracing::debug;

use crate::{
    controller::{
        actions::Action,
        handler_registry::{EventHandler, HandlerContext},
        handlers::key_press,
    },
    error::AppError,
};

#[derive(Debug, Default)]
pub struct ShortcutHandler;

impl ShortcutHandler {
    pub fn new() -> Self {
        Self
    }

    /// Ctrl or the platform command key (reported as SUPER) with `k`, any case.
    pub fn is_toggle_chord(code: KeyCode, modifiers: KeyModifiers) -> bool {
        matches!(code, KeyCode::Char('k' | 'K'))
            && modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
    }
}

impl EventHandler for ShortcutHandler {
    fn can_handle(&self, event: &Event, _ctx: &HandlerContext<'_>) -> bool {
        key_press(event).is_some_and(|key| Self::is_toggle_chord(key.code, key.modifiers))
    }

    fn handle(&mut self, _event: &Event, ctx: &HandlerContext<'_>) -> Result<Vec<Action>, AppError> {
        debug!(
            "Toggle shortcut pressed (overlay open: {})",
            ctx.overlay_open
        );
        Ok(vec![Action::ToggleOverlay])
    }

    fn priority(&self) -> u8 {
        0
    }

    fn captures(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "ShortcutHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{controller::handlers::test_keys::*, view::hit_map::HitMap};
    use crossterm::event::{KeyEvent, KeyEventKind};

    fn ctx(hits: &HitMap, overlay_open: bool) -> HandlerContext<'_> {
        HandlerContext { overlay_open, hits }
    }

    #[test]
    fn ctrl_or_super_k_toggles_in_any_case() {
        let hits = HitMap::default();
        let handler = ShortcutHandler::new();
        for event in [
            ctrl('k'),
            ctrl('K'),
            with(KeyCode::Char('k'), KeyModifiers::SUPER),
            with(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
        ] {
            assert!(handler.can_handle(&event, &ctx(&hits, false)), "{event:?}");
            assert!(handler.can_handle(&event, &ctx(&hits, true)), "{event:?}");
        }
    }

    #[test]
    fn ignores_plain_k_and_other_chords() {
        let hits = HitMap::default();
        let handler = ShortcutHandler::new();
        assert!(!handler.can_handle(&ch('k'), &ctx(&hits, false)));
        assert!(!handler.can_handle(&ctrl('j'), &ctx(&hits, false)));
        assert!(!handler.can_handle(
            &with(KeyCode::Char('k'), KeyModifiers::ALT),
            &ctx(&hits, false)
        ));
    }

    #[test]
    fn ignores_key_release() {
        let hits = HitMap::default();
        let mut release = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        release.kind = KeyEventKind::Release;
        assert!(!ShortcutHandler::new().can_handle(&Event::Key(release), &ctx(&hits, true)));
    }

    #[test]
    fn emits_toggle() {
        let hits = HitMap::default();
        let actions = ShortcutHandler::new()
            .handle(&ctrl('k'), &ctx(&hits, true))
            .expect("shortcut never fails");
        assert_eq!(actions, vec![Action::ToggleOverlay]);
    }
}
