//! Keys delivered to the focused search input while the overlay is open.
//!
//! | Key       | Action            |
//! |-----------|-------------------|
//! | Esc       | close overlay     |
//! | Down      | next result       |
//! | Up        | previous result   |
//! | Enter     | open highlighted  |
//! | Backspace | delete last char  |
//! | printable | append to query   |
//!
//! Every key is captured so the host never sees typing meant for the input.
//! Chords with Ctrl are left alone for the shortcut and app handlers.

use crossterm::event::{Event, KeyCode, KeyModifiers};
use tracing::trace;

use crate::{
    controller::{
        actions::Action,
        handler_registry::{EventHandler, HandlerContext},
        handlers::key_press,
    },
    error::AppError,
};

#[derive(Debug, Default)]
pub struct OverlayHandler;

impl OverlayHandler {
    pub fn new() -> Self {
        Self
    }

    fn map_key(code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => Action::CloseOverlay,
            KeyCode::Down => Action::SelectNext,
            KeyCode::Up => Action::SelectPrevious,
            KeyCode::Enter => Action::ActivateSelected,
            KeyCode::Backspace => Action::DeleteChar,
            KeyCode::Char(c) => Action::InsertChar(c),
            _ => Action::NoOp,
        }
    }
}

impl EventHandler for OverlayHandler {
    fn can_handle(&self, event: &Event, ctx: &HandlerContext<'_>) -> bool {
        ctx.overlay_open
            && key_press(event).is_some_and(|key| !key.modifiers.contains(KeyModifiers::CONTROL))
    }

    fn handle(&mut self, event: &Event, _ctx: &HandlerContext<'_>) -> Result<Vec<Action>, AppError> {
        let Some(key) = key_press(event) else {
            return Ok(Vec::new());
        };
        let action = Self::map_key(key.code);
        trace!("Overlay key {:?} -> {:?}", key.code, action);
        Ok(vec![action])
    }

    fn priority(&self) -> u8 {
        10
    }

    fn captures(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "OverlayHandler"
    }
}
