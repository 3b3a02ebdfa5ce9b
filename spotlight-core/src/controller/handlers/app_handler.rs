//! Host-level keys: quitting and terminal resize.
//!
//! Quit keys only count while the overlay is closed; with it open, `q` is
//! typed into the query and Ctrl+C is ignored.

use crossterm::event::{Event, KeyCode, KeyModifiers};

use crate::{
    controller::{
        actions::Action,
        handler_registry::{EventHandler, HandlerContext},
        handlers::key_press,
    },
    error::AppError,
};

#[derive(Debug, Default)]
pub struct AppHandler;

impl AppHandler {
    pub fn new() -> Self {
        Self
    }
}

impl EventHandler for AppHandler {
    fn can_handle(&self, event: &Event, _ctx: &HandlerContext<'_>) -> bool {
        matches!(event, Event::Resize(..)) || key_press(event).is_some()
    }

    fn handle(&mut self, event: &Event, ctx: &HandlerContext<'_>) -> Result<Vec<Action>, AppError> {
        if let Event::Resize(width, height) = *event {
            return Ok(vec![Action::Resize(width, height)]);
        }

        let Some(key) = key_press(event) else {
            return Ok(Vec::new());
        };

        let action = match (key.code, key.modifiers) {
            _ if ctx.overlay_open => Action::NoOp,
            (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            _ => Action::NoOp,
        };
        Ok(vec![action])
    }

    fn priority(&self) -> u8 {
        200
    }

    fn name(&self) -> &'static str {
        "AppHandler"
    }
}
