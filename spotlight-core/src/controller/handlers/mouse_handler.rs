//! Left clicks on the toolbar trigger, result rows and the backdrop.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use tracing::debug;

use crate::{
    controller::{
        actions::Action,
        handler_registry::{EventHandler, HandlerContext},
    },
    error::AppError,
    view::hit_map::Hit,
};

#[derive(Debug, Default)]
pub struct MouseHandler;

impl MouseHandler {
    pub fn new() -> Self {
        Self
    }
}

impl EventHandler for MouseHandler {
    fn can_handle(&self, event: &Event, _ctx: &HandlerContext<'_>) -> bool {
        matches!(
            event,
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left)
        )
    }

    fn handle(&mut self, event: &Event, ctx: &HandlerContext<'_>) -> Result<Vec<Action>, AppError> {
        let Event::Mouse(mouse) = event else {
            return Ok(Vec::new());
        };

        let hit = ctx.hits.hit(mouse.column, mouse.row);
        debug!("Click at ({}, {}) on {:?}", mouse.column, mouse.row, hit);

        let action = match hit {
            Hit::Trigger => Action::ToggleOverlay,
            Hit::Record(target) if ctx.overlay_open => Action::ActivateRecord(target),
            Hit::Backdrop if ctx.overlay_open => Action::CloseOverlay,
            _ => Action::NoOp,
        };
        Ok(vec![action])
    }

    fn priority(&self) -> u8 {
        20
    }

    fn captures(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "MouseHandler"
    }
}
