//! Clickable areas of the last rendered frame.

use ratatui::layout::{Position, Rect};

use crate::model::search_state::RecordRef;

/// What a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// The toolbar search control.
    Trigger,
    /// A result row.
    Record(RecordRef),
    /// Inside the dialog but not on a row.
    Dialog,
    /// The dimmed area around the open dialog.
    Backdrop,
    /// Anything else while the overlay is closed.
    Outside,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    pub trigger: Rect,
    pub dialog: Option<Rect>,
    pub rows: Vec<(Rect, RecordRef)>,
}

impl HitMap {
    pub fn hit(&self, column: u16, row: u16) -> Hit {
        let pos = Position::new(column, row);

        if self.trigger.contains(pos) {
            return Hit::Trigger;
        }

        let Some(dialog) = self.dialog else {
            return Hit::Outside;
        };

        if let Some((_, record)) = self.rows.iter().find(|(area, _)| area.contains(pos)) {
            return Hit::Record(record.clone());
        }

        if dialog.contains(pos) {
            Hit::Dialog
        } else {
            Hit::Backdrop
        }
    }
}
