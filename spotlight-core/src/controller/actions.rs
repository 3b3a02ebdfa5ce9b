//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Application Commands
//!
//! Defines the `Action` enum: every state change the event loop can apply.
//! Handlers translate raw terminal events into actions; only the event loop
//! mutates state.

use crate::model::search_state::RecordRef;

/// Represents a high-level action that the application can perform.
/// This abstracts away raw terminal events into meaningful commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the overlay if closed, close it if open.
    ToggleOverlay,

    /// Close the overlay and discard its state.
    CloseOverlay,

    /// Append a character to the query.
    InsertChar(char),

    /// Remove the last character of the query.
    DeleteChar,

    /// Move the highlight one result down.
    SelectNext,

    /// Move the highlight one result up.
    SelectPrevious,

    /// Open the highlighted result.
    ActivateSelected,

    /// Open a specific result (mouse click on a row).
    ActivateRecord(RecordRef),

    /// Terminal resized.
    Resize(u16, u16),

    /// Quit the application.
    Quit,

    /// No operation. Used when an event is consumed but no state change is needed.
    NoOp,
}
