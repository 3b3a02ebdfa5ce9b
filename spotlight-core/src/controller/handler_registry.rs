//! HandlerRegistry: priority-ordered routing of terminal events
//!
//! Handlers are registered for as long as the returned
//! [`HandlerRegistration`] is alive; dropping it removes the handler, on
//! every exit path. Events visit handlers from the lowest priority number
//! up. A handler that `captures` stops propagation once it has handled an
//! event, like a capture-phase listener calling `stopPropagation`.

use std::sync::{Arc, Weak};
use std::time::Instant;

use crossterm::event::Event;
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::{controller::actions::Action, error::AppError, view::hit_map::HitMap};

/// Read-only view of application state handed to handlers.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub overlay_open: bool,
    pub hits: &'a HitMap,
}

pub trait EventHandler: Send {
    /// Check if this handler can process the event.
    fn can_handle(&self, event: &Event, ctx: &HandlerContext<'_>) -> bool;

    /// Process event and return actions.
    fn handle(&mut self, event: &Event, ctx: &HandlerContext<'_>) -> Result<Vec<Action>, AppError>;

    /// Handler priority for ordering (lower numbers run first).
    fn priority(&self) -> u8 {
        100
    }

    /// Whether handling an event hides it from later handlers.
    fn captures(&self) -> bool {
        false
    }

    /// Handler name for debugging.
    fn name(&self) -> &'static str;
}

/// Handler types for logging and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum HandlerType {
    Shortcut = 0,
    Overlay = 1,
    Mouse = 2,
    App = 3,
}

/// Handler performance statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerStats {
    pub handler_type: HandlerType,
    pub event_count: u64,
}

struct HandlerEntry {
    id: u64,
    handler_type: HandlerType,
    handler: Box<dyn EventHandler>,
    event_count: u64,
}

#[derive(Default)]
struct RegistryInner {
    handlers: Vec<HandlerEntry>,
    next_id: u64,
}

/// Shared handler list. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

/// Keeps a handler registered; dropping it deregisters.
#[must_use = "the handler is removed as soon as its registration is dropped"]
pub struct HandlerRegistration {
    id: u64,
    handler_type: HandlerType,
    registry: Weak<Mutex<RegistryInner>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single handler
    pub fn register(
        &self,
        handler: Box<dyn EventHandler>,
        handler_type: HandlerType,
    ) -> HandlerRegistration {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        info!("Registered {:?} handler ({})", handler_type, handler.name());
        inner.handlers.push(HandlerEntry {
            id,
            handler_type,
            handler,
            event_count: 0,
        });

        HandlerRegistration {
            id,
            handler_type,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Process event through handler chain (priority order)
    pub fn handle_event(&self, event: &Event, ctx: &HandlerContext<'_>) -> Vec<Action> {
        let event_start = Instant::now();
        let mut inner = self.inner.lock();

        let mut candidates: Vec<&mut HandlerEntry> = inner
            .handlers
            .iter_mut()
            .filter(|entry| entry.handler.can_handle(event, ctx))
            .collect();

        // stable: equal priorities keep registration order
        candidates.sort_by_key(|entry| entry.handler.priority());

        let mut actions = Vec::new();
        for entry in candidates {
            match entry.handler.handle(event, ctx) {
                Ok(mut handler_actions) => {
                    entry.event_count += 1;
                    trace!(
                        "{} produced {:?}",
                        entry.handler.name(),
                        handler_actions
                    );
                    actions.append(&mut handler_actions);
                }
                Err(e) => {
                    warn!("Handler {} failed to process event: {}", entry.handler.name(), e);
                }
            }

            if entry.handler.captures() {
                break;
            }
        }

        debug!(
            "Event processed in {:?}, generated {} actions",
            event_start.elapsed(),
            actions.len()
        );
        actions
    }

    /// Get handler count
    pub fn handler_count(&self) -> usize {
        self.inner.lock().handlers.len()
    }

    pub fn get_performance_report(&self) -> Vec<HandlerStats> {
        self.inner
            .lock()
            .handlers
            .iter()
            .map(|entry| HandlerStats {
                handler_type: entry.handler_type,
                event_count: entry.event_count,
            })
            .collect()
    }
}

impl Drop for HandlerRegistration {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.lock().handlers.retain(|entry| entry.id != self.id);
            info!("Deregistered {:?} handler", self.handler_type);
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handler_count", &self.handler_count())
            .finish()
    }
}

impl std::fmt::Debug for HandlerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistration")
            .field("id", &self.id)
            .field("handler_type", &self.handler_type)
            .finish()
    }
}
