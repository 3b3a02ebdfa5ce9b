//!  src/util/debounce.rs
//!  ===================================================================
//!  Single-slot trailing-edge debouncer.
//!
//!  • The pending timer is an owned, nullable handle: scheduling aborts
//!    whatever was pending before, so at most one timer is alive.
//!  • Expiry is delivered as an event on the owner's channel, never as a
//!    callback, so all state changes stay on the owner's task.
//!  • Every timer carries a generation. An expiry that was already queued
//!    on the channel when the timer got cancelled fails `acknowledge` and
//!    must be ignored by the owner.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant as TokioInstant, sleep_until},
};
use tracing::{debug, trace};

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Quick config for search input debouncing
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(300),
        }
    }

    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

/* ============================ Debouncer ============================ */

struct PendingTimer {
    generation: u64,
    sleeper: JoinHandle<()>,
}

/// Debouncer that posts `E` to its channel once the quiet period elapses.
pub struct Debouncer<E> {
    cfg: DebounceConfig,
    pending: Option<PendingTimer>,
    generation: u64,
    tx: mpsc::UnboundedSender<E>,
}

impl<E: Send + 'static> Debouncer<E> {
    #[must_use]
    pub fn new(cfg: DebounceConfig, tx: mpsc::UnboundedSender<E>) -> Self {
        Self {
            cfg,
            pending: None,
            generation: 0,
            tx,
        }
    }

    /// Replace any pending timer with a fresh one.
    ///
    /// `make_event` receives the new generation and builds the expiry event.
    pub fn schedule<F>(&mut self, make_event: F) -> u64
    where
        F: FnOnce(u64) -> E + Send + 'static,
    {
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        let deadline = TokioInstant::now() + self.cfg.delay;
        let tx = self.tx.clone();

        let sleeper = tokio::spawn(async move {
            sleep_until(deadline).await;
            trace!("Debounce timer {} elapsed", generation);
            let _ = tx.send(make_event(generation));
        });

        trace!(
            "Debounce timer {} scheduled in {:?}",
            generation, self.cfg.delay
        );
        self.pending = Some(PendingTimer {
            generation,
            sleeper,
        });
        generation
    }

    /// Abort the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) => {
                timer.sleeper.abort();
                debug!("Debounce timer {} cancelled", timer.generation);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume an expiry event. Returns `true` only for the live timer.
    pub fn acknowledge(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(timer) if timer.generation == generation => {
                self.pending = None;
                true
            }
            _ => {
                trace!("Ignoring stale debounce expiry {}", generation);
                false
            }
        }
    }
}

impl<E> Drop for Debouncer<E> {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.sleeper.abort();
        }
    }
}
