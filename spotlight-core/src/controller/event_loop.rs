//! src/controller/event_loop.rs
//! ============================================================================
//! # SpotlightApp: the host event loop
//!
//! Mounting the app registers the global shortcut and the overlay, mouse and
//! app handlers; the registrations are held for the app's lifetime and
//! released when it is dropped. One task owns all state and multiplexes:
//! - terminal events, routed through the [`HandlerRegistry`] into [`Action`]s;
//! - [`SearchEvent`]s (debounce expiry, backend completion);
//! - record activations delivered by the [`ChannelActivator`];
//! - the shutdown token.

use std::{io, sync::Arc};

use anyhow::{Context, Result};
use crossterm::event::Event as TermEvent;
use futures::{Stream, StreamExt};
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::{
    backend::SearchBackend,
    config::SearchSettings,
    controller::{
        actions::Action,
        activation::ChannelActivator,
        handler_registry::{HandlerContext, HandlerRegistration, HandlerRegistry, HandlerType},
        handlers::{AppHandler, MouseHandler, OverlayHandler, ShortcutHandler},
        search_controller::{SearchController, SearchEvent},
    },
    model::search_state::RecordRef,
    view::{
        hit_map::HitMap,
        ui::{RenderContext, UIRenderer},
    },
};

pub struct SpotlightApp {
    controller: SearchController,
    search_rx: mpsc::UnboundedReceiver<SearchEvent>,
    activation_rx: mpsc::UnboundedReceiver<RecordRef>,
    registry: HandlerRegistry,
    registrations: Vec<HandlerRegistration>,
    renderer: UIRenderer,
    hits: HitMap,
    current_view: Option<RecordRef>,
    input_focused: bool,
}

impl SpotlightApp {
    /// Build the controller and register every handler.
    pub fn mount(settings: &SearchSettings, backend: Arc<dyn SearchBackend>) -> Self {
        let (activator, activation_rx) = ChannelActivator::channel();
        let (controller, search_rx) =
            SearchController::new(settings, backend, Box::new(activator));

        let registry = HandlerRegistry::new();
        let registrations = vec![
            registry.register(Box::new(ShortcutHandler::new()), HandlerType::Shortcut),
            registry.register(Box::new(OverlayHandler::new()), HandlerType::Overlay),
            registry.register(Box::new(MouseHandler::new()), HandlerType::Mouse),
            registry.register(Box::new(AppHandler::new()), HandlerType::App),
        ];
        info!("Spotlight mounted with {} handlers", registry.handler_count());

        Self {
            controller,
            search_rx,
            activation_rx,
            registry,
            registrations,
            renderer: UIRenderer::new(),
            hits: HitMap::default(),
            current_view: None,
            input_focused: false,
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn current_view(&self) -> Option<&RecordRef> {
        self.current_view.as_ref()
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Route a terminal event. Returns `false` when the app should quit.
    pub fn handle_terminal_event(&mut self, event: &TermEvent) -> bool {
        let ctx = HandlerContext {
            overlay_open: self.controller.is_open(),
            hits: &self.hits,
        };
        let actions = self.registry.handle_event(event, &ctx);
        actions.into_iter().all(|action| self.dispatch(action))
    }

    /// Apply one action. Returns `false` on quit.
    pub fn dispatch(&mut self, action: Action) -> bool {
        trace!("Dispatching action: {:?}", action);
        match action {
            Action::ToggleOverlay => self.controller.toggle_open(),
            Action::CloseOverlay => self.controller.close(),
            Action::InsertChar(c) => self.controller.insert_char(c),
            Action::DeleteChar => self.controller.delete_char(),
            Action::SelectNext => self.controller.select_next(),
            Action::SelectPrevious => self.controller.select_previous(),
            Action::ActivateSelected => self.controller.activate_selected(),
            Action::ActivateRecord(target) => {
                if self.controller.is_open() {
                    self.controller.open_record(target);
                }
            }
            Action::Resize(width, height) => debug!("Terminal resized to {}x{}", width, height),
            Action::Quit => {
                info!("Quit requested");
                return false;
            }
            Action::NoOp => {}
        }

        if !self.controller.is_open() {
            self.input_focused = false;
        }
        true
    }

    pub fn handle_search_event(&mut self, event: SearchEvent) {
        self.controller.handle_event(event);
    }

    /// Show an activated record in the main area, replacing the previous one.
    pub fn show_record(&mut self, target: RecordRef) {
        info!("Showing {}#{}", target.model_key, target.record_id);
        self.current_view = Some(target);
    }

    /// Draw one frame, then settle focus now that the input exists.
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let scroll_to_selection = self.controller.take_scroll_request();
        let ctx = RenderContext {
            search: self.controller.state(),
            current_view: self.current_view.as_ref(),
            input_focused: self.input_focused,
            scroll_to_selection,
        };
        let renderer = &mut self.renderer;
        let mut hits = HitMap::default();
        terminal.draw(|frame| hits = renderer.render(frame, &ctx))?;
        self.hits = hits;

        if self.controller.take_focus_request() && self.controller.is_open() {
            debug!("Search input focused");
            self.input_focused = true;
            // draw again so the cursor shows in the input right away
            let ctx = RenderContext {
                search: self.controller.state(),
                current_view: self.current_view.as_ref(),
                input_focused: true,
                scroll_to_selection: false,
            };
            let renderer = &mut self.renderer;
            let mut hits = HitMap::default();
            terminal.draw(|frame| hits = renderer.render(frame, &ctx))?;
            self.hits = hits;
        }
        Ok(())
    }

    /// Run until quit, end of input or cancellation.
    pub async fn run<B, S>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut events: S,
        shutdown: CancellationToken,
    ) -> Result<()>
    where
        B: Backend,
        S: Stream<Item = io::Result<TermEvent>> + Unpin,
    {
        info!("Starting spotlight event loop");

        loop {
            self.draw(terminal).context("Failed to draw terminal")?;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => {
                        if !self.handle_terminal_event(&event) {
                            break;
                        }
                    }
                    Some(Err(e)) => warn!("Terminal event error: {}", e),
                    None => {
                        info!("Terminal event stream closed");
                        break;
                    }
                },

                Some(event) = self.search_rx.recv() => self.handle_search_event(event),

                Some(target) = self.activation_rx.recv() => self.show_record(target),
            }
        }

        info!(
            "Event loop terminated after {} frames ({:.1} fps)",
            self.renderer.stats().frames,
            self.renderer.stats().fps()
        );
        for stats in self.registry.get_performance_report() {
            debug!(
                "{:?} handler processed {} events",
                stats.handler_type, stats.event_count
            );
        }
        Ok(())
    }

    /// Deliver activations already queued by the controller.
    pub fn drain_activations(&mut self) {
        while let Ok(target) = self.activation_rx.try_recv() {
            self.show_record(target);
        }
    }
}

impl Drop for SpotlightApp {
    fn drop(&mut self) {
        // handlers go before the controller cancels its timer
        self.registrations.clear();
        debug!("Spotlight unmounted");
    }
}

impl std::fmt::Debug for SpotlightApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotlightApp")
            .field("controller", &self.controller)
            .field("registry", &self.registry)
            .field("current_view", &self.current_view)
            .field("input_focused", &self.input_focused)
            .finish()
    }
}
