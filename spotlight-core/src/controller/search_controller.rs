//! src/controller/search_controller.rs
//! ============================================================================
//! # SearchController: the overlay state machine
//!
//! Owns the [`SearchState`] and every transition on it:
//! - lifecycle: `open`, `close`, `toggle_open`;
//! - debounced execution: `on_input` schedules, the timer expiry dispatches
//!   a backend call on a spawned task, the completion is applied;
//! - navigation: `select_next`, `select_previous`, `activate_selected`.
//!
//! Timer expiries and backend completions come back as [`SearchEvent`]s on
//! the receiver returned by [`SearchController::new`]. The owner feeds them
//! to [`SearchController::handle_event`] from the same task that delivers
//! input, so state is only ever touched from one place.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::{
    backend::SearchBackend,
    config::{SearchSettings, StaleResponsePolicy},
    controller::activation::RecordActivator,
    error::AppError,
    model::{
        flatten::{self, FlatGroup},
        search_state::{RecordRef, ResultGroup, SearchState},
    },
    util::debounce::Debouncer,
};

/// Deferred work delivered back to the controller.
#[derive(Debug)]
pub enum SearchEvent {
    /// The quiet period after the last keystroke elapsed.
    DebounceElapsed { generation: u64 },

    /// A backend call finished.
    SearchCompleted {
        seq: u64,
        query: String,
        result: Result<Vec<ResultGroup>, AppError>,
    },
}

pub struct SearchController {
    state: SearchState,
    debouncer: Debouncer<SearchEvent>,
    events: mpsc::UnboundedSender<SearchEvent>,
    backend: Arc<dyn SearchBackend>,
    activator: Box<dyn RecordActivator>,
    policy: StaleResponsePolicy,

    /// Last sequence number handed to a backend call.
    issued_seq: u64,

    /// Sequence whose response is still wanted, if any.
    awaited_seq: Option<u64>,

    focus_requested: bool,
    scroll_requested: bool,
}

impl SearchController {
    pub fn new(
        settings: &SearchSettings,
        backend: Arc<dyn SearchBackend>,
        activator: Box<dyn RecordActivator>,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        info!(
            "Search controller using {} backend, debounce {:?}, stale responses {:?}",
            backend.name(),
            settings.debounce,
            settings.stale_responses
        );
        let controller = Self {
            state: SearchState::new(),
            debouncer: Debouncer::new(settings.debounce_config(), tx.clone()),
            events: tx,
            backend,
            activator,
            policy: settings.stale_responses,
            issued_seq: 0,
            awaited_seq: None,
            focus_requested: false,
            scroll_requested: false,
        };
        (controller, rx)
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Groups with flat index ranges, recomputed on every call.
    pub fn flat_groups(&self) -> Vec<FlatGroup<'_>> {
        flatten::flat_groups(&self.state.results)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.debouncer.is_pending()
    }

    /* ------------------------- lifecycle ------------------------- */

    pub fn open(&mut self) {
        debug!("Opening search overlay");
        self.state.is_open = true;
        self.state.clear_transient();
        // the input only exists after the next layout pass
        self.focus_requested = true;
    }

    pub fn close(&mut self) {
        if self.state.is_open {
            debug!("Closing search overlay");
        }
        self.state.is_open = false;
        self.state.clear_transient();
        self.debouncer.cancel();
        self.awaited_seq = None;
        self.focus_requested = false;
        self.scroll_requested = false;
    }

    pub fn toggle_open(&mut self) {
        if self.state.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// True once after `open`; the view grants focus when it consumes this.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// True once after a navigation key; the view scrolls the highlight into view.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /* --------------------- debounced execution --------------------- */

    /// New input text from the search field.
    pub fn on_input(&mut self, raw_text: impl Into<String>) {
        if !self.state.is_open {
            return;
        }
        self.state.query = raw_text.into();
        self.state.selected_index = None;
        self.debouncer.cancel();
        // whatever is in flight now answers an older text
        self.awaited_seq = None;

        if !self.state.query_is_searchable() {
            trace!("Query '{}' too short, clearing results", self.state.query);
            self.state.results.clear();
            self.state.is_loading = false;
            return;
        }

        self.state.is_loading = true;
        self.debouncer
            .schedule(|generation| SearchEvent::DebounceElapsed { generation });
    }

    pub fn insert_char(&mut self, c: char) {
        let mut text = self.state.query.clone();
        text.push(c);
        self.on_input(text);
    }

    pub fn delete_char(&mut self) {
        let mut text = self.state.query.clone();
        if text.pop().is_some() {
            self.on_input(text);
        }
    }

    pub fn handle_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::DebounceElapsed { generation } => {
                if self.debouncer.acknowledge(generation) {
                    self.dispatch_search();
                }
            }
            SearchEvent::SearchCompleted { seq, query, result } => {
                self.apply_response(seq, &query, result);
            }
        }
    }

    fn dispatch_search(&mut self) {
        if !self.state.is_open || !self.state.query_is_searchable() {
            self.state.is_loading = false;
            return;
        }

        self.issued_seq += 1;
        let seq = self.issued_seq;
        self.awaited_seq = Some(seq);

        // read at fire time, not at schedule time
        let query = self.state.query.clone();
        let backend = Arc::clone(&self.backend);
        let tx = self.events.clone();

        debug!("Dispatching search #{} for '{}'", seq, query);
        tokio::spawn(async move {
            let search = {
                let query = query.clone();
                tokio::spawn(async move { backend.search(&query).await })
            };
            // a panicking backend reads as a failed search
            let result = search.await.unwrap_or_else(|e| {
                warn!("Search #{} task failed: {}", seq, e);
                Err(AppError::search_failed(query.as_str(), e.to_string()))
            });
            let _ = tx.send(SearchEvent::SearchCompleted { seq, query, result });
        });
    }

    fn apply_response(
        &mut self,
        seq: u64,
        query: &str,
        result: Result<Vec<ResultGroup>, AppError>,
    ) {
        if self.policy == StaleResponsePolicy::Drop {
            if self.awaited_seq != Some(seq) {
                debug!("Dropping stale response #{} for '{}'", seq, query);
                return;
            }
            self.awaited_seq = None;
        }

        match result {
            Ok(groups) => {
                debug!(
                    "Search #{} for '{}' returned {} groups",
                    seq,
                    query,
                    groups.len()
                );
                self.state.results = groups;
            }
            Err(e) => {
                warn!("Search #{} for '{}' failed: {}", seq, query, e);
                self.state.results.clear();
            }
        }
        self.state.is_loading = false;
        self.state.selected_index = None;
    }

    /* -------------------------- navigation -------------------------- */

    pub fn select_next(&mut self) {
        if !self.state.is_open {
            return;
        }
        let total = self.state.total_results();
        let next = self.state.selected_index.map_or(0, |i| i + 1);
        if next < total {
            self.state.selected_index = Some(next);
        }
        self.scroll_requested = true;
    }

    pub fn select_previous(&mut self) {
        if !self.state.is_open {
            return;
        }
        if let Some(i) = self.state.selected_index.filter(|&i| i > 0) {
            self.state.selected_index = Some(i - 1);
        }
        self.scroll_requested = true;
    }

    /// Open the highlighted record. No-op without a highlight.
    pub fn activate_selected(&mut self) {
        if !self.state.is_open {
            return;
        }
        let Some(index) = self.state.selected_index else {
            return;
        };
        match flatten::resolve(&self.state.results, index) {
            Some(target) => self.open_record(target),
            None => trace!("Selected index {} resolves to nothing", index),
        }
    }

    /// Hand a record to the activator and close the overlay.
    pub fn open_record(&mut self, target: RecordRef) {
        info!("Opening {}#{}", target.model_key, target.record_id);
        self.activator.activate(target);
        self.close();
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if self.debouncer.cancel() {
            debug!("Search controller dropped with a pending query timer");
        }
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("issued_seq", &self.issued_seq)
            .field("awaited_seq", &self.awaited_seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::search_state::ResultRecord;
    use async_trait::async_trait;
    use std::{sync::Mutex, time::Duration};
    use tokio::time::advance;

    /// Backend that records every query and answers with one partner group.
    #[derive(Default)]
    struct ScriptedBackend {
        queries: Mutex<Vec<String>>,
        fail: bool,
        panic: bool,
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(&self, query: &str) -> Result<Vec<ResultGroup>, AppError> {
            self.queries.lock().expect("lock").push(query.to_string());
            if self.panic {
                panic!("backend crashed on '{query}'");
            }
            if self.fail {
                return Err(AppError::search_failed(query, "boom"));
            }
            Ok(vec![ResultGroup::new(
                "res.partner",
                "Contacts",
                "fa-address-book",
                vec![
                    ResultRecord {
                        id: 5,
                        name: "Alice".into(),
                    },
                    ResultRecord {
                        id: 6,
                        name: "Alicia".into(),
                    },
                ],
            )])
        }

        fn name(&self) -> &'static str {
            "Scripted"
        }
    }

    #[derive(Clone, Default)]
    struct RecordingActivator(Arc<Mutex<Vec<RecordRef>>>);

    impl RecordActivator for RecordingActivator {
        fn activate(&mut self, target: RecordRef) {
            self.0.lock().expect("lock").push(target);
        }
    }

    struct Harness {
        ctl: SearchController,
        rx: mpsc::UnboundedReceiver<SearchEvent>,
        backend: Arc<ScriptedBackend>,
        activated: RecordingActivator,
    }

    impl Harness {
        fn new(backend: ScriptedBackend) -> Self {
            let backend = Arc::new(backend);
            let activated = RecordingActivator::default();
            let (ctl, rx) = SearchController::new(
                &SearchSettings::default(),
                backend.clone(),
                Box::new(activated.clone()),
            );
            Self {
                ctl,
                rx,
                backend,
                activated,
            }
        }

        /// Deliver the next event (timer or completion) to the controller.
        async fn pump(&mut self) {
            let event = self.rx.recv().await.expect("event channel open");
            self.ctl.handle_event(event);
        }

        /// Timer expiry, then backend completion.
        async fn settle_search(&mut self) {
            self.pump().await;
            self.pump().await;
        }

        fn queries(&self) -> Vec<String> {
            self.backend.queries.lock().expect("lock").clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_resets_synchronously_without_backend_call() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("a");

        assert!(h.ctl.state().results.is_empty());
        assert!(!h.ctl.state().is_loading);
        assert!(!h.ctl.has_pending_timer());

        advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(h.rx.try_recv().is_err());
        assert!(h.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_within_quiet_period_sends_only_last_query() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();

        h.ctl.on_input("a");
        advance(Duration::from_millis(10)).await;
        h.ctl.on_input("ab");
        assert!(h.ctl.state().is_loading);
        advance(Duration::from_millis(40)).await;
        h.ctl.on_input("abc");

        h.settle_search().await;
        assert_eq!(h.queries(), vec!["abc".to_string()]);
        assert!(!h.ctl.state().is_loading);
        assert_eq!(h.ctl.state().total_results(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn query_is_read_when_timer_fires() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");

        let start = tokio::time::Instant::now();
        h.pump().await;
        assert_eq!(start.elapsed(), Duration::from_millis(300));
        h.pump().await;
        assert_eq!(h.queries(), vec!["ab".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn keyboard_selection_activates_and_closes() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");
        h.settle_search().await;

        h.ctl.select_next();
        assert_eq!(h.ctl.state().selected_index, Some(0));
        h.ctl.select_next();
        h.ctl.select_next();
        assert_eq!(h.ctl.state().selected_index, Some(1), "clamped at last result");

        h.ctl.select_previous();
        h.ctl.select_previous();
        assert_eq!(h.ctl.state().selected_index, Some(0), "clamped at first result");

        h.ctl.select_next();
        h.ctl.activate_selected();
        assert_eq!(
            *h.activated.0.lock().expect("lock"),
            vec![RecordRef::new("res.partner", 6)]
        );
        assert!(!h.ctl.is_open());
        assert_eq!(h.ctl.state(), &SearchState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_without_selection_is_noop() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();

        h.ctl.select_previous();
        assert_eq!(h.ctl.state().selected_index, None);
        h.ctl.select_next();
        assert_eq!(h.ctl.state().selected_index, None, "nothing to select");
        h.ctl.activate_selected();
        assert!(h.activated.0.lock().expect("lock").is_empty());
        assert!(h.ctl.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_requests_scroll_even_when_clamped() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        assert!(h.ctl.take_focus_request());
        assert!(!h.ctl.take_focus_request());

        h.ctl.select_previous();
        assert!(h.ctl.take_scroll_request());
        assert!(!h.ctl.take_scroll_request());
    }

    #[tokio::test(start_paused = true)]
    async fn new_input_clears_highlight() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("al");
        h.settle_search().await;
        h.ctl.select_next();

        h.ctl.insert_char('i');
        assert_eq!(h.ctl.state().query, "ali");
        assert_eq!(h.ctl.state().selected_index, None);

        h.ctl.delete_char();
        h.ctl.delete_char();
        assert_eq!(h.ctl.state().query, "a");
        assert!(h.ctl.state().results.is_empty());
        assert!(!h.ctl.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn backend_failure_reads_as_no_results() {
        let mut h = Harness::new(ScriptedBackend {
            fail: true,
            ..ScriptedBackend::default()
        });
        h.ctl.open();
        h.ctl.on_input("ab");
        h.settle_search().await;

        let state = h.ctl.state();
        assert!(state.results.is_empty());
        assert!(!state.is_loading);
        assert!(state.show_no_results());
    }

    #[tokio::test(start_paused = true)]
    async fn backend_panic_reads_as_no_results() {
        let mut h = Harness::new(ScriptedBackend {
            panic: true,
            ..ScriptedBackend::default()
        });
        h.ctl.open();
        h.ctl.on_input("ab");
        h.settle_search().await;

        let state = h.ctl.state();
        assert!(state.results.is_empty());
        assert!(!state.is_loading);
        assert!(state.show_no_results());
    }

    #[tokio::test(start_paused = true)]
    async fn input_while_closed_is_ignored() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.on_input("ali");
        h.ctl.insert_char('x');
        h.ctl.delete_char();

        assert_eq!(h.ctl.state(), &SearchState::default());
        assert!(!h.ctl.has_pending_timer());

        advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(h.rx.try_recv().is_err());
        assert!(h.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_after_close_clears_loading() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");
        let fired = h.rx.recv().await.expect("timer");

        // state closed underneath a live timer
        h.ctl.state.is_open = false;
        h.ctl.handle_event(fired);
        assert!(!h.ctl.state().is_loading);
        assert!(h.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_cancels_pending_timer() {
        let backend = Arc::new(ScriptedBackend::default());
        let (mut ctl, mut rx) = SearchController::new(
            &SearchSettings::default(),
            backend.clone(),
            Box::new(RecordingActivator::default()),
        );
        ctl.open();
        ctl.on_input("ab");
        assert!(ctl.has_pending_timer());

        drop(ctl);
        advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;

        // every sender is gone, including the aborted timer's
        assert!(rx.recv().await.is_none());
        assert!(backend.queries.lock().expect("lock").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_timer_and_is_idempotent() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");
        assert!(h.ctl.has_pending_timer());

        h.ctl.close();
        h.ctl.close();
        assert_eq!(h.ctl.state(), &SearchState::default());
        assert!(!h.ctl.has_pending_timer());

        advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(h.rx.try_recv().is_err());
        assert!(h.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_after_close_is_dropped() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");
        h.pump().await; // timer fires, search in flight

        h.ctl.close();
        h.pump().await; // completion arrives
        assert!(h.ctl.state().results.is_empty());
        assert!(!h.ctl.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_dropped() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");
        h.pump().await; // "ab" in flight
        h.ctl.on_input("abc");

        h.pump().await; // "ab" completes first
        assert!(h.ctl.state().results.is_empty());
        assert!(h.ctl.state().is_loading, "newer query still pending");

        h.settle_search().await;
        assert_eq!(h.queries(), vec!["ab".to_string(), "abc".to_string()]);
        assert_eq!(h.ctl.state().total_results(), 2);
        assert!(!h.ctl.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_policy_keeps_late_responses() {
        let backend = Arc::new(ScriptedBackend::default());
        let settings = SearchSettings {
            stale_responses: StaleResponsePolicy::Apply,
            ..SearchSettings::default()
        };
        let (mut ctl, mut rx) = SearchController::new(
            &settings,
            backend.clone(),
            Box::new(RecordingActivator::default()),
        );
        ctl.open();
        ctl.on_input("ab");
        let fired = rx.recv().await.expect("timer");
        ctl.handle_event(fired);

        ctl.close();
        let done = rx.recv().await.expect("completion");
        ctl.handle_event(done);
        assert_eq!(ctl.state().total_results(), 2);
        assert!(!ctl.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_expiry_after_cancel_is_ignored() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.open();
        h.ctl.on_input("ab");
        let fired = h.rx.recv().await.expect("timer");

        h.ctl.on_input("a");
        h.ctl.handle_event(fired);
        tokio::task::yield_now().await;
        assert!(h.queries().is_empty());
        assert!(!h.ctl.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_alternates_and_resets() {
        let mut h = Harness::new(ScriptedBackend::default());
        h.ctl.toggle_open();
        assert!(h.ctl.is_open());
        h.ctl.on_input("zz");

        h.ctl.toggle_open();
        assert!(!h.ctl.is_open());
        h.ctl.toggle_open();
        assert!(h.ctl.is_open());
        assert!(h.ctl.state().query.is_empty());
    }
}
