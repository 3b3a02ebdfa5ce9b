//! Search overlay state and the result types produced by a search backend.
//!
//! `SearchState` is the single mutable record owned by
//! [`SearchController`](crate::controller::search_controller::SearchController).
//! Everything the view needs beyond these fields (flat indices, totals,
//! placeholder flags) is derived on read, see [`crate::model::flatten`].

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::model::flatten;

/// Minimum number of characters before a query is sent to the backend.
pub const MIN_QUERY_CHARS: usize = 2;

/// One matching record inside a [`ResultGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: i64,
    pub name: String,
}

/// Matches for one searchable entity type, in backend order.
///
/// Field names on the wire follow the search endpoint payload
/// (`model`, `model_name`, `icon`, `records`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultGroup {
    #[serde(rename = "model")]
    pub model_key: CompactString,

    #[serde(rename = "model_name")]
    pub display_label: CompactString,

    #[serde(default = "default_icon")]
    pub icon: CompactString,

    #[serde(default)]
    pub records: Vec<ResultRecord>,
}

pub(crate) fn default_icon() -> CompactString {
    CompactString::const_new("fa-file")
}

impl ResultGroup {
    pub fn new(
        model_key: impl Into<CompactString>,
        display_label: impl Into<CompactString>,
        icon: impl Into<CompactString>,
        records: Vec<ResultRecord>,
    ) -> Self {
        Self {
            model_key: model_key.into(),
            display_label: display_label.into(),
            icon: icon.into(),
            records,
        }
    }
}

/// `(model_key, record_id)` pair identifying a record to activate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub model_key: CompactString,
    pub record_id: i64,
}

impl RecordRef {
    pub fn new(model_key: impl Into<CompactString>, record_id: i64) -> Self {
        Self {
            model_key: model_key.into(),
            record_id,
        }
    }
}

/// Overlay state, lifetime = controller lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub is_open: bool,
    pub query: String,
    pub results: Vec<ResultGroup>,
    pub is_loading: bool,
    /// Keyboard-highlighted flat position; `None` means nothing is selected.
    pub selected_index: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query length in characters, not bytes.
    #[inline]
    pub fn query_len(&self) -> usize {
        self.query.chars().count()
    }

    #[inline]
    pub fn query_is_searchable(&self) -> bool {
        self.query_len() >= MIN_QUERY_CHARS
    }

    pub fn total_results(&self) -> usize {
        flatten::total_results(&self.results)
    }

    /// Show the "type at least two characters" hint.
    pub fn show_hint(&self) -> bool {
        !self.query_is_searchable() && self.results.is_empty()
    }

    /// Show the "no results" placeholder.
    pub fn show_no_results(&self) -> bool {
        self.query_is_searchable() && self.results.is_empty() && !self.is_loading
    }

    /// Reset the transient fields shared by open and close.
    pub(crate) fn clear_transient(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected_index = None;
        self.is_loading = false;
    }
}
