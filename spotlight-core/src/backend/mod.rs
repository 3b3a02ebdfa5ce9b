//! Search backends consumed by the overlay.
//!
//! The controller only sees [`SearchBackend`]: an async request/response
//! call returning grouped results. [`catalog::Catalog`] is the in-process
//! implementation used by the terminal host.

pub mod catalog;
pub use catalog::{Catalog, CatalogModel, CatalogRecord, SearchModelConfig};

use async_trait::async_trait;

use crate::{error::AppError, model::search_state::ResultGroup};

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one query. Any error is treated by the caller as "no results".
    async fn search(&self, query: &str) -> Result<Vec<ResultGroup>, AppError>;

    fn name(&self) -> &'static str;
}
