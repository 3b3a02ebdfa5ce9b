//! In-process search catalog.
//!
//! Holds a set of models (records with named text fields) and a list of
//! [`SearchModelConfig`] entries describing which models to search, on which
//! fields, and how many hits to keep per model.
//!
//! Matching rules:
//! - queries shorter than two characters return nothing;
//! - the query is split on whitespace and *every* word must appear
//!   (case-insensitive substring) in at least one configured field, so
//!   `"paul sems"` means `(name ~ paul OR email ~ paul) AND
//!   (name ~ sems OR email ~ sems)`;
//! - active configs run in `sequence` order, ties in declaration order;
//! - a failing model is logged and skipped, it never fails the search.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    time::Duration,
};

use async_trait::async_trait;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::{debug, info, instrument, warn};

use crate::{
    backend::SearchBackend,
    error::AppError,
    model::search_state::{MIN_QUERY_CHARS, ResultGroup, ResultRecord, default_icon},
};

const DEFAULT_LIMIT: u32 = 5;
const DEFAULT_SEQUENCE: i32 = 10;

/// Configurations installed when none are given: (label, model, fields, icon, sequence).
/// Only models present in the catalog are kept, and only their existing fields.
const DEFAULT_CONFIGS: [(&str, &str, &str, &str, i32); 6] = [
    ("Contacts", "res.partner", "name,email,phone", "fa-address-book", 10),
    ("Sales Orders", "sale.order", "name,client_order_ref", "fa-shopping-cart", 20),
    ("Projects", "project.project", "name", "fa-folder", 30),
    ("Tasks", "project.task", "name", "fa-tasks", 40),
    ("Invoices", "account.move", "name,ref", "fa-file-text", 50),
    ("CRM Leads", "crm.lead", "name,contact_name,email_from", "fa-filter", 60),
];

/// Which model to search, on which fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchModelConfig {
    /// Group label shown above the results, e.g. "Contacts".
    pub label: CompactString,

    /// Model key, e.g. `res.partner`.
    pub model_key: CompactString,

    /// Comma-separated field names, e.g. `name,email,phone`.
    pub search_fields: String,

    #[serde(default = "default_icon")]
    pub icon: CompactString,

    #[serde(default = "default_sequence")]
    pub sequence: i32,

    #[serde(default = "default_active")]
    pub active: bool,

    /// Maximum records per model; `0` falls back to the default of 5.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_sequence() -> i32 {
    DEFAULT_SEQUENCE
}

fn default_active() -> bool {
    true
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl SearchModelConfig {
    pub fn new(
        label: impl Into<CompactString>,
        model_key: impl Into<CompactString>,
        search_fields: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            model_key: model_key.into(),
            search_fields: search_fields.into(),
            icon: default_icon(),
            sequence: DEFAULT_SEQUENCE,
            active: true,
            limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<CompactString>) -> Self {
        self.icon = icon.into();
        self
    }

    #[must_use]
    pub fn sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Trimmed, non-empty field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.search_fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_LIMIT as usize
        } else {
            self.limit as usize
        }
    }
}

/// A record with its searchable text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: i64,
    pub display_name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl CatalogRecord {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    fn matches_any(&self, fields: &[&str], needle: &str) -> bool {
        fields.iter().any(|field| {
            self.fields
                .get(*field)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }
}

/// A searchable model: its declared fields plus records in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogModel {
    pub key: CompactString,
    pub fields: Vec<String>,
    #[serde(default)]
    pub records: Vec<CatalogRecord>,
}

impl CatalogModel {
    pub fn new(key: impl Into<CompactString>, fields: &[&str]) -> Self {
        Self {
            key: key.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn record(mut self, record: CatalogRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}

/// On-disk catalog layout (JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub models: Vec<CatalogModel>,
    #[serde(default)]
    pub configs: Vec<SearchModelConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: HashMap<CompactString, CatalogModel>,
    configs: Vec<SearchModelConfig>,
    latency: Duration,
}

impl Catalog {
    /// Catalog with the given models and the default configurations.
    pub fn new(models: impl IntoIterator<Item = CatalogModel>) -> Self {
        let mut catalog = Self {
            models: models.into_iter().map(|m| (m.key.clone(), m)).collect(),
            configs: Vec::new(),
            latency: Duration::ZERO,
        };
        catalog.configs = catalog.default_configs();
        catalog
    }

    #[must_use]
    pub fn with_configs(mut self, configs: Vec<SearchModelConfig>) -> Self {
        self.configs = configs;
        self
    }

    /// Artificial delay applied to every search.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn configs(&self) -> &[SearchModelConfig] {
        &self.configs
    }

    pub fn model(&self, key: &str) -> Option<&CatalogModel> {
        self.models.get(key)
    }

    /// Load a JSON catalog. Missing `configs` means the defaults.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        info!("Loading search catalog from {}", path.display());
        let text = TokioFs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_io(path, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        let catalog = Self::new(file.models);
        if file.configs.is_empty() {
            Ok(catalog)
        } else {
            Ok(catalog.with_configs(file.configs))
        }
    }

    /// Default configurations restricted to what this catalog contains.
    pub fn default_configs(&self) -> Vec<SearchModelConfig> {
        DEFAULT_CONFIGS
            .iter()
            .filter_map(|&(label, model_key, fields, icon, sequence)| {
                let model = self.models.get(model_key)?;
                let valid: Vec<&str> = fields
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty() && model.has_field(f))
                    .collect();
                if valid.is_empty() {
                    return None;
                }
                debug!("Configured default search for {} ({})", label, model_key);
                Some(
                    SearchModelConfig::new(label, model_key, valid.join(","))
                        .icon(icon)
                        .sequence(sequence),
                )
            })
            .collect()
    }

    /// Check that every config names an existing model and existing fields.
    pub fn validate(&self) -> Result<(), AppError> {
        for config in &self.configs {
            let model = self.models.get(config.model_key.as_str()).ok_or_else(|| {
                AppError::catalog_validation(config.model_key.as_str(), "model does not exist")
            })?;
            if let Some(field) = config.fields().find(|f| !model.has_field(f)) {
                return Err(AppError::catalog_validation(
                    config.model_key.as_str(),
                    format!("field '{field}' does not exist"),
                ));
            }
        }
        Ok(())
    }

    /// Synchronous search across every active config.
    #[instrument(level = "debug", skip(self))]
    pub fn search_now(&self, query: &str) -> Vec<ResultGroup> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut active: Vec<&SearchModelConfig> =
            self.configs.iter().filter(|c| c.active).collect();
        // stable: equal sequences keep declaration order
        active.sort_by_key(|c| c.sequence);

        debug!("Catalog search: query='{}', configs={}", query, active.len());

        let mut results = Vec::new();
        for config in active {
            let Some(model) = self.models.get(config.model_key.as_str()) else {
                warn!(
                    "Catalog search: model '{}' not in catalog, skipping",
                    config.model_key
                );
                continue;
            };

            match Self::search_model(config, model, query) {
                Ok(Some(group)) => {
                    debug!(
                        "Catalog search: {} returned {} results",
                        config.model_key,
                        group.records.len()
                    );
                    results.push(group);
                }
                Ok(None) => {}
                Err(e) => warn!("Catalog search: error searching {}: {}", config.model_key, e),
            }
        }
        results
    }

    fn search_model(
        config: &SearchModelConfig,
        model: &CatalogModel,
        query: &str,
    ) -> Result<Option<ResultGroup>, AppError> {
        let fields: Vec<&str> = config.fields().collect();
        if fields.is_empty() {
            return Ok(None);
        }
        if let Some(unknown) = fields.iter().find(|f| !model.has_field(f)) {
            return Err(AppError::catalog_validation(
                model.key.as_str(),
                format!("field '{unknown}' does not exist"),
            ));
        }

        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Ok(None);
        }

        let records: Vec<ResultRecord> = model
            .records
            .iter()
            .filter(|record| words.iter().all(|word| record.matches_any(&fields, word)))
            .take(config.effective_limit())
            .map(|record| ResultRecord {
                id: record.id,
                name: record.display_name.clone(),
            })
            .collect();

        if records.is_empty() {
            return Ok(None);
        }

        Ok(Some(ResultGroup::new(
            config.model_key.clone(),
            config.label.clone(),
            config.icon.clone(),
            records,
        )))
    }

    /// Small built-in catalog used when no catalog file is configured.
    pub fn sample() -> Self {
        let partners = CatalogModel::new("res.partner", &["name", "email", "phone"])
            .record(
                CatalogRecord::new(5, "Alice Martin")
                    .field("name", "Alice Martin")
                    .field("email", "alice@example.com")
                    .field("phone", "+1 555 0100"),
            )
            .record(
                CatalogRecord::new(7, "Paul Sems")
                    .field("name", "Paul Sems")
                    .field("email", "paul.sems@example.com"),
            )
            .record(
                CatalogRecord::new(9, "Bob Alvarez")
                    .field("name", "Bob Alvarez")
                    .field("email", "bob@example.org"),
            );

        let orders = CatalogModel::new("sale.order", &["name", "client_order_ref"])
            .record(
                CatalogRecord::new(3, "S00003")
                    .field("name", "S00003")
                    .field("client_order_ref", "ALICE-Q3"),
            )
            .record(CatalogRecord::new(4, "S00004").field("name", "S00004"));

        let tasks = CatalogModel::new("project.task", &["name"])
            .record(
                CatalogRecord::new(21, "Call Alice about renewal")
                    .field("name", "Call Alice about renewal"),
            )
            .record(
                CatalogRecord::new(22, "Prepare quarterly report")
                    .field("name", "Prepare quarterly report"),
            );

        Self::new([partners, orders, tasks])
    }
}

#[async_trait]
impl SearchBackend for Catalog {
    async fn search(&self, query: &str) -> Result<Vec<ResultGroup>, AppError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.search_now(query))
    }

    fn name(&self) -> &'static str {
        "Catalog"
    }
}
