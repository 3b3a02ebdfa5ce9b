//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config directory using
//! the [`directories`](https://docs.rs/directories) crate. A missing file is
//! created with defaults on first start.
//!
//! ```toml
//! [search]
//! debounce = "300ms"
//! stale_responses = "drop"
//!
//! [catalog]
//! path = "/srv/spotlight/catalog.json"
//! latency = "0s"
//!
//! [logging]
//! level = "info"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::{backend::SearchModelConfig, util::debounce::DebounceConfig};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "spotlight";
const APPLICATION: &str = "Spotlight";

/// What to do with a search response that is no longer the latest request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaleResponsePolicy {
    /// Apply only the response to the latest request, and only while open.
    #[default]
    Drop,

    /// Apply whatever arrives, in arrival order.
    Apply,
}

/// Overlay behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a query is sent.
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,

    pub stale_responses: StaleResponsePolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig::search_input().delay,
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

impl SearchSettings {
    pub fn debounce_config(&self) -> DebounceConfig {
        DebounceConfig::with_delay(self.debounce)
    }
}

/// Where search data comes from.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CatalogSettings {
    /// JSON catalog file; the built-in sample catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Artificial latency added to every search.
    #[serde(default, with = "humantime_serde")]
    pub latency: Duration,

    /// Search configurations; empty means the defaults for present models.
    #[serde(default)]
    pub models: Vec<SearchModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,

    /// Log directory; defaults to the platform data directory.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Config {
    /// Loads config from the platform config dir, or writes and returns defaults.
    pub async fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(&path).await?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save().await?;

            Ok(default_config)
        }
    }

    /// Saves config to TOML file in the platform config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;

        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(&path, toml_str).await?;

        Ok(())
    }

    fn project_dirs() -> anyhow::Result<ProjectDirs> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))
    }

    /// Canonical config file path.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Log directory: explicit setting, else `<data dir>/logs`.
    pub fn log_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("logs")),
        }
    }
}
