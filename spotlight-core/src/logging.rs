//! src/logging.rs
//! ============================================================================
//! Structured JSON logging to a rolling file.
//!
//! The terminal belongs to the UI, so nothing is written to stdout/stderr.
//! Records go through a non-blocking `tracing-appender` writer; the returned
//! [`WorkerGuard`] must live until shutdown or buffered lines are lost.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::ChronoUtc, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub log_file_prefix: CompactString,
    pub log_level: CompactString,
    pub max_log_files: usize,
    pub rotation: LogRotation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogRotation {
    Never,
    Daily,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            log_file_prefix: CompactString::const_new("spotlight"),
            log_level: CompactString::const_new("info"),
            max_log_files: 10,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggerConfig {
    /// Logger settings derived from the application config.
    pub fn from_app_config(config: &Config) -> Result<Self> {
        Ok(Self {
            log_dir: config.log_dir()?,
            log_level: CompactString::from(config.logging.level.as_str()),
            ..Self::default()
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log directory: {0}")]
    InvalidLogDirectory(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber. `RUST_LOG` overrides the configured level.
    pub fn init_tracing(config: &LoggerConfig) -> Result<WorkerGuard> {
        validate_config(config)?;
        setup_log_directory(&config.log_dir)?;

        let rotation = match config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(config.log_file_prefix.as_str())
            .filename_suffix("jsonl")
            .max_log_files(config.max_log_files)
            .build(&config.log_dir)
            .context("Failed to create file appender")?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.log_level.as_str()))
            .context("Invalid log level")?;

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_target(true)
            .with_writer(non_blocking)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .context("Logger already initialized")?;

        info!(
            "Logging to {} (level {})",
            config.log_dir.display(),
            config.log_level
        );
        Ok(guard)
    }
}

fn validate_config(config: &LoggerConfig) -> Result<()> {
    if config.log_file_prefix.is_empty() {
        return Err(
            LoggingError::ConfigError("Log file prefix must not be empty".to_string()).into(),
        );
    }

    if config.max_log_files == 0 {
        return Err(
            LoggingError::ConfigError("Max log files must be greater than 0".to_string()).into(),
        );
    }

    validate_log_directory(&config.log_dir)?;
    Ok(())
}

fn validate_log_directory(path: &Path) -> Result<()> {
    if path.components().count() == 0 {
        return Err(LoggingError::InvalidLogDirectory("Empty path".to_string()).into());
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(LoggingError::InvalidLogDirectory(
            "Path contains parent directory references".to_string(),
        )
        .into());
    }

    Ok(())
}

fn setup_log_directory(log_dir: &Path) -> Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }
    Ok(())
}
