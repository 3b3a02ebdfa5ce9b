//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Spotlight Search
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`. The
//! search controller never lets one of these escape: a failed backend call is
//! recovered locally as "no results". The remaining variants surface from
//! configuration and catalog loading.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all spotlight operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config or catalog file I/O error with path.
    #[error("Failed to read {path:?}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (e.g., JSON catalog).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The search backend could not answer a query.
    #[error("Search for '{query}' failed: {reason}")]
    SearchFailed { query: String, reason: String },

    /// A search configuration refers to something the catalog does not have.
    #[error("Invalid search configuration '{model_key}': {reason}")]
    CatalogValidation { model_key: String, reason: String },

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a search failure error
    pub fn search_failed<S1: Into<String>, S2: Into<String>>(query: S1, reason: S2) -> Self {
        Self::SearchFailed {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Create a catalog validation error
    pub fn catalog_validation<S1: Into<String>, S2: Into<String>>(
        model_key: S1,
        reason: S2,
    ) -> Self {
        Self::CatalogValidation {
            model_key: model_key.into(),
            reason: reason.into(),
        }
    }

    /// Create a file I/O error carrying the offending path
    pub fn file_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }
}

// Manual Clone implementation to handle non-Clone fields
impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
            Self::Config(e) => Self::Other(format!("Config error: {e}")),
            Self::FileIo { path, source } => Self::FileIo {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            Self::Serde(e) => Self::Other(format!("Serde error: {e}")),
            Self::SearchFailed { query, reason } => Self::SearchFailed {
                query: query.clone(),
                reason: reason.clone(),
            },
            Self::CatalogValidation { model_key, reason } => Self::CatalogValidation {
                model_key: model_key.clone(),
                reason: reason.clone(),
            },
            Self::Other(msg) => Self::Other(msg.clone()),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_failure_message_names_query() {
        let err = AppError::search_failed("ab", "connection refused");
        assert_eq!(
            err.to_string(),
            "Search for 'ab' failed: connection refused"
        );
    }

    #[test]
    fn clone_keeps_io_kind() {
        let err = AppError::file_io("catalog.json", io::Error::from(io::ErrorKind::NotFound));
        match err.clone() {
            AppError::FileIo { path, source } => {
                assert_eq!(path, PathBuf::from("catalog.json"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected clone: {other:?}"),
        }
    }
}
