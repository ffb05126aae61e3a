//! FOLIO-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for folio.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("[FOLIO-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FOLIO-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FOLIO-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FOLIO-1101] catalog parse failure in {path}: {details}")]
    CatalogParse { path: PathBuf, details: String },

    #[error("[FOLIO-1102] duplicate project in catalog: {title:?} (entries {first} and {second})")]
    DuplicateProject {
        title: String,
        first: usize,
        second: usize,
    },

    #[error("[FOLIO-2001] project index {index} out of range for catalog of {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("[FOLIO-2002] unknown section id: {id:?}")]
    UnknownSection { id: String },

    #[error("[FOLIO-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FOLIO-3001] persistent storage unavailable: {details}")]
    StorageUnavailable { details: String },

    #[error("[FOLIO-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FOLIO-3003] script parse failure at line {line}: {details}")]
    ScriptParse { line: usize, details: String },
}

impl FolioError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FOLIO-1001",
            Self::MissingConfig { .. } => "FOLIO-1002",
            Self::ConfigParse { .. } => "FOLIO-1003",
            Self::CatalogParse { .. } => "FOLIO-1101",
            Self::DuplicateProject { .. } => "FOLIO-1102",
            Self::InvalidIndex { .. } => "FOLIO-2001",
            Self::UnknownSection { .. } => "FOLIO-2002",
            Self::Serialization { .. } => "FOLIO-2101",
            Self::StorageUnavailable { .. } => "FOLIO-3001",
            Self::Io { .. } => "FOLIO-3002",
            Self::ScriptParse { .. } => "FOLIO-3003",
        }
    }

    /// Whether the UI can absorb the failure as a no-op and keep running.
    ///
    /// Loader failures (config, catalog, script) are not recoverable: there is
    /// nothing sensible to render without them.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidIndex { .. }
                | Self::UnknownSection { .. }
                | Self::StorageUnavailable { .. }
                | Self::Io { .. }
                | Self::Serialization { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for FolioError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
