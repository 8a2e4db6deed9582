//! Error types and error handling for docseek.
//!
//! Only configuration problems and top-level traversal failures
//! are ever returned as errors. Everything that goes wrong while
//! walking a tree or reading a single document is contained and
//! recorded as a typed skip instead (see `core::types::SkipReason`).

use thiserror::Error;

/// Result type alias for docseek operations
pub type Result<T> = std::result::Result<T, DocseekError>;

/// Main error type for docseek
#[derive(Error, Debug)]
pub enum DocseekError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to list {path}: {source}")]
    TraversalFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan worker failed: {0}")]
    WorkerFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DocseekError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error was raised while validating the scan
    /// inputs, before any traversal started
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DocseekError::InvalidQuery(_)
                | DocseekError::InvalidPath(_)
                | DocseekError::ConfigError(_)
                | DocseekError::TomlError(_)
        )
    }

    /// Check if this is a top-level listing failure
    pub fn is_traversal_error(&self) -> bool {
        matches!(self, DocseekError::TraversalFailed { .. })
    }
}
