//! Configuration management for docseek.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{DocseekError, Result};
use crate::core::types::CancelPolicy;
use crate::core::xdg::XdgDirs;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Largest accepted `extraction.max_part_size_mb` (4 GB)
pub const MAX_PART_SIZE_LIMIT_MB: usize = 4096;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Descend into subdirectories unless told otherwise
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Directory patterns to skip (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Directories treated as system locations
    #[serde(default = "default_system_dirs")]
    pub system_dirs: Vec<PathBuf>,

    /// What a cancelled scan hands back
    #[serde(default)]
    pub on_cancel: CancelPolicy,
}

/// Document extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Largest uncompressed main document part in MB
    #[serde(default = "default_max_part_size")]
    pub max_part_size_mb: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum search text length in characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

// Default value functions
fn default_recursive() -> bool {
    true
}

#[cfg(unix)]
fn default_system_dirs() -> Vec<PathBuf> {
    ["/proc", "/sys", "/dev", "/run"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

#[cfg(not(unix))]
fn default_system_dirs() -> Vec<PathBuf> {
    Vec::new()
}

fn default_max_part_size() -> usize {
    256
}

fn default_max_query_length() -> usize {
    500
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: default_recursive(),
            exclude_patterns: Vec::new(),
            system_dirs: default_system_dirs(),
            on_cancel: CancelPolicy::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_part_size_mb: default_max_part_size(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_query_length: default_max_query_length(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocseekError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Create default configuration
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DOCSEEK_CONFIG env var
    /// 2. XDG config file (~/.config/docseek/config.toml)
    /// 3. ./docseek.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCSEEK_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docseek.toml").exists() {
                Self::from_file("docseek.toml")?
            } else {
                Self::default()
            }
        };

        // Override with environment variables
        config.merge_env();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(recursive) = env::var("DOCSEEK_RECURSIVE") {
            if let Ok(r) = recursive.parse() {
                self.scan.recursive = r;
            }
        }
        if let Ok(policy) = env::var("DOCSEEK_ON_CANCEL") {
            match policy.parse() {
                Ok(p) => self.scan.on_cancel = p,
                Err(e) => tracing::warn!("Ignoring DOCSEEK_ON_CANCEL: {}", e),
            }
        }
        if let Ok(max_size) = env::var("DOCSEEK_MAX_PART_SIZE_MB") {
            if let Ok(size) = max_size.parse() {
                self.extraction.max_part_size_mb = size;
            }
        }
        if let Ok(max_query_len) = env::var("DOCSEEK_MAX_QUERY_LENGTH") {
            if let Ok(len) = max_query_len.parse() {
                self.search.max_query_length = len;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.extraction.max_part_size_mb == 0 {
            return Err(DocseekError::ConfigError(
                "Max part size must be non-zero".to_string(),
            ));
        }

        if self.extraction.max_part_size_mb > MAX_PART_SIZE_LIMIT_MB {
            return Err(DocseekError::ConfigError(format!(
                "Max part size is {} MB, limit is {MAX_PART_SIZE_LIMIT_MB} MB",
                self.extraction.max_part_size_mb
            )));
        }

        if self.search.max_query_length == 0 {
            return Err(DocseekError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        for pattern in &self.scan.exclude_patterns {
            Pattern::new(pattern).map_err(|e| {
                DocseekError::ConfigError(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Recursive: {}", self.scan.recursive);
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.scan.exclude_patterns.len()
        );
        tracing::info!("  System dirs: {:?}", self.scan.system_dirs);
        tracing::info!("  On cancel: {:?}", self.scan.on_cancel);
        tracing::info!(
            "  Max part size: {} MB",
            self.extraction.max_part_size_mb
        );
        tracing::info!("  Max query length: {}", self.search.max_query_length);
    }
}
