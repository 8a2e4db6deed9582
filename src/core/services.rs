//! Unified service container for docseek
//!
//! Provides shared access to the configuration and the text
//! extractor, and builds scan orchestrators from them.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::scanner::{DocxExtractor, SafeTreeWalker, ScanOrchestrator, TextExtractor};
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Extractor shared by every scan
    pub extractor: Arc<dyn TextExtractor>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let extractor = Arc::new(DocxExtractor::new(config.extraction.max_part_size_mb));

        Self {
            extractor,
            config: Arc::new(config),
        }
    }

    /// Create services with a custom extractor
    pub fn with_extractor(config: Config, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            extractor,
            config: Arc::new(config),
        }
    }

    /// Create a ScanOrchestrator from the current configuration
    ///
    /// Orchestrators are cheap and created per command.
    pub fn create_orchestrator(&self) -> Result<ScanOrchestrator> {
        let walker = SafeTreeWalker::new(
            self.config.scan.system_dirs.clone(),
            self.config.scan.exclude_patterns.clone(),
        )?;

        Ok(ScanOrchestrator::new(
            walker,
            Arc::clone(&self.extractor),
            self.config.scan.on_cancel,
            self.config.search.max_query_length,
        ))
    }
}
