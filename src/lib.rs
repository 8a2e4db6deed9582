//! docseek - find Word documents by their text
//!
//! Scans a directory tree for `.docx` files and reports the ones
//! whose visible text contains a phrase, case-insensitively.
//!
//! # Architecture
//!
//! - **core**: Domain logic (adapter-agnostic)
//!   - config, error, types, xdg
//!   - scanner (walker, extractor, matcher, orchestrator)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - commands, output, progress
//!
//! # Key Features
//!
//! - Traversal that never aborts on locked or unsafe directories
//! - Broken documents count as non-matches, never as failures
//! - Progress streamed over a channel while the scan runs
//! - Cancellation between documents

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocseekError, Result};
pub use core::scanner::{CancelFlag, ScanHandle, ScanOrchestrator};
pub use core::services::Services;
pub use core::types::*;
