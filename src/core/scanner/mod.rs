//! Document scanning module.
//!
//! Walks a directory tree for `.docx` files and tests the visible
//! text of each one against a search phrase. Key features:
//!
//! - Walker that never aborts (locked, system and linked
//!   directories are skipped and reported)
//! - Text extraction that turns every broken document into a
//!   non-match
//! - Case-insensitive literal matching
//! - Sequential orchestration with progress streamed over a channel
//!   and cancellation between documents

pub mod extractor;
pub mod matcher;
pub mod orchestrator;
pub mod walker;

#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::{DocxExtractor, Extraction, TextExtractor};
pub use matcher::Matcher;
pub use orchestrator::{CancelFlag, ProgressSink, ScanHandle, ScanOrchestrator, SilentSink};
pub use walker::{SafeTreeWalker, WalkItem, WalkReport};
