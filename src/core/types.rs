//! Core data types for docseek.
//!
//! Queries, progress events, skip records and scan outcomes shared
//! by the scanner and the adapters that drive it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::error::{DocseekError, Result};

/// A validated, immutable scan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanQuery {
    root: PathBuf,
    text: String,
    recursive: bool,
}

impl ScanQuery {
    /// Create a scan query
    ///
    /// The search text is trimmed and must not be empty. The root
    /// must be an existing directory; it is stored in canonical
    /// form so every candidate path is absolute.
    pub fn new(root: impl AsRef<Path>, text: &str, recursive: bool) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DocseekError::InvalidQuery(
                "Search text cannot be empty".to_string(),
            ));
        }

        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|e| {
            DocseekError::InvalidPath(format!("'{}' does not exist: {e}", root.display()))
        })?;

        if !canonical.is_dir() {
            return Err(DocseekError::InvalidPath(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }

        Ok(Self {
            root: canonical,
            text: text.to_string(),
            recursive,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }
}

/// Progress after one candidate has been processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// 1-based count of candidates processed so far
    pub processed: usize,

    /// Candidate count fixed at scan start
    pub total: usize,

    /// File name of the candidate just processed
    pub current_name: String,

    /// Whether the candidate matched
    pub matched: bool,
}

impl ProgressEvent {
    pub fn is_last(&self) -> bool {
        self.processed == self.total
    }
}

/// Events delivered to a scan observer, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    /// Candidates resolved; processing is about to begin
    Started { total: usize },

    /// One candidate processed
    Progress(ProgressEvent),
}

/// Kind of location the walker refuses to enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsafeKind {
    System,
    ReparsePoint,
    Symlink,
}

/// Why a document produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExtractFailure {
    #[error("cannot open file: {0}")]
    Unreadable(String),

    #[error("not a document package: {0}")]
    NotAPackage(String),

    #[error("main document part '{0}' is missing")]
    MissingMainPart(String),

    #[error("main document part is {size} bytes, limit is {limit}")]
    PartTooLarge { size: u64, limit: u64 },

    #[error("malformed document XML: {0}")]
    Malformed(String),
}

/// Why a location or file contributed nothing to the scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    PermissionDenied,
    Unreadable(String),
    UnsafeLocation(UnsafeKind),
    AttributesUnavailable(String),
    Excluded,
    ExtractionFailed(ExtractFailure),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PermissionDenied => write!(f, "permission denied"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::UnsafeLocation(UnsafeKind::System) => write!(f, "system location"),
            SkipReason::UnsafeLocation(UnsafeKind::ReparsePoint) => write!(f, "reparse point"),
            SkipReason::UnsafeLocation(UnsafeKind::Symlink) => write!(f, "symbolic link"),
            SkipReason::AttributesUnavailable(e) => write!(f, "attributes unavailable: {e}"),
            SkipReason::Excluded => write!(f, "excluded by pattern"),
            SkipReason::ExtractionFailed(e) => write!(f, "{e}"),
        }
    }
}

/// A path that was skipped, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub path: PathBuf,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl Skipped {
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// What to hand back when a scan is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelPolicy {
    /// Return the matches found before cancellation
    #[default]
    Partial,

    /// Drop everything found so far
    Discard,
}

impl std::str::FromStr for CancelPolicy {
    type Err = DocseekError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partial" => Ok(CancelPolicy::Partial),
            "discard" => Ok(CancelPolicy::Discard),
            other => Err(DocseekError::ConfigError(format!(
                "Unknown cancel policy '{other}' (expected 'partial' or 'discard')"
            ))),
        }
    }
}

/// Statistics from a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Candidates found by traversal
    pub candidates: usize,

    /// Candidates actually processed
    pub processed: usize,

    /// Candidates that matched
    pub matched: usize,

    /// Locations and files skipped
    pub skipped: usize,

    /// Scan duration in milliseconds
    pub duration_ms: u64,
}

/// Matches in processing order, plus everything that was skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub matches: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
    pub stats: ScanStats,
}

impl ScanResult {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Terminal state of a scan that was allowed to start
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Traversal found no candidate documents
    NoCandidates { skipped: Vec<Skipped> },

    /// Every candidate was processed; the match list may be empty
    Completed(ScanResult),

    /// The scan stopped between two candidates
    Cancelled {
        processed: usize,
        total: usize,
        partial: Option<ScanResult>,
    },
}

impl ScanOutcome {
    /// Matches carried by the outcome, if any
    pub fn matches(&self) -> &[PathBuf] {
        match self {
            ScanOutcome::NoCandidates { .. } => &[],
            ScanOutcome::Completed(result) => &result.matches,
            ScanOutcome::Cancelled { partial, .. } => partial
                .as_ref()
                .map(|r| r.matches.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Skip records carried by the outcome
    pub fn skipped(&self) -> &[Skipped] {
        match self {
            ScanOutcome::NoCandidates { skipped } => skipped,
            ScanOutcome::Completed(result) => &result.skipped,
            ScanOutcome::Cancelled { partial, .. } => partial
                .as_ref()
                .map(|r| r.skipped.as_slice())
                .unwrap_or(&[]),
        }
    }
}
