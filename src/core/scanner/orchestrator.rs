//! Scan orchestration.
//!
//! Coordinates the end-to-end scan:
//! 1. Validate the query
//! 2. Resolve the candidate list (recursive walk or flat listing)
//! 3. Extract and match candidates one at a time, in listing order
//! 4. Report progress after every candidate
//!
//! The producer never waits for its observer: events go through an
//! unbounded channel and a dropped receiver is ignored.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::core::error::{DocseekError, Result};
use crate::core::scanner::extractor::{Extraction, TextExtractor};
use crate::core::scanner::matcher::Matcher;
use crate::core::scanner::walker::{list_flat, SafeTreeWalker};
use crate::core::types::{
    CancelPolicy, ProgressEvent, ScanEvent, ScanOutcome, ScanQuery, ScanResult, ScanStats,
    SkipReason, Skipped,
};

/// Receives scan events from the producer
///
/// `emit` must return promptly; it is called on the scanning thread
/// between two candidates.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

impl ProgressSink for UnboundedSender<ScanEvent> {
    fn emit(&self, event: ScanEvent) {
        // A gone observer does not stop the scan
        let _ = self.send(event);
    }
}

/// Sink that drops every event
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn emit(&self, _event: ScanEvent) {}
}

/// Shared flag checked between candidates
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Orchestrates the scan pipeline
pub struct ScanOrchestrator {
    walker: SafeTreeWalker,
    extractor: Arc<dyn TextExtractor>,
    on_cancel: CancelPolicy,
    max_query_length: usize,
}

impl ScanOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `walker` - Walker used for recursive scans
    /// * `extractor` - Text extractor applied to every candidate
    /// * `on_cancel` - Whether a cancelled scan keeps its matches
    /// * `max_query_length` - Longest accepted search text, in chars
    pub fn new(
        walker: SafeTreeWalker,
        extractor: Arc<dyn TextExtractor>,
        on_cancel: CancelPolicy,
        max_query_length: usize,
    ) -> Self {
        Self {
            walker,
            extractor,
            on_cancel,
            max_query_length,
        }
    }

    /// Run a scan on the current thread
    ///
    /// Only configuration problems and a failed flat listing are
    /// returned as errors. Unreadable locations and broken
    /// documents end up in the result's skip list.
    pub fn run(
        &self,
        query: &ScanQuery,
        sink: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<ScanOutcome> {
        let start = Instant::now();

        // Step 1: Validate
        self.validate(query)?;
        let matcher = Matcher::new(query.text())?;

        // Step 2: Resolve candidates
        tracing::info!(
            "Collecting documents from {:?} (recursive: {})",
            query.root(),
            query.recursive()
        );
        let (candidates, mut skipped) = self.resolve_candidates(query)?;
        let total = candidates.len();
        tracing::info!("Found {} candidate documents", total);

        if candidates.is_empty() {
            return Ok(ScanOutcome::NoCandidates { skipped });
        }

        // Step 3: Extract and match
        sink.emit(ScanEvent::Started { total });

        let mut matches = Vec::new();
        let mut processed = 0;

        for path in &candidates {
            if cancel.is_cancelled() {
                tracing::info!("Scan cancelled after {}/{} documents", processed, total);
                return Ok(self.cancelled(matches, skipped, processed, total, start));
            }

            let matched = match self.extractor.extract(path) {
                Extraction::Text(text) => matcher.is_match(&text),
                Extraction::Failed(failure) => {
                    tracing::debug!("No text from {:?}: {}", path, failure);
                    skipped.push(Skipped::new(
                        path.clone(),
                        SkipReason::ExtractionFailed(failure),
                    ));
                    false
                }
            };

            if matched {
                tracing::debug!("Match: {:?}", path);
                matches.push(path.clone());
            }

            processed += 1;
            sink.emit(ScanEvent::Progress(ProgressEvent {
                processed,
                total,
                current_name: display_name(path),
                matched,
            }));
        }

        let result = build_result(matches, skipped, total, processed, start);
        tracing::info!(
            "Scan complete: {} of {} documents matched, {} skipped in {}ms",
            result.stats.matched,
            total,
            result.stats.skipped,
            result.stats.duration_ms
        );

        Ok(ScanOutcome::Completed(result))
    }

    /// Run a scan on a blocking worker
    ///
    /// Must be called from within a Tokio runtime. Events arrive on
    /// the handle's receiver; the channel closes when the scan ends.
    pub fn spawn(self: Arc<Self>, query: ScanQuery) -> ScanHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancelFlag::new();
        let worker_cancel = cancel.clone();

        let task = tokio::task::spawn_blocking(move || self.run(&query, &tx, &worker_cancel));

        ScanHandle {
            events: rx,
            cancel,
            task,
        }
    }

    fn validate(&self, query: &ScanQuery) -> Result<()> {
        let length = query.text().chars().count();
        if length > self.max_query_length {
            return Err(DocseekError::ConfigError(format!(
                "Search text is {length} characters long, maximum is {}",
                self.max_query_length
            )));
        }

        if !query.root().is_dir() {
            return Err(DocseekError::InvalidPath(format!(
                "'{}' is no longer a directory",
                query.root().display()
            )));
        }

        Ok(())
    }

    fn resolve_candidates(&self, query: &ScanQuery) -> Result<(Vec<PathBuf>, Vec<Skipped>)> {
        if query.recursive() {
            let report = self.walker.collect(query.root());
            Ok((report.candidates, report.skipped))
        } else {
            Ok((list_flat(query.root())?, Vec::new()))
        }
    }

    fn cancelled(
        &self,
        matches: Vec<PathBuf>,
        skipped: Vec<Skipped>,
        processed: usize,
        total: usize,
        start: Instant,
    ) -> ScanOutcome {
        let partial = match self.on_cancel {
            CancelPolicy::Partial => Some(build_result(matches, skipped, total, processed, start)),
            CancelPolicy::Discard => None,
        };

        ScanOutcome::Cancelled {
            processed,
            total,
            partial,
        }
    }
}

/// Caller side of a spawned scan
pub struct ScanHandle {
    events: UnboundedReceiver<ScanEvent>,
    cancel: CancelFlag,
    task: JoinHandle<Result<ScanOutcome>>,
}

impl ScanHandle {
    /// Next event, or `None` once the scan has finished
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    /// Flag that stops the scan before its next candidate
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Wait for the terminal outcome
    pub async fn outcome(self) -> Result<ScanOutcome> {
        self.task
            .await
            .map_err(|e| DocseekError::WorkerFailed(e.to_string()))?
    }
}

fn build_result(
    matches: Vec<PathBuf>,
    skipped: Vec<Skipped>,
    candidates: usize,
    processed: usize,
    start: Instant,
) -> ScanResult {
    let stats = ScanStats {
        candidates,
        processed,
        matched: matches.len(),
        skipped: skipped.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    ScanResult {
        matches,
        skipped,
        stats,
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
