// Test helper functions

use docseek::core::config::Config;
use docseek::core::scanner::{CancelFlag, ProgressSink};
use docseek::core::services::Services;
use docseek::core::types::{ScanEvent, ScanOutcome, ScanQuery};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Create test services with default configuration
///
/// No system directories are configured so temp folders are never
/// mistaken for system locations.
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> Services {
    let mut config = Config::default();
    config.scan.system_dirs.clear();
    Services::new(config)
}

/// Sink that records every event it receives
#[allow(dead_code)] // Used in integration tests
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ScanEvent>>,
}

impl CollectingSink {
    #[allow(dead_code)] // Used in integration tests
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: ScanEvent) {
        self.events.lock().expect("sink poisoned").push(event);
    }
}

/// Run a scan to completion on the current thread, keeping its events
#[allow(dead_code)] // Used in integration tests
pub fn scan_collect(
    services: &Services,
    root: &Path,
    text: &str,
    recursive: bool,
) -> (ScanOutcome, Vec<ScanEvent>) {
    let query = ScanQuery::new(root, text, recursive).expect("Failed to build query");
    let orchestrator = services
        .create_orchestrator()
        .expect("Failed to create orchestrator");
    let sink = CollectingSink::default();

    let outcome = orchestrator
        .run(&query, &sink, &CancelFlag::new())
        .expect("Scan failed");
    (outcome, sink.events())
}

/// Paths relative to `root`, with '/' separators, in their given order
#[allow(dead_code)] // Used in integration tests
pub fn ordered_names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    let canonical = root.canonicalize().expect("Failed to canonicalize root");
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(&canonical)
                .or_else(|_| p.strip_prefix(root))
                .expect("Path outside root")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

/// Paths relative to `root`, with '/' separators, sorted
#[allow(dead_code)] // Used in integration tests
pub fn relative_names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    let mut names = ordered_names(root, paths);
    names.sort();
    names
}
