//! End-to-end scan tests
//!
//! Runs the full pipeline (traversal, extraction, matching,
//! progress) against document trees on disk.

use crate::common::{
    create_test_services, ordered_names, relative_names, scan_collect, CollectingSink, DocTree,
};
use docseek::core::config::Config;
use docseek::core::scanner::{CancelFlag, DocxExtractor, Extraction, TextExtractor};
use docseek::core::services::Services;
use docseek::core::types::{
    CancelPolicy, ExtractFailure, ProgressEvent, ScanEvent, ScanOutcome, ScanQuery, SkipReason,
};
use std::path::Path;
use std::sync::Arc;

fn completed(outcome: ScanOutcome) -> docseek::ScanResult {
    match outcome {
        ScanOutcome::Completed(result) => result,
        other => panic!("Expected a completed scan, got {other:?}"),
    }
}

/// Case-insensitive recursive search over the reference tree
#[test]
fn test_recursive_scan_reference_tree() {
    let tree = DocTree::reference();
    let services = create_test_services();

    let (outcome, _) = scan_collect(&services, tree.path(), "hello", true);
    let result = completed(outcome);

    // Processing order: top-level files, then sub/
    assert_eq!(
        ordered_names(tree.path(), &result.matches),
        vec!["a.docx", "sub/c.docx"]
    );
    assert_eq!(result.stats.candidates, 3);
    assert_eq!(result.stats.processed, 3);
    assert_eq!(result.stats.matched, 2);
    assert!(result.skipped.is_empty());
}

/// Non-recursive search only sees the top level
#[test]
fn test_flat_scan_reference_tree() {
    let tree = DocTree::reference();
    let services = create_test_services();

    let (outcome, _) = scan_collect(&services, tree.path(), "hello", false);
    let result = completed(outcome);

    assert_eq!(relative_names(tree.path(), &result.matches), vec!["a.docx"]);
    assert_eq!(result.stats.candidates, 2);
}

/// Every candidate produces exactly one progress event, in order
#[test]
fn test_progress_events_cover_every_candidate() {
    let tree = DocTree::reference();
    let services = create_test_services();

    let (_, events) = scan_collect(&services, tree.path(), "hello", true);

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], ScanEvent::Started { total: 3 });

    let progress: Vec<ProgressEvent> = events[1..]
        .iter()
        .map(|event| match event {
            ScanEvent::Progress(p) => p.clone(),
            other => panic!("Unexpected event {other:?}"),
        })
        .collect();

    let processed: Vec<usize> = progress.iter().map(|p| p.processed).collect();
    assert_eq!(processed, vec![1, 2, 3]);
    assert!(progress.iter().all(|p| p.total == 3));

    let names: Vec<&str> = progress.iter().map(|p| p.current_name.as_str()).collect();
    assert_eq!(names, vec!["a.docx", "b.docx", "c.docx"]);

    let matched: Vec<bool> = progress.iter().map(|p| p.matched).collect();
    assert_eq!(matched, vec![true, false, true]);
    assert!(progress[2].is_last());
}

/// A folder with no documents is distinct from a scan with no matches
#[test]
fn test_no_candidates_vs_no_matches() {
    let services = create_test_services();

    let empty = DocTree::new();
    empty.add_file("notes.txt", b"hello");
    let (outcome, events) = scan_collect(&services, empty.path(), "hello", true);
    assert!(matches!(outcome, ScanOutcome::NoCandidates { .. }));
    assert!(events.is_empty(), "No events expected without candidates");

    let tree = DocTree::reference();
    let (outcome, events) = scan_collect(&services, tree.path(), "absent phrase", true);
    let result = completed(outcome);
    assert!(!result.has_matches());
    assert_eq!(result.stats.processed, 3);
    assert_eq!(events.len(), 4);
}

/// Scanning the same unchanged tree twice gives the same answer
#[test]
fn test_scan_is_repeatable() {
    let tree = DocTree::with_docs(&[
        ("x/1.docx", "needle"),
        ("x/2.docx", "hay"),
        ("y/3.docx", "more NEEDLE"),
        ("4.docx", "needles everywhere"),
    ]);
    let services = create_test_services();

    let (first, _) = scan_collect(&services, tree.path(), "needle", true);
    let (second, _) = scan_collect(&services, tree.path(), "needle", true);

    let first = completed(first);
    let second = completed(second);
    assert_eq!(first.matches, second.matches);
    // Top-level files before x/ and y/
    assert_eq!(
        ordered_names(tree.path(), &first.matches),
        vec!["4.docx", "x/1.docx", "y/3.docx"]
    );
}

/// Broken documents are skipped without stopping the scan
#[test]
fn test_broken_documents_are_skipped() {
    let tree = DocTree::with_docs(&[("good.docx", "target text")]);
    tree.add_file("broken.docx", b"not a zip");
    tree.add_file("~$good.docx", b"\x00\x01lock file");
    let services = create_test_services();

    let (outcome, events) = scan_collect(&services, tree.path(), "target", true);
    let result = completed(outcome);

    assert_eq!(relative_names(tree.path(), &result.matches), vec!["good.docx"]);
    assert_eq!(result.stats.processed, 3);
    assert_eq!(result.skipped.len(), 2);
    assert!(result.skipped.iter().all(|s| matches!(
        s.reason,
        SkipReason::ExtractionFailed(ExtractFailure::NotAPackage(_))
    )));
    assert_eq!(events.len(), 4);
}

/// A locked subfolder does not change what the rest of the tree yields
#[cfg(unix)]
#[test]
fn test_unreadable_subfolder_is_isolated() {
    use std::os::unix::fs::PermissionsExt;

    let tree = DocTree::reference();
    tree.add_doc("locked/hidden.docx", &["hello from the dark"]);
    let locked = tree.path().join("locked");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let services = create_test_services();
    let (outcome, _) = scan_collect(&services, tree.path(), "hello", true);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    let result = completed(outcome);
    assert_eq!(
        relative_names(tree.path(), &result.matches),
        vec!["a.docx", "sub/c.docx"]
    );
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].reason, SkipReason::PermissionDenied);
}

/// Extractor that raises a cancel flag after its first document
struct CancellingExtractor {
    inner: DocxExtractor,
    cancel: CancelFlag,
}

impl TextExtractor for CancellingExtractor {
    fn extract(&self, path: &Path) -> Extraction {
        self.cancel.cancel();
        self.inner.extract(path)
    }
}

fn run_cancelled(policy: CancelPolicy) -> (ScanOutcome, DocTree) {
    let tree = DocTree::reference();
    let cancel = CancelFlag::new();

    let mut config = Config::default();
    config.scan.system_dirs.clear();
    config.scan.on_cancel = policy;
    let services = Services::with_extractor(
        config,
        Arc::new(CancellingExtractor {
            inner: DocxExtractor::default(),
            cancel: cancel.clone(),
        }),
    );

    let query = ScanQuery::new(tree.path(), "hello", true).unwrap();
    let outcome = services
        .create_orchestrator()
        .unwrap()
        .run(&query, &CollectingSink::default(), &cancel)
        .unwrap();
    (outcome, tree)
}

/// Cancellation stops between documents and keeps what was found
#[test]
fn test_cancel_keeps_partial_matches() {
    let (outcome, tree) = run_cancelled(CancelPolicy::Partial);

    match &outcome {
        ScanOutcome::Cancelled {
            processed,
            total,
            partial: Some(partial),
        } => {
            assert_eq!(*processed, 1);
            assert_eq!(*total, 3);
            assert_eq!(relative_names(tree.path(), &partial.matches), vec!["a.docx"]);
        }
        other => panic!("Expected a partial cancellation, got {other:?}"),
    }
}

/// The discard policy drops matches found before cancellation
#[test]
fn test_cancel_discards_matches() {
    let (outcome, _tree) = run_cancelled(CancelPolicy::Discard);

    assert!(matches!(
        outcome,
        ScanOutcome::Cancelled {
            processed: 1,
            total: 3,
            partial: None
        }
    ));
    assert!(outcome.matches().is_empty());
}

/// A spawned scan streams events and then yields its outcome
#[tokio::test]
async fn test_spawned_scan_streams_events() {
    let tree = DocTree::reference();
    let services = create_test_services();
    let orchestrator = Arc::new(services.create_orchestrator().unwrap());
    let query = ScanQuery::new(tree.path(), "HELLO", true).unwrap();

    let mut handle = orchestrator.spawn(query);
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }

    let outcome = handle.outcome().await.unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(
        relative_names(tree.path(), outcome.matches()),
        vec!["a.docx", "sub/c.docx"]
    );
}
