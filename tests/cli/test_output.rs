//! Tests for CLI output formatting helpers
//!
//! Tests the output formatting utilities:
//! - Duration formatting (ms, s, m)
//! - Count formatting (singular/plural)
//! - Progress bar messages and position

use docseek::cli::output::{format_count, format_duration};
use docseek::cli::progress::ProgressLine;
use docseek::core::types::{ProgressEvent, ScanEvent};

/// Test duration formatting across units
#[test]
fn test_format_duration_units() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.042), "42ms");
    assert_eq!(format_duration(1.0), "1.00s");
    assert_eq!(format_duration(59.5), "59.50s");
    assert_eq!(format_duration(60.0), "1m 0.0s");
    assert_eq!(format_duration(125.4), "2m 5.4s");
}

/// Test count formatting picks the right noun
#[test]
fn test_format_count_nouns() {
    assert_eq!(format_count(0, "location", "locations"), "0 locations");
    assert_eq!(format_count(1, "location", "locations"), "1 location");
    assert_eq!(format_count(2, "document", "documents"), "2 documents");
}

/// Test progress lines read "Checking i of N: name"
#[test]
fn test_progress_line_text() {
    assert_eq!(
        ProgressLine::render(&ScanEvent::Started { total: 12 }),
        "Preparing to check 12 documents..."
    );

    let event = ScanEvent::Progress(ProgressEvent {
        processed: 3,
        total: 12,
        current_name: "отчёт.docx".to_string(),
        matched: false,
    });
    assert_eq!(ProgressLine::render(&event), "Checking 3 of 12: отчёт.docx");
}

/// Test a hidden bar follows a whole scan and is cleared at the end
#[test]
fn test_progress_bar_follows_scan() {
    let mut line = ProgressLine::new(false);
    line.update(&ScanEvent::Started { total: 2 });
    assert!(line.is_hidden());

    for (i, name) in ["a.docx", "b.docx"].iter().enumerate() {
        line.update(&ScanEvent::Progress(ProgressEvent {
            processed: i + 1,
            total: 2,
            current_name: name.to_string(),
            matched: i == 0,
        }));
    }
    assert_eq!(line.position(), 2);
    assert_eq!(line.message(), "Checking 2 of 2: b.docx");

    line.finish();
    assert_eq!(line.message(), "");
}
