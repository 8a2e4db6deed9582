//! Search command - scan a folder for documents containing a phrase

use crate::cli::output::{colors, format_count, format_duration, print_header, print_success};
use crate::cli::progress::ProgressLine;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{ScanOutcome, ScanQuery, Skipped};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive, literal)
    pub text: String,

    /// Folder to scan (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Include subfolders (the configured default)
    #[arg(long, short = 'r', conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// Only scan the folder itself, not its subfolders
    #[arg(long, short = 'n')]
    pub no_recursive: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// List every skipped location and unreadable document
    #[arg(long)]
    pub show_skipped: bool,
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    MatchesFound,
    NoMatches,
    NoCandidates,
    Cancelled,
}

/// Skipped item in the response
#[derive(Debug, Serialize)]
pub struct SkippedItem {
    pub path: String,
    pub reason: String,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub root: String,
    pub recursive: bool,
    pub status: SearchStatus,
    pub candidates: usize,
    pub processed: usize,
    pub matches: Vec<String>,
    pub skipped: Vec<SkippedItem>,
    pub duration_secs: f64,
}

impl SearchResponse {
    /// Build the response for a finished scan
    pub fn from_outcome(query: &ScanQuery, outcome: &ScanOutcome) -> Self {
        let (status, candidates, processed, duration_ms) = match outcome {
            ScanOutcome::NoCandidates { .. } => (SearchStatus::NoCandidates, 0, 0, 0),
            ScanOutcome::Completed(result) => {
                let status = if result.has_matches() {
                    SearchStatus::MatchesFound
                } else {
                    SearchStatus::NoMatches
                };
                (
                    status,
                    result.stats.candidates,
                    result.stats.processed,
                    result.stats.duration_ms,
                )
            }
            ScanOutcome::Cancelled {
                processed,
                total,
                partial,
            } => (
                SearchStatus::Cancelled,
                *total,
                *processed,
                partial.as_ref().map(|r| r.stats.duration_ms).unwrap_or(0),
            ),
        };

        Self {
            query: query.text().to_string(),
            root: query.root().to_string_lossy().into_owned(),
            recursive: query.recursive(),
            status,
            candidates,
            processed,
            matches: outcome
                .matches()
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            skipped: outcome.skipped().iter().map(skipped_item).collect(),
            duration_secs: duration_ms as f64 / 1000.0,
        }
    }
}

fn skipped_item(skipped: &Skipped) -> SkippedItem {
    SkippedItem {
        path: skipped.path.to_string_lossy().into_owned(),
        reason: skipped.reason.to_string(),
    }
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let recursive = if args.no_recursive {
        false
    } else if args.recursive {
        true
    } else {
        services.config.scan.recursive
    };

    // Rejects empty text and missing folders before any scanning
    let query = ScanQuery::new(&root, &args.text, recursive)?;
    let orchestrator = Arc::new(services.create_orchestrator()?);

    let mut handle = orchestrator.spawn(query.clone());

    let cancel = handle.cancel_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current document");
            cancel.cancel();
        }
    });

    let mut progress = ProgressLine::new(!args.quiet && format == OutputFormat::Human);
    while let Some(event) = handle.next_event().await {
        progress.update(&event);
    }
    progress.finish();
    interrupt.abort();

    let outcome = handle.outcome().await?;
    let response = SearchResponse::from_outcome(&query, &outcome);

    match format {
        OutputFormat::Human => print_human(&response, args.show_skipped),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &SearchResponse, show_skipped: bool) {
    match response.status {
        SearchStatus::MatchesFound => {
            print_header(&format!(
                "Found {} containing \"{}\"",
                format_count(response.matches.len(), "file", "files"),
                response.query
            ));
            for path in &response.matches {
                println!("  {}", colors::file_path(path));
            }
        }
        SearchStatus::NoMatches => {
            println!(
                "{}",
                colors::warning(&format!(
                    "No files containing \"{}\" were found",
                    response.query
                ))
            );
        }
        SearchStatus::NoCandidates => {
            println!(
                "{} in {}",
                colors::warning("No .docx files found"),
                colors::file_path(&response.root)
            );
        }
        SearchStatus::Cancelled => {
            println!(
                "{}",
                colors::warning(&format!(
                    "Scan cancelled after {} of {} documents",
                    response.processed, response.candidates
                ))
            );
            if !response.matches.is_empty() {
                print_header("Matches before cancellation:");
                for path in &response.matches {
                    println!("  {}", colors::file_path(path));
                }
            }
        }
    }

    if response.status != SearchStatus::NoCandidates {
        print_success(&format!(
            "Checked {} in {}",
            format_count(response.processed, "document", "documents"),
            format_duration(response.duration_secs)
        ));
    }

    if response.skipped.is_empty() {
        return;
    }

    if show_skipped {
        print_header("Skipped:");
        for item in &response.skipped {
            println!(
                "  {} {}",
                colors::file_path(&item.path),
                colors::dim(&format!("({})", item.reason))
            );
        }
    } else {
        println!(
            "{}",
            colors::dim(&format!(
                "{} skipped (use --show-skipped to list)",
                format_count(response.skipped.len(), "location", "locations")
            ))
        );
    }
}
