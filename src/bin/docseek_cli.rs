//! docseek CLI - find .docx documents containing a phrase
//!
//! # Examples
//!
//! ```bash
//! # Search the current folder and its subfolders
//! docseek search "quarterly report"
//!
//! # Search one folder only, JSON output
//! docseek search invoice ~/Documents --no-recursive --format json
//!
//! # Show configuration
//! docseek show-config
//! ```

use clap::Parser;
use docseek::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "docseek=debug" } else { "docseek=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)) // stdout carries results
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
