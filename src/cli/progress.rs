//! Progress bar for the CLI
//!
//! Renders scan events as an indicatif bar on stderr, with the
//! current document in its message: `Checking 3 of 10: report.docx`.

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::types::ScanEvent;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Scan progress display on stderr
pub struct ProgressLine {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl ProgressLine {
    /// Creates a progress display; a disabled one draws nothing
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Message shown for an event
    pub fn render(event: &ScanEvent) -> String {
        match event {
            ScanEvent::Started { total } => format!("Preparing to check {total} documents..."),
            ScanEvent::Progress(p) => format!(
                "Checking {} of {}: {}",
                p.processed, p.total, p.current_name
            ),
        }
    }

    /// Updates the bar from an event
    pub fn update(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::Started { total } => {
                let bar = self.create_bar(*total as u64);
                bar.set_message(Self::render(event));
                self.bar = Some(bar);
            }
            ScanEvent::Progress(p) => {
                let total = p.total as u64;
                let bar = self.bar.get_or_insert_with(ProgressBar::hidden);
                bar.set_length(total);
                bar.set_position(p.processed as u64);
                bar.set_message(Self::render(event));
            }
        }
    }

    /// Clears the bar
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Documents processed so far
    pub fn position(&self) -> u64 {
        self.bar.as_ref().map(|bar| bar.position()).unwrap_or(0)
    }

    /// Current bar message
    pub fn message(&self) -> String {
        self.bar
            .as_ref()
            .map(|bar| bar.message())
            .unwrap_or_default()
    }

    /// Whether anything is drawn
    pub fn is_hidden(&self) -> bool {
        self.bar.as_ref().map(|bar| bar.is_hidden()).unwrap_or(true)
    }

    fn create_bar(&self, total: u64) -> ProgressBar {
        if !self.enabled {
            let bar = ProgressBar::hidden();
            bar.set_length(total);
            return bar;
        }

        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar
    }
}
