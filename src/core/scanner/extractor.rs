//! Visible-text extraction from `.docx` packages.
//!
//! A `.docx` file is a ZIP package. The package relationships name
//! the main document part (normally `word/document.xml`); its text
//! runs are concatenated, in document order, into one flat string.
//! Headings, tables and paragraph boundaries are not preserved: the
//! text only has to support substring search.
//!
//! Every failure is returned as [`Extraction::Failed`]. A broken
//! document is a non-match, never a reason to stop a scan.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::core::types::ExtractFailure;

/// Part used when the package relationships cannot be read
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

const PACKAGE_RELS_PART: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL_SUFFIX: &str = "/relationships/officeDocument";

/// Outcome of reading one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Failed(ExtractFailure),
}

impl Extraction {
    pub fn into_text(self) -> Option<String> {
        match self {
            Extraction::Text(text) => Some(text),
            Extraction::Failed(_) => None,
        }
    }
}

/// Turns a document file into its visible text
///
/// Implementations must not panic or block on anything except the
/// file they were given, and must release that file before
/// returning.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Extraction;
}

/// Extractor for Office Open XML word-processing documents
#[derive(Debug, Clone)]
pub struct DocxExtractor {
    /// Largest main part (uncompressed) that will be read
    max_part_bytes: u64,
}

impl DocxExtractor {
    /// Create a new extractor
    ///
    /// # Arguments
    ///
    /// * `max_part_size_mb` - Uncompressed size limit for the main
    ///   document part, in megabytes
    pub fn new(max_part_size_mb: usize) -> Self {
        Self {
            max_part_bytes: (max_part_size_mb as u64).saturating_mul(1024 * 1024),
        }
    }

    fn read_main_text(&self, path: &Path) -> Result<String, ExtractFailure> {
        let file = File::open(path).map_err(|e| ExtractFailure::Unreadable(e.to_string()))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| ExtractFailure::NotAPackage(e.to_string()))?;

        let part_name = main_part_name(&mut archive).unwrap_or_else(|| {
            tracing::debug!("No usable package relationships in {:?}", path);
            DEFAULT_MAIN_PART.to_string()
        });

        let part = match archive.by_name(&part_name) {
            Ok(part) => part,
            Err(ZipError::FileNotFound) => {
                return Err(ExtractFailure::MissingMainPart(part_name));
            }
            Err(e) => return Err(ExtractFailure::NotAPackage(e.to_string())),
        };

        if part.size() > self.max_part_bytes {
            return Err(ExtractFailure::PartTooLarge {
                size: part.size(),
                limit: self.max_part_bytes,
            });
        }

        collect_text_runs(BufReader::new(part.take(self.max_part_bytes)))
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new(256)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Extraction {
        match self.read_main_text(path) {
            Ok(text) => Extraction::Text(text),
            Err(failure) => Extraction::Failed(failure),
        }
    }
}

/// Find the main document part through `_rels/.rels`
fn main_part_name<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let rels = archive.by_name(PACKAGE_RELS_PART).ok()?;
    let mut reader = Reader::from_reader(BufReader::new(rels));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"Type" => rel_type = attr.unescape_value().ok().map(|v| v.into_owned()),
                        b"Target" => target = attr.unescape_value().ok().map(|v| v.into_owned()),
                        _ => {}
                    }
                }

                if let (Some(rel_type), Some(target)) = (rel_type, target) {
                    if rel_type.ends_with(OFFICE_DOCUMENT_REL_SUFFIX) {
                        return Some(target.trim_start_matches('/').to_string());
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Concatenate the content of every text-run element (`w:t`, `a:t`,
/// `m:t`); other character data is markup-only and ignored
fn collect_text_runs<R: BufRead>(source: R) -> Result<String, ExtractFailure> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut run_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => run_depth += 1,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => {
                run_depth = run_depth.saturating_sub(1);
            }
            Ok(Event::Text(t)) if run_depth > 0 => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| ExtractFailure::Malformed(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(c)) if run_depth > 0 => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractFailure::Malformed(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
