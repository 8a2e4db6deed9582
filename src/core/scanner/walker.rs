//! Fault-tolerant directory walker for candidate documents.
//!
//! Traverses directory trees depth-first and yields `.docx` files.
//! Nothing that happens below the root can stop the walk: locked
//! directories, system locations and links are skipped and reported
//! as typed `Skipped` records instead of errors.

use glob::Pattern;
use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{DocseekError, Result};
use crate::core::types::{SkipReason, Skipped, UnsafeKind};

/// Extension of the only document format docseek reads
pub const DOCX_EXTENSION: &str = "docx";

/// Something the walker produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    Candidate(PathBuf),
    Skipped(Skipped),
}

/// Candidates and skip records collected from a full walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub candidates: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
}

/// Check whether a path carries the `.docx` extension (any case)
pub fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION))
        .unwrap_or(false)
}

/// Directory walker that never fails
pub struct SafeTreeWalker {
    /// Directories treated as system locations
    system_dirs: Vec<PathBuf>,

    /// Patterns for directories to leave out (e.g., "**/archive")
    exclude_patterns: Vec<Pattern>,
}

impl SafeTreeWalker {
    /// Create a new walker
    ///
    /// # Arguments
    ///
    /// * `system_dirs` - Absolute directories never descended into
    /// * `exclude_patterns` - Glob patterns for directories to skip
    ///
    /// # Returns
    ///
    /// A new `SafeTreeWalker` or an error if a pattern is invalid
    pub fn new(system_dirs: Vec<PathBuf>, exclude_patterns: Vec<String>) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    DocseekError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            system_dirs,
            exclude_patterns: exclude,
        })
    }

    /// Start a lazy depth-first walk below `root`
    ///
    /// Within each directory, files come before subdirectories and
    /// both are visited in file-name order.
    pub fn walk<'a>(&'a self, root: &Path) -> SafeWalk<'a> {
        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter();

        SafeWalk {
            walker: self,
            inner,
        }
    }

    /// Walk `root` to completion
    pub fn collect(&self, root: &Path) -> WalkReport {
        let mut report = WalkReport::default();
        for item in self.walk(root) {
            match item {
                WalkItem::Candidate(path) => report.candidates.push(path),
                WalkItem::Skipped(skipped) => report.skipped.push(skipped),
            }
        }
        report
    }

    /// Decide whether a subdirectory may be entered
    fn check_directory(&self, entry: &DirEntry) -> Option<SkipReason> {
        let path = entry.path();

        if self.system_dirs.iter().any(|dir| dir == path) {
            return Some(SkipReason::UnsafeLocation(UnsafeKind::System));
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => return Some(SkipReason::AttributesUnavailable(e.to_string())),
        };

        if let Some(kind) = unsafe_kind(&metadata) {
            return Some(SkipReason::UnsafeLocation(kind));
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
        {
            return Some(SkipReason::Excluded);
        }

        None
    }
}

/// Iterator returned by [`SafeTreeWalker::walk`]
pub struct SafeWalk<'a> {
    walker: &'a SafeTreeWalker,
    inner: walkdir::IntoIter,
}

impl Iterator for SafeWalk<'_> {
    type Item = WalkItem;

    fn next(&mut self) -> Option<WalkItem> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let Some(path) = e.path().map(Path::to_path_buf) else {
                        tracing::warn!("Walk error without a path: {}", e);
                        continue;
                    };
                    let reason = match e.io_error() {
                        Some(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
                            SkipReason::PermissionDenied
                        }
                        _ => SkipReason::Unreadable(e.to_string()),
                    };
                    tracing::warn!("Skipping unlistable location {:?}: {}", path, reason);
                    return Some(WalkItem::Skipped(Skipped::new(path, reason)));
                }
            };

            // The root itself is never judged
            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();

            if file_type.is_dir() {
                if let Some(reason) = self.walker.check_directory(&entry) {
                    self.inner.skip_current_dir();
                    tracing::debug!("Skipping directory {:?}: {}", entry.path(), reason);
                    return Some(WalkItem::Skipped(Skipped::new(entry.into_path(), reason)));
                }
                continue;
            }

            if file_type.is_symlink() {
                // Links are never followed into directories
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_dir() => {
                        let reason = SkipReason::UnsafeLocation(UnsafeKind::Symlink);
                        tracing::debug!("Skipping linked directory {:?}", entry.path());
                        return Some(WalkItem::Skipped(Skipped::new(entry.into_path(), reason)));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        if is_docx(entry.path()) {
                            let reason = SkipReason::AttributesUnavailable(e.to_string());
                            return Some(WalkItem::Skipped(Skipped::new(
                                entry.into_path(),
                                reason,
                            )));
                        }
                        continue;
                    }
                }
            }

            if is_docx(entry.path()) {
                return Some(WalkItem::Candidate(entry.into_path()));
            }
        }
    }
}

/// List the `.docx` files directly inside `root`
///
/// Unlike the recursive walk, any listing failure is returned: with
/// no tree to fall back on, the caller has to hear about it.
pub fn list_flat(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .unwrap_or(root)
                .display()
                .to_string();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("directory listing failed"));
            DocseekError::TraversalFailed { path, source }
        })?;

        let path = entry.path();
        let is_file = if entry.file_type().is_symlink() {
            fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
        } else {
            entry.file_type().is_file()
        };

        if is_file && is_docx(path) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Order entries so files precede directories, then by name
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

#[cfg(windows)]
fn unsafe_kind(metadata: &Metadata) -> Option<UnsafeKind> {
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_REPARSE_POINT, FILE_ATTRIBUTE_SYSTEM,
    };

    let attributes = metadata.file_attributes();
    if attributes & FILE_ATTRIBUTE_SYSTEM != 0 {
        Some(UnsafeKind::System)
    } else if attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
        Some(UnsafeKind::ReparsePoint)
    } else if metadata.file_type().is_symlink() {
        Some(UnsafeKind::Symlink)
    } else {
        None
    }
}

#[cfg(not(windows))]
fn unsafe_kind(metadata: &Metadata) -> Option<UnsafeKind> {
    if metadata.file_type().is_symlink() {
        Some(UnsafeKind::Symlink)
    } else {
        None
    }
}
