//! Case-insensitive literal substring matching.

use crate::core::error::{DocseekError, Result};

/// Tests extracted text for a fixed query
///
/// Both sides are folded with Unicode lowercase mapping, which does
/// not depend on the current locale. No whitespace normalisation or
/// tokenisation takes place.
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
}

impl Matcher {
    /// Create a matcher for `query`
    ///
    /// Returns `InvalidQuery` for an empty query; scans validate
    /// their text long before this point, so this only guards
    /// direct callers.
    pub fn new(query: &str) -> Result<Self> {
        if query.is_empty() {
            return Err(DocseekError::InvalidQuery(
                "Search text cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Check whether `text` contains the query
    pub fn is_match(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        text.to_lowercase().contains(&self.needle)
    }
}
