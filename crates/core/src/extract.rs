//! Pulls text fragments out of a markup payload.
//!
//! This is a textual pattern match, not an XML parse: malformed markup is
//! tolerated and whatever sits between a start and end tag is taken verbatim.

use crate::tag::TagSpec;
use crate::types::Fragment;

/// Extracts the inner text of every designated tag pair, in document order.
#[derive(Debug, Clone, Default)]
pub struct FragmentExtractor {
    tag: TagSpec,
}

impl FragmentExtractor {
    /// Create an extractor for the given tag contract.
    pub fn new(tag: TagSpec) -> Self {
        Self { tag }
    }

    /// Scan `payload` left to right and return every enclosed substring.
    ///
    /// Matching is non-greedy, so adjacent pairs stay separate, and spans
    /// newlines. Empty pairs yield empty fragments and duplicates are kept.
    /// An empty result means there is nothing to translate.
    pub fn extract(&self, payload: &str) -> Vec<Fragment> {
        self.tag
            .fragment_regex()
            .captures_iter(payload)
            .map(|caps| Fragment::new(caps.get(1).map_or("", |m| m.as_str())))
            .collect()
    }
}
