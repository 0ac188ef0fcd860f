//! Maps a free-text model response back onto the fragments it came from.
//!
//! Two fallback layers apply. A slot whose identifier is missing from the
//! response keeps its original text. On top of that, if any slot had to fall
//! back, the whole response is discarded and every slot keeps its original,
//! since a partial answer usually means the model merged or shifted tags.

use crate::tag::TagSpec;
use crate::types::{Fragment, TranslationResult};

/// How a response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Every identifier was found; the translations are used.
    Complete,
    /// Some identifiers were missing; all originals are used instead.
    Fallback {
        /// Number of slots that had a translation.
        matched: usize,
        /// Number of slots expected.
        expected: usize,
    },
}

/// Result of reconciling one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// One text per fragment, in extraction order.
    pub result: TranslationResult,

    /// Whether the translations or the originals ended up in `result`.
    pub outcome: ReconciliationOutcome,

    /// Indices for which the response had no identifiable translation.
    pub missing: Vec<usize>,
}

impl Reconciliation {
    /// Whether the whole-response fallback was applied.
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ReconciliationOutcome::Fallback { .. })
    }
}

/// Recovers one translation per identifier from a raw response.
#[derive(Debug, Clone, Default)]
pub struct ResponseReconciler {
    tag: TagSpec,
}

impl ResponseReconciler {
    /// Create a reconciler for the given tag contract.
    pub fn new(tag: TagSpec) -> Self {
        Self { tag }
    }

    /// Reconcile `response` against the `fragments` that were sent.
    ///
    /// The returned result always holds exactly `fragments.len()` texts.
    /// Identifiers outside `0..fragments.len()` are ignored.
    pub fn reconcile(&self, fragments: &[Fragment], response: &str) -> Reconciliation {
        let expected = fragments.len();
        let mut texts = Vec::with_capacity(expected);
        let mut missing = Vec::new();

        for (index, fragment) in fragments.iter().enumerate() {
            match self.find_translation(response, index) {
                Some(text) => texts.push(text.to_string()),
                None => {
                    log::warn!("Missing translation for id={}, using original text", index);
                    missing.push(index);
                    texts.push(fragment.as_str().to_string());
                }
            }
        }

        let matched = expected - missing.len();
        if matched != expected {
            log::warn!("Expected {} texts, got {}", expected, matched);
            return Reconciliation {
                result: TranslationResult::untranslated(fragments),
                outcome: ReconciliationOutcome::Fallback { matched, expected },
                missing,
            };
        }

        Reconciliation {
            result: TranslationResult::new(texts),
            outcome: ReconciliationOutcome::Complete,
            missing,
        }
    }

    /// Inner text of the first tag carrying identifier `index`.
    ///
    /// Equivalent to a lazy, newline-spanning match: the first opening tag with
    /// this identifier, up to the nearest closing tag after it.
    fn find_translation<'r>(&self, response: &'r str, index: usize) -> Option<&'r str> {
        let open = self.tag.open_identified(index);
        let close = self.tag.close();

        let start = response.find(&open)? + open.len();
        let len = response[start..].find(&close)?;
        Some(&response[start..start + len])
    }
}
