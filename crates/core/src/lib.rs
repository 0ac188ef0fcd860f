//! Core batch-translation protocol for presentation markup.
//!
//! Text runs are pulled out of a markup payload, sent to a translation model in
//! one prompt keyed by positional identifiers, matched back against the model's
//! answer and spliced into the original markup.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod reconcile;
pub mod request;
pub mod rewrite;
pub mod tag;
pub mod translator;
pub mod types;

pub use client::TranslationClient;
pub use config::TranslationConfig;
pub use error::{Error, Result};
pub use extract::FragmentExtractor;
pub use reconcile::{Reconciliation, ReconciliationOutcome, ResponseReconciler};
pub use request::TranslationRequestBuilder;
pub use rewrite::PayloadRewriter;
pub use tag::TagSpec;
pub use translator::BatchTranslator;
pub use types::{Fragment, IdentifiedFragment, TranslationResult};
