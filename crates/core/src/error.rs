//! Error types for presentation translation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the translation of a document.
///
/// Reconciliation problems are deliberately absent: a response that cannot be
/// mapped back onto its fragments degrades to the original text instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// The translation model could not be reached or answered with an error.
    #[error("Translation transport error: {0}")]
    TransportError(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
