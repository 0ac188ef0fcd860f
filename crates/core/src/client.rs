//! The capability used to reach a translation model.

use crate::error::Result;

/// Sends one prompt and returns the model's raw text answer.
///
/// Calls block until the model answers or the transport fails. Failures are
/// reported as [`Error::TransportError`](crate::Error::TransportError) and are
/// not retried by the pipeline.
pub trait TranslationClient {
    fn send(&self, prompt: &str) -> Result<String>;
}

impl<T: TranslationClient + ?Sized> TranslationClient for &T {
    fn send(&self, prompt: &str) -> Result<String> {
        (**self).send(prompt)
    }
}

impl<T: TranslationClient + ?Sized> TranslationClient for Box<T> {
    fn send(&self, prompt: &str) -> Result<String> {
        (**self).send(prompt)
    }
}
