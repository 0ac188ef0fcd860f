//! One request/response round trip for a batch of fragments.

use crate::client::TranslationClient;
use crate::config::TranslationConfig;
use crate::error::Result;
use crate::reconcile::{Reconciliation, ReconciliationOutcome, ResponseReconciler};
use crate::request::TranslationRequestBuilder;
use crate::types::{Fragment, TranslationResult};

/// Builds the prompt, calls the model once and reconciles the answer.
#[derive(Debug, Clone, Default)]
pub struct BatchTranslator {
    config: TranslationConfig,
    builder: TranslationRequestBuilder,
    reconciler: ResponseReconciler,
}

impl BatchTranslator {
    /// Create a translator for the given configuration.
    pub fn new(config: TranslationConfig) -> Self {
        Self {
            builder: TranslationRequestBuilder::new(config.clone()),
            reconciler: ResponseReconciler::new(config.tag().clone()),
            config,
        }
    }

    /// Translate `fragments` with a single call to `client`.
    ///
    /// An empty batch returns immediately without contacting the model.
    /// Transport failures propagate; reconciliation problems do not.
    pub fn translate<C>(&self, client: &C, fragments: &[Fragment]) -> Result<Reconciliation>
    where
        C: TranslationClient + ?Sized,
    {
        if fragments.is_empty() {
            return Ok(Reconciliation {
                result: TranslationResult::default(),
                outcome: ReconciliationOutcome::Complete,
                missing: Vec::new(),
            });
        }

        let markup = self.builder.identified_markup(fragments);
        let prompt = self.builder.build_with_markup(&markup);
        if self.config.debug() {
            log::debug!("Prompt:\n{}", prompt);
        }

        let response = client.send(&prompt)?;
        if self.config.debug() {
            log::debug!("LLM Response:\n{}", response);
        }

        let reconciliation = self.reconciler.reconcile(fragments, &response);
        if reconciliation.is_fallback() {
            log::warn!("{}\n{}\n{}", markup, "#".repeat(80), response);
        }

        Ok(reconciliation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    /// Replays a canned response and records every prompt it receives.
    struct ScriptedClient {
        response: std::result::Result<String, String>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedClient {
        fn answering(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl TranslationClient for ScriptedClient {
        fn send(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.response.clone().map_err(Error::TransportError)
        }
    }

    fn fragments(texts: &[&str]) -> Vec<Fragment> {
        texts.iter().map(|t| Fragment::new(*t)).collect()
    }

    #[test]
    fn test_empty_batch_sends_nothing() {
        let client = ScriptedClient::answering("unused");
        let reconciliation = BatchTranslator::default().translate(&client, &[]).unwrap();

        assert!(reconciliation.result.is_empty());
        assert!(client.prompts.borrow().is_empty());
    }

    #[test]
    fn test_single_request_per_batch() {
        let client =
            ScriptedClient::answering(r#"<a:t id="0">你好</a:t><a:t id="1">AWS Lambda</a:t>"#);
        let translator = BatchTranslator::new(TranslationConfig::new().with_debug(true));

        let reconciliation = translator
            .translate(&client, &fragments(&["Hello", "AWS Lambda"]))
            .unwrap();

        assert_eq!(client.prompts.borrow().len(), 1);
        assert!(client.prompts.borrow()[0].contains(r#"<a:t id="1">AWS Lambda</a:t>"#));
        assert_eq!(
            reconciliation.result.into_texts(),
            vec!["你好".to_string(), "AWS Lambda".to_string()]
        );
    }

    #[test]
    fn test_transport_failure_propagates() {
        let client = ScriptedClient::failing("connection reset");
        let err = BatchTranslator::default()
            .translate(&client, &fragments(&["Hello"]))
            .unwrap_err();

        assert!(matches!(err, Error::TransportError(ref msg) if msg == "connection reset"));
    }

    #[test]
    fn test_works_through_trait_object() {
        let client: Box<dyn TranslationClient> =
            Box::new(ScriptedClient::answering(r#"<a:t id="0">Hallo</a:t>"#));
        let reconciliation = BatchTranslator::default()
            .translate(&client, &fragments(&["Hello"]))
            .unwrap();

        assert_eq!(reconciliation.result.get(0), Some("Hallo"));
    }
}
