//! Builds the single prompt that carries one batch of fragments.

use crate::config::TranslationConfig;
use crate::types::{Fragment, IdentifiedFragment};

/// Serializes fragments into a prompt keyed by positional identifiers.
///
/// The wording of the instructions can change freely; the identifier framing
/// cannot, because the reconciler relies on it to map answers back.
#[derive(Debug, Clone, Default)]
pub struct TranslationRequestBuilder {
    config: TranslationConfig,
}

impl TranslationRequestBuilder {
    /// Create a builder for the given configuration.
    pub fn new(config: TranslationConfig) -> Self {
        Self { config }
    }

    /// Emit each fragment on its own line, wrapped in the tag and annotated
    /// with its zero-based index.
    pub fn identified_markup(&self, fragments: &[Fragment]) -> String {
        let tag = self.config.tag();
        IdentifiedFragment::enumerate(fragments)
            .map(|f| tag.wrap_identified(f.index, f.fragment.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the full prompt for `fragments`.
    pub fn build(&self, fragments: &[Fragment]) -> String {
        self.build_with_markup(&self.identified_markup(fragments))
    }

    /// Build the prompt around markup already produced by
    /// [`identified_markup`](Self::identified_markup).
    pub fn build_with_markup(&self, markup: &str) -> String {
        let tag = self.config.tag();
        let element = tag.element();
        let attribute = tag.id_attribute();
        let language = self.config.target_language();

        let mut prompt = String::with_capacity(markup.len() + 1024);
        prompt.push_str(&format!(
            "You are a professional translator. Translate the text inside <{element}> tags to {language}.\n\n"
        ));
        prompt.push_str("CRITICAL RULES:\n");
        prompt.push_str(&format!(
            "1. Return EXACTLY the same number of <{element}> tags with matching {attribute} attributes\n"
        ));
        prompt.push_str("2. Do NOT merge, split, or reorder tags\n");
        prompt.push_str("3. Preserve formatting, line breaks, and whitespace within tags\n");
        prompt.push_str(
            "4. Keep unchanged: company names, product names, technical terms, proper nouns, numbers, URLs\n",
        );
        prompt.push_str(&format!(
            "5. If text is already in {language} or is empty, keep it as is\n\n"
        ));
        prompt.push_str("EXAMPLE:\n");
        prompt.push_str("Input:\n");
        prompt.push_str(&tag.wrap_identified(0, "Hello World"));
        prompt.push('\n');
        prompt.push_str(&tag.wrap_identified(1, "AWS Lambda"));
        prompt.push('\n');
        prompt.push_str("Output:\n");
        prompt.push_str(&tag.wrap_identified(0, "你好世界"));
        prompt.push('\n');
        prompt.push_str(&tag.wrap_identified(1, "AWS Lambda"));
        prompt.push_str("\n\n");
        prompt.push_str("INPUT:\n");
        prompt.push_str(markup);
        prompt.push_str("\n\n");
        prompt.push_str("OUTPUT (XML only, no explanations):");
        prompt
    }
}
