//! Settings threaded into a translation run at construction time.

use crate::tag::TagSpec;

/// Language used when none is configured.
pub const DEFAULT_TARGET_LANGUAGE: &str = "Simplified Chinese";

/// Configuration for one translation run.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Human-readable name of the language to translate into.
    target_language: String,

    /// Tag contract for extraction, prompting and rewrite.
    tag: TagSpec,

    /// Log full prompts and raw model responses.
    debug: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            tag: TagSpec::default(),
            debug: false,
        }
    }
}

impl TranslationConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target language. Blank names keep the current language.
    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.target_language = language.trim().to_string();
        }
        self
    }

    /// Set the tag contract.
    pub fn with_tag(mut self, tag: TagSpec) -> Self {
        self.tag = tag;
        self
    }

    /// Enable or disable logging of prompts and responses.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn tag(&self) -> &TagSpec {
        &self.tag
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}
