//! The tag contract shared by extraction, prompting, reconciliation and rewrite.
//!
//! All four stages must agree on one element name and one identifier attribute
//! or fragments stop lining up with their translations.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Element that carries visible text runs in DrawingML.
pub const DEFAULT_ELEMENT: &str = "a:t";

/// Attribute used to correlate prompt fragments with their translations.
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Matches `<a:t>...</a:t>` lazily, across newlines.
static DEFAULT_FRAGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<a:t>(.*?)</a:t>").unwrap());

/// Element name and identifier attribute for one translation protocol.
#[derive(Debug, Clone)]
pub struct TagSpec {
    element: String,
    id_attribute: String,
    fragment_regex: Regex,
}

impl TagSpec {
    /// Create a tag spec for a custom element and identifier attribute.
    ///
    /// Names may contain ASCII letters, digits, `:`, `_`, `-` and `.`.
    pub fn new(element: impl Into<String>, id_attribute: impl Into<String>) -> Result<Self> {
        let element = element.into();
        let id_attribute = id_attribute.into();
        validate_name(&element)?;
        validate_name(&id_attribute)?;

        let pattern = format!(
            "(?s)<{0}>(.*?)</{0}>",
            regex::escape(&element)
        );
        let fragment_regex = Regex::new(&pattern)
            .map_err(|e| Error::ConfigError(format!("Invalid tag pattern '{}': {}", pattern, e)))?;

        Ok(Self {
            element,
            id_attribute,
            fragment_regex,
        })
    }

    /// The element name, e.g. `a:t`.
    pub fn element(&self) -> &str {
        &self.element
    }

    /// The identifier attribute name, e.g. `id`.
    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Pattern matching a bare element pair; group 1 is the inner text.
    pub fn fragment_regex(&self) -> &Regex {
        &self.fragment_regex
    }

    /// `<a:t id="3">`
    pub fn open_identified(&self, index: usize) -> String {
        format!(r#"<{} {}="{}">"#, self.element, self.id_attribute, index)
    }

    /// `</a:t>`
    pub fn close(&self) -> String {
        format!("</{}>", self.element)
    }

    /// Wrap text in a bare element pair.
    pub fn wrap(&self, text: &str) -> String {
        format!("<{0}>{1}</{0}>", self.element, text)
    }

    /// Wrap text in an element pair annotated with its identifier.
    pub fn wrap_identified(&self, index: usize, text: &str) -> String {
        format!("{}{}{}", self.open_identified(index), text, self.close())
    }
}

impl Default for TagSpec {
    fn default() -> Self {
        Self {
            element: DEFAULT_ELEMENT.to_string(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            fragment_regex: DEFAULT_FRAGMENT_REGEX.clone(),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("Invalid markup name: '{}'", name)))
    }
}
