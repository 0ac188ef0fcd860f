//! Domain types for the fragments that travel through one translation batch.

/// One unit of translatable text, exactly as it appeared between its tags.
///
/// The text is kept raw: entity references stay encoded and whitespace is not
/// touched, so an untranslated fragment can be written back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
}

impl Fragment {
    /// Create a new fragment from raw markup text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw text of this fragment.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A fragment paired with its position in the extraction sequence.
///
/// The index doubles as the correlation identifier in the outgoing prompt, so
/// it is always the zero-based position and unique within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifiedFragment<'a> {
    /// Zero-based extraction index.
    pub index: usize,

    /// The fragment at that index.
    pub fragment: &'a Fragment,
}

impl<'a> IdentifiedFragment<'a> {
    /// Number every fragment by its position.
    pub fn enumerate(fragments: &'a [Fragment]) -> impl Iterator<Item = IdentifiedFragment<'a>> {
        fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| IdentifiedFragment { index, fragment })
    }
}

/// Translated texts, one per extracted fragment, in extraction order.
///
/// `texts[i]` is either the translation of fragment `i` or, when the model's
/// answer could not be trusted, the untranslated original.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationResult {
    texts: Vec<String>,
}

impl TranslationResult {
    /// Wrap already reconciled texts.
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }

    /// A result that leaves every fragment as it was.
    pub fn untranslated(fragments: &[Fragment]) -> Self {
        Self {
            texts: fragments.iter().map(|f| f.as_str().to_string()).collect(),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Text for slot `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    /// Iterate over the slots in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }

    /// Consume the result and return the texts.
    pub fn into_texts(self) -> Vec<String> {
        self.texts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_assigns_positions() {
        let fragments = vec![Fragment::new("Hello"), Fragment::new("Hello")];
        let identified: Vec<_> = IdentifiedFragment::enumerate(&fragments).collect();

        assert_eq!(identified.len(), 2);
        assert_eq!(identified[0].index, 0);
        assert_eq!(identified[1].index, 1);
        assert_eq!(identified[1].fragment.as_str(), "Hello");
    }

    #[test]
    fn test_untranslated_mirrors_fragments() {
        let fragments = vec![Fragment::new("a"), Fragment::new(""), Fragment::new("c")];
        let result = TranslationResult::untranslated(&fragments);

        assert_eq!(result.len(), 3);
        assert_eq!(result.get(1), Some(""));
        assert_eq!(result.iter().collect::<Vec<_>>(), vec!["a", "", "c"]);
    }
}
