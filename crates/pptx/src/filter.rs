//! Decides which archive entries get translated.

use std::fmt;

/// Part name prefixes for slides and speaker notes.
pub const SLIDE_PREFIXES: &[&str] = &["ppt/slides/slide", "ppt/notesSlides/notesSlide"];

/// Suffix shared by all translatable parts.
pub const XML_SUFFIX: &str = ".xml";

/// Predicate over entry names.
pub struct EntryFilter {
    predicate: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl EntryFilter {
    /// Slides and notes slides: `ppt/slides/slide*.xml`, `ppt/notesSlides/notesSlide*.xml`.
    ///
    /// Relationship parts such as `ppt/slides/_rels/slide1.xml.rels` do not match.
    pub fn slides_and_notes() -> Self {
        Self::with_prefixes(SLIDE_PREFIXES.iter().copied(), XML_SUFFIX)
    }

    /// Entries starting with any of `prefixes` and ending with `suffix`.
    pub fn with_prefixes<I, S>(prefixes: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        let suffix = suffix.into();
        Self::from_fn(move |name| {
            name.ends_with(suffix.as_str()) && prefixes.iter().any(|p| name.starts_with(p.as_str()))
        })
    }

    /// Wrap an arbitrary predicate.
    pub fn from_fn(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Whether the entry called `name` should be translated.
    pub fn is_eligible(&self, name: &str) -> bool {
        (self.predicate)(name)
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::slides_and_notes()
    }
}

impl fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFilter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slides_and_notes() {
        let filter = EntryFilter::default();
        assert!(filter.is_eligible("ppt/slides/slide1.xml"));
        assert!(filter.is_eligible("ppt/slides/slide12.xml"));
        assert!(filter.is_eligible("ppt/notesSlides/notesSlide3.xml"));
    }

    #[test]
    fn test_other_parts_rejected() {
        let filter = EntryFilter::default();
        assert!(!filter.is_eligible("ppt/slides/_rels/slide1.xml.rels"));
        assert!(!filter.is_eligible("ppt/slideLayouts/slideLayout1.xml"));
        assert!(!filter.is_eligible("ppt/slideMasters/slideMaster1.xml"));
        assert!(!filter.is_eligible("ppt/presentation.xml"));
        assert!(!filter.is_eligible("[Content_Types].xml"));
        assert!(!filter.is_eligible("ppt/media/slide1.png"));
    }

    #[test]
    fn test_custom_predicate() {
        let filter = EntryFilter::from_fn(|name| name == "word/document.xml");
        assert!(filter.is_eligible("word/document.xml"));
        assert!(!filter.is_eligible("ppt/slides/slide1.xml"));
    }
}
