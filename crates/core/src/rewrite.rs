//! Splices translated fragments back into the original payload.

use crate::tag::TagSpec;
use crate::types::TranslationResult;
use quick_xml::escape::escape;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// The five predefined XML entities and numeric character references.
static ENTITY_REF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:amp|lt|gt|quot|apos|#([0-9]+)|#x([0-9A-Fa-f]+));").unwrap()
});

/// Substitutes the k-th tag match with the k-th translated text.
///
/// This is a textual substitution: nothing outside the matched tag pairs is
/// touched and no well-formedness check is made.
#[derive(Debug, Clone, Default)]
pub struct PayloadRewriter {
    tag: TagSpec,
}

impl PayloadRewriter {
    /// Create a rewriter for the given tag contract.
    pub fn new(tag: TagSpec) -> Self {
        Self { tag }
    }

    /// Rewrite `payload` and return it as UTF-8 bytes.
    ///
    /// Matches beyond `result.len()` are left as they are.
    pub fn rewrite(&self, payload: &str, result: &TranslationResult) -> Vec<u8> {
        self.rewrite_str(payload, result).into_owned().into_bytes()
    }

    /// Rewrite `payload`, borrowing it unchanged when there are no matches.
    pub fn rewrite_str<'p>(&self, payload: &'p str, result: &TranslationResult) -> Cow<'p, str> {
        let mut counter = 0;
        self.tag
            .fragment_regex()
            .replace_all(payload, |caps: &Captures<'_>| {
                let replacement = match result.get(counter) {
                    Some(text) => self.tag.wrap(&escape_markup(text)),
                    None => caps[0].to_string(),
                };
                counter += 1;
                replacement
            })
    }
}

/// Escape `&`, `<`, `>`, `"` and `'`, keeping existing XML references.
///
/// Untranslated fragments are still in their escaped form, so `&amp;` must not
/// become `&amp;amp;` on the way back in. Only references XML itself defines
/// are kept: HTML entities such as `&nbsp;` and references to characters XML
/// forbids such as `&#0;` get their `&` escaped.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for caps in ENTITY_REF_REGEX.captures_iter(text) {
        let Some(entity) = caps.get(0) else { continue };
        let code_point = match (caps.get(1), caps.get(2)) {
            (Some(dec), _) => Some(u32::from_str_radix(dec.as_str(), 10).ok()),
            (_, Some(hex)) => Some(u32::from_str_radix(hex.as_str(), 16).ok()),
            _ => None,
        };
        // Numeric references that overflow or name a non-XML char stay escaped.
        if let Some(code_point) = code_point {
            if !code_point.is_some_and(is_xml_char) {
                continue;
            }
        }

        escaped.push_str(&escape(&text[last..entity.start()]));
        escaped.push_str(entity.as_str());
        last = entity.end();
    }
    escaped.push_str(&escape(&text[last..]));
    Cow::Owned(escaped)
}

/// The XML 1.0 `Char` production.
fn is_xml_char(code_point: u32) -> bool {
    matches!(
        code_point,
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FragmentExtractor;

    fn result(texts: &[&str]) -> TranslationResult {
        TranslationResult::new(texts.iter().map(|t| t.to_string()).collect())
    }

    fn rewrite(payload: &str, texts: &[&str]) -> String {
        let bytes = PayloadRewriter::default().rewrite(payload, &result(texts));
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_substitutes_in_order() {
        let payload = "<p:sp><a:t>Hello</a:t><a:r><a:t>AWS Lambda</a:t></a:r></p:sp>";
        assert_eq!(
            rewrite(payload, &["你好", "AWS Lambda"]),
            "<p:sp><a:t>你好</a:t><a:r><a:t>AWS Lambda</a:t></a:r></p:sp>"
        );
    }

    #[test]
    fn test_escapes_reserved_characters() {
        let out = rewrite("<a:t>x</a:t>", &["R&D <beta> \"new\" it's"]);
        assert_eq!(
            out,
            "<a:t>R&amp;D &lt;beta&gt; &quot;new&quot; it&apos;s</a:t>"
        );
    }

    #[test]
    fn test_existing_entities_not_double_escaped() {
        assert_eq!(escape_markup("AT&amp;T &#8217; &#x2019;"), "AT&amp;T &#8217; &#x2019;");
        assert_eq!(escape_markup("a & b &amp c"), "a &amp; b &amp;amp c");
    }

    #[test]
    fn test_undefined_references_escaped() {
        let out = rewrite("<a:t>x</a:t>", &["Preis:&nbsp;5&euro; &#0;"]);
        assert_eq!(out, "<a:t>Preis:&amp;nbsp;5&amp;euro; &amp;#0;</a:t>");

        assert_eq!(escape_markup("&#xD800;"), "&amp;#xD800;");
        assert_eq!(escape_markup("&#99999999999;"), "&amp;#99999999999;");
        assert_eq!(escape_markup("&#9;&#x1F600;&apos;"), "&#9;&#x1F600;&apos;");
    }

    #[test]
    fn test_plain_text_borrowed() {
        assert!(matches!(escape_markup("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_extra_matches_left_untouched() {
        let payload = "<a:t>one</a:t><a:t>two</a:t><a:t>a & b</a:t>";
        assert_eq!(
            rewrite(payload, &["eins"]),
            "<a:t>eins</a:t><a:t>two</a:t><a:t>a & b</a:t>"
        );
    }

    #[test]
    fn test_no_matches_returns_payload() {
        let payload = "<p:sld><p:cSld/></p:sld>";
        let rewritten = PayloadRewriter::default().rewrite_str(payload, &result(&["x"]));
        assert!(matches!(rewritten, Cow::Borrowed(_)));
        assert_eq!(rewritten, payload);
    }

    #[test]
    fn test_round_trip_with_originals() {
        let payload = "<?xml version=\"1.0\"?>\n<p:sld>\
            <a:t>Hello</a:t><a:t></a:t><a:t>Q&amp;A\nsession</a:t><a:t>Hello</a:t>\
            </p:sld>";
        let fragments = FragmentExtractor::default().extract(payload);
        let untranslated = TranslationResult::untranslated(&fragments);

        let rewritten = PayloadRewriter::default().rewrite(payload, &untranslated);
        assert_eq!(rewritten, payload.as_bytes());
    }

    #[test]
    fn test_attributes_outside_matches_preserved() {
        let payload = r#"<a:r><a:rPr lang="en-US" b="1"/><a:t>Hi</a:t></a:r>"#;
        assert_eq!(
            rewrite(payload, &["Hallo"]),
            r#"<a:r><a:rPr lang="en-US" b="1"/><a:t>Hallo</a:t></a:r>"#
        );
    }
}
