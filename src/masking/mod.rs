//! Text maskers.
//!
//! Maskers replace the values of configured fields inside raw text with a
//! fixed marker. They never parse the payload: each variant finds value spans
//! with a single regex, collects them as [`MaskRange`]s and then rewrites the
//! text back to front.
//!
//! | Masker | Grammar |
//! |--------|---------|
//! | [`JsonBodyMasker`] | `"key" : "value"` with escaped quotes allowed in the value |
//! | [`FormUrlencodedBodyMasker`] | `key=value` after `^`, `&` or `?`, up to the next `&`, `#`, `"` or end of text |
//! | [`UriQueryMasker`] | `key=value` inside the query component of a URI |

mod form;
mod json;
mod uri;

pub use form::FormUrlencodedBodyMasker;
pub use json::JsonBodyMasker;
pub use uri::UriQueryMasker;

use regex::Regex;

/// Marker substituted for every masked value unless configured otherwise.
pub const DEFAULT_MARKER: &str = "<MASKED>";

/// Replaces configured field values in a text blob.
///
/// Implementations must be total: any input, including `None`, yields a
/// string. Masking the output a second time must not change it.
pub trait Masker: Send + Sync {
    /// Returns a masked copy of `text`, or an empty string for `None`.
    fn mask(&self, text: Option<&str>) -> String;
}

/// Byte span of a value to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRange {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl MaskRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<regex::Match<'_>> for MaskRange {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}

/// Replaces every range in `text` with `marker`.
///
/// Ranges are applied in descending end-offset order so each replacement
/// leaves the offsets of the remaining (earlier) ranges untouched.
#[must_use]
pub fn apply_mask_ranges(text: &str, mut ranges: Vec<MaskRange>, marker: &str) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    ranges.sort_by(|a, b| b.end.cmp(&a.end));

    let mut result = text.to_string();
    for range in ranges {
        result.replace_range(range.start..range.end, marker);
    }
    result
}

/// Collects the spans of capture group `group` for every match of `regex`.
fn capture_ranges(regex: &Regex, text: &str, group: usize) -> Vec<MaskRange> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(group).map(MaskRange::from))
        .collect()
}

/// Builds a case-sensitive alternation of literal field names.
///
/// Returns `None` when there is nothing to match.
fn field_alternation(fields: &[String]) -> Option<String> {
    let mut names: Vec<String> = fields
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| regex::escape(f))
        .collect();
    if names.is_empty() {
        return None;
    }
    names.sort();
    names.dedup();
    Some(names.join("|"))
}

/// Compiles a masking pattern, mapping engine rejections to config errors.
fn compile(pattern: &str) -> crate::Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        crate::Error::InvalidConfig(format!("masking pattern rejected: {e}"))
    })
}

/// Ordered list of maskers applied one after another.
///
/// Each masker consumes the previous one's output, so a body that is both
/// JSON and carries an embedded form string is handled by listing both.
#[derive(Default)]
pub struct MaskerChain {
    maskers: Vec<Box<dyn Masker>>,
}

impl MaskerChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a masker to the end of the chain.
    #[must_use]
    pub fn with(mut self, masker: impl Masker + 'static) -> Self {
        self.maskers.push(Box::new(masker));
        self
    }

    /// Appends a boxed masker to the end of the chain.
    pub fn push(&mut self, masker: Box<dyn Masker>) {
        self.maskers.push(masker);
    }

    /// Number of maskers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maskers.len()
    }

    /// Returns true if the chain has no maskers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maskers.is_empty()
    }
}

impl Masker for MaskerChain {
    fn mask(&self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return String::new();
        };
        self.maskers
            .iter()
            .fold(text.to_string(), |acc, masker| masker.mask(Some(&acc)))
    }
}

impl std::fmt::Debug for MaskerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskerChain")
            .field("len", &self.maskers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Masker for Upper {
        fn mask(&self, text: Option<&str>) -> String {
            text.map(str::to_uppercase).unwrap_or_default()
        }
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_apply_ranges_back_to_front() {
        let text = "a=xx&b=yyyy&c=z";
        let ranges = vec![MaskRange::new(2, 4), MaskRange::new(7, 11), MaskRange::new(14, 15)];
        assert_eq!(apply_mask_ranges(text, ranges, "#"), "a=#&b=#&c=#");
    }

    #[test]
    fn test_apply_ranges_unsorted_input() {
        let text = "a=xx&b=yyyy";
        let ranges = vec![MaskRange::new(2, 4), MaskRange::new(7, 11)];
        let reversed = vec![MaskRange::new(7, 11), MaskRange::new(2, 4)];
        assert_eq!(
            apply_mask_ranges(text, ranges, "<MASKED>"),
            apply_mask_ranges(text, reversed, "<MASKED>")
        );
    }

    #[test]
    fn test_apply_no_ranges() {
        assert_eq!(apply_mask_ranges("unchanged", Vec::new(), "#"), "unchanged");
    }

    #[test]
    fn test_field_alternation_escapes_metacharacters() {
        let alt = field_alternation(&fields(&["a.b", "c+"])).unwrap_or_default();
        assert_eq!(alt, r"a\.b|c\+");
    }

    #[test]
    fn test_field_alternation_empty() {
        assert!(field_alternation(&[]).is_none());
        assert!(field_alternation(&fields(&[""])).is_none());
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = MaskerChain::new()
            .with(JsonBodyMasker::new(&fields(&["password"])).unwrap_or_default())
            .with(Upper);
        assert_eq!(
            chain.mask(Some(r#"{"password":"x"}"#)),
            r#"{"PASSWORD":"<MASKED>"}"#
        );
    }

    #[test]
    fn test_empty_chain() {
        let chain = MaskerChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.mask(Some("body")), "body");
        assert_eq!(chain.mask(None), "");
    }
}
