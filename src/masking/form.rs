//! Form-urlencoded body masking.

use super::{DEFAULT_MARKER, Masker, apply_mask_ranges, capture_ranges, compile, field_alternation};
use regex::Regex;

/// Masks values of configured keys in `application/x-www-form-urlencoded` text.
///
/// A pair is `key=value`, where the key starts the text or follows `&` or
/// `?`, and the value runs up to the next `&`, `#`, `"` or the end of the
/// text. The last pair needs no terminating delimiter. Accepting `?` catches
/// query strings embedded in other payloads, such as a redirect URL inside a
/// JSON string; stopping at `"` keeps the enclosing JSON string intact.
#[derive(Debug, Clone)]
pub struct FormUrlencodedBodyMasker {
    regex: Option<Regex>,
    marker: String,
}

impl FormUrlencodedBodyMasker {
    /// Builds a masker for the given keys.
    pub fn new(fields: &[String]) -> crate::Result<Self> {
        let regex = field_alternation(fields)
            .map(|alt| compile(&format!(r#"(?:^|[?&])(?:{alt})=([^&#"]*)"#)))
            .transpose()?;
        tracing::debug!(fields = fields.len(), "built form-urlencoded body masker");
        Ok(Self {
            regex,
            marker: DEFAULT_MARKER.to_string(),
        })
    }

    /// Sets a custom marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Masks `text`, which must be a bare `key=value&...` sequence.
    pub(super) fn mask_pairs(&self, text: &str) -> String {
        let Some(regex) = &self.regex else {
            return text.to_string();
        };
        apply_mask_ranges(text, capture_ranges(regex, text, 1), &self.marker)
    }
}

impl Default for FormUrlencodedBodyMasker {
    fn default() -> Self {
        Self {
            regex: None,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl Masker for FormUrlencodedBodyMasker {
    fn mask(&self, text: Option<&str>) -> String {
        text.map_or_else(String::new, |text| self.mask_pairs(text))
    }
}
