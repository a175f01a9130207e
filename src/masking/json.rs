//! JSON body masking.

use super::{DEFAULT_MARKER, Masker, apply_mask_ranges, capture_ranges, compile, field_alternation};
use regex::Regex;

/// Masks string values of configured keys in raw JSON text.
///
/// Matches `"key"`, a colon with optional whitespace around it, and a
/// double-quoted value that may contain escaped quotes. Keys are matched
/// literally, case-sensitively and only as whole key names. Non-string values
/// (numbers, objects, arrays) are left alone.
#[derive(Debug, Clone)]
pub struct JsonBodyMasker {
    regex: Option<Regex>,
    marker: String,
}

impl JsonBodyMasker {
    /// Builds a masker for the given keys.
    ///
    /// An empty key list produces a masker that returns its input unchanged.
    pub fn new(fields: &[String]) -> crate::Result<Self> {
        let regex = field_alternation(fields)
            .map(|alt| compile(&format!(r#"(?s)"(?:{alt})"\s*:\s*"((?:[^"\\]|\\.)*)""#)))
            .transpose()?;
        tracing::debug!(fields = fields.len(), "built json body masker");
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
}

impl Default for JsonBodyMasker {
    fn default() -> Self {
        Self {
            regex: None,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl Masker for JsonBodyMasker {
    fn mask(&self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return String::new();
        };
        let Some(regex) = &self.regex else {
            return text.to_string();
        };
        apply_mask_ranges(text, capture_ranges(regex, text, 1), &self.marker)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn masker(names: &[&str]) -> JsonBodyMasker {
        let fields: Vec<String> = names.iter().map(ToString::to_string).collect();
        JsonBodyMasker::new(&fields).unwrap()
    }

    #[test]
    fn test_masks_single_key() {
        let m = masker(&["password"]);
        assert_eq!(
            m.mask(Some(r#"{"password":"secret123","user":"bob"}"#)),
            r#"{"password":"<MASKED>","user":"bob"}"#
        );
    }

    #[test]
    fn test_none_is_empty() {
        assert_eq!(masker(&["password"]).mask(None), "");
    }

    #[test_case(r#"{"password" : "a b c"}"#, r#"{"password" : "<MASKED>"}"# ; "spaces around colon")]
    #[test_case("{\"password\":\n  \"x\"}", "{\"password\":\n  \"<MASKED>\"}" ; "newline before value")]
    #[test_case(r#"{"password":""}"#, r#"{"password":"<MASKED>"}"# ; "empty value")]
    #[test_case(r#"{"password":"a\"b\"c","n":1}"#, r#"{"password":"<MASKED>","n":1}"# ; "escaped quotes")]
    #[test_case(r#"{"password":"ends\\"}"#, r#"{"password":"<MASKED>"}"# ; "escaped backslash at end")]
    fn test_value_shapes(input: &str, expected: &str) {
        assert_eq!(masker(&["password"]).mask(Some(input)), expected);
    }

    #[test]
    fn test_whole_key_only() {
        let m = masker(&["pass"]);
        let input = r#"{"password":"x","bypass":"y","pass":"z"}"#;
        assert_eq!(
            m.mask(Some(input)),
            r#"{"password":"x","bypass":"y","pass":"<MASKED>"}"#
        );
    }

    #[test]
    fn test_case_sensitive_keys() {
        let m = masker(&["token"]);
        let input = r#"{"Token":"a","token":"b"}"#;
        assert_eq!(m.mask(Some(input)), r#"{"Token":"a","token":"<MASKED>"}"#);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let m = masker(&["a.b"]);
        assert_eq!(m.mask(Some(r#"{"aXb":"1"}"#)), r#"{"aXb":"1"}"#);
        assert_eq!(m.mask(Some(r#"{"a.b":"1"}"#)), r#"{"a.b":"<MASKED>"}"#);
    }

    #[test]
    fn test_adjacent_values() {
        let m = masker(&["a", "b"]);
        assert_eq!(
            m.mask(Some(r#"{"a":"x","b":"y"}"#)),
            r#"{"a":"<MASKED>","b":"<MASKED>"}"#
        );
    }

    #[test]
    fn test_nested_and_repeated() {
        let m = masker(&["token", "secret"]);
        let input = r#"{"token":"t1","inner":{"secret":"s","token":"t2"},"list":[{"token":"t3"}]}"#;
        let masked = m.mask(Some(input));
        assert_eq!(masked.matches("<MASKED>").count(), 4);
        for value in ["t1", "t2", "t3", "\"s\""] {
            assert!(!masked.contains(value), "{value} leaked");
        }
    }

    #[test]
    fn test_non_string_values_untouched() {
        let m = masker(&["code"]);
        let input = r#"{"code":1234,"nested":{"code":null}}"#;
        assert_eq!(m.mask(Some(input)), input);
    }

    #[test]
    fn test_custom_marker() {
        let m = masker(&["token"]).with_marker("***");
        assert_eq!(m.mask(Some(r#"{"token":"abc"}"#)), r#"{"token":"***"}"#);
    }

    #[test]
    fn test_empty_fields_is_noop() {
        let m = masker(&[]);
        let input = r#"{"password":"x"}"#;
        assert_eq!(m.mask(Some(input)), input);
    }

    #[test]
    fn test_non_ascii_around_values() {
        let m = masker(&["password"]);
        assert_eq!(
            m.mask(Some(r#"{"имя":"Борис","password":"пароль"}"#)),
            r#"{"имя":"Борис","password":"<MASKED>"}"#
        );
    }
}
