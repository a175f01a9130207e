//! Mask CLI command.

use crate::masking::{
    DEFAULT_MARKER, FormUrlencodedBodyMasker, JsonBodyMasker, Masker, UriQueryMasker,
};

/// Grammar of the text passed to `httplog mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MaskKind {
    /// JSON body.
    Json,
    /// `application/x-www-form-urlencoded` body.
    Form,
    /// URI with a query string.
    Uri,
}

/// Masks `text` with a masker of the given kind, substituting `marker`.
///
/// # Errors
///
/// Returns an error if the field list cannot be compiled.
pub fn mask_text(
    kind: MaskKind,
    fields: &[String],
    marker: &str,
    text: &str,
) -> crate::Result<String> {
    let masker: Box<dyn Masker> = match kind {
        MaskKind::Json => Box::new(JsonBodyMasker::new(fields)?.with_marker(marker)),
        MaskKind::Form => Box::new(FormUrlencodedBodyMasker::new(fields)?.with_marker(marker)),
        MaskKind::Uri => Box::new(UriQueryMasker::new(fields)?.with_marker(marker)),
    };
    Ok(masker.mask(Some(text)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_each_kind() {
        let fields = vec!["token".to_string()];
        assert_eq!(
            mask_text(MaskKind::Json, &fields, DEFAULT_MARKER, r#"{"token":"t"}"#).unwrap(),
            r#"{"token":"<MASKED>"}"#
        );
        assert_eq!(
            mask_text(MaskKind::Form, &fields, DEFAULT_MARKER, "token=t").unwrap(),
            "token=<MASKED>"
        );
        assert_eq!(
            mask_text(MaskKind::Uri, &fields, DEFAULT_MARKER, "/a?token=t").unwrap(),
            "/a?token=<MASKED>"
        );
    }

    #[test]
    fn test_custom_marker_only_replaces_values() {
        let fields = vec!["token".to_string()];
        assert_eq!(
            mask_text(MaskKind::Form, &fields, "***", "note=<MASKED>&token=t").unwrap(),
            "note=<MASKED>&token=***"
        );
    }
}
