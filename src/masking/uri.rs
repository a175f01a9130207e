//! URI query masking.

use super::{FormUrlencodedBodyMasker, Masker};

/// Masks query parameter values in a URI.
///
/// Only the query component is touched: everything up to and including the
/// first `?` and everything from the first `#` after it is copied verbatim.
/// Text without a `?` is treated as a bare query string (as returned by
/// `Uri::query()`), so `token=abc` is masked while a path such as
/// `/token=abc/path` is not. Inside the query the grammar is the
/// form-urlencoded one.
#[derive(Debug, Clone, Default)]
pub struct UriQueryMasker {
    pairs: FormUrlencodedBodyMasker,
}

impl UriQueryMasker {
    /// Builds a masker for the given query parameter names.
    pub fn new(fields: &[String]) -> crate::Result<Self> {
        Ok(Self {
            pairs: FormUrlencodedBodyMasker::new(fields)?,
        })
    }

    /// Sets a custom marker.
    #[must_use]
    pub fn with_marker(self, marker: impl Into<String>) -> Self {
        Self {
            pairs: self.pairs.with_marker(marker),
        }
    }
}

impl Masker for UriQueryMasker {
    fn mask(&self, text: Option<&str>) -> String {
        let Some(uri) = text else {
            return String::new();
        };
        // Without a `?` the text is taken to be the query string itself.
        let query_start = uri.find('?').map_or(0, |i| i + 1);
        let query_end = uri[query_start..]
            .find('#')
            .map_or(uri.len(), |i| query_start + i);

        let masked_query = self.pairs.mask_pairs(&uri[query_start..query_end]);

        let mut result = String::with_capacity(uri.len() + masked_query.len());
        result.push_str(&uri[..query_start]);
        result.push_str(&masked_query);
        result.push_str(&uri[query_end..]);
        result
    }
}
