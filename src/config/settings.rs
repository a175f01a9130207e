//! Per-direction log settings.

use serde::{Deserialize, Serialize};

/// Which half of an exchange is being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outgoing (client) or incoming (server) request.
    Request,
    /// The matching response.
    Response,
}

impl Direction {
    /// Returns the name used in banner lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "Request",
            Self::Response => "Response",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field names to mask, partitioned by surface.
///
/// Header names match case-insensitively. Query parameter, JSON and
/// form-urlencoded keys match case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSettings {
    /// Header names whose values are replaced by the marker.
    pub mask_headers: Vec<String>,
    /// Query parameter names masked in the URI line.
    pub mask_query_parameters: Vec<String>,
    /// Keys masked in JSON bodies.
    pub mask_json_body_keys: Vec<String>,
    /// Keys masked in form-urlencoded bodies.
    pub mask_form_urlencoded_body_keys: Vec<String>,
}

/// Keys masked in bodies and request URIs by default.
pub const DEFAULT_SECRET_KEYS: &[&str] = &["password", "pass", "code", "token", "secret"];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

impl MaskSettings {
    /// Default masking for requests: query parameters are masked.
    #[must_use]
    pub fn request_default() -> Self {
        Self {
            mask_headers: owned(&["Authorization"]),
            mask_query_parameters: owned(DEFAULT_SECRET_KEYS),
            mask_json_body_keys: owned(DEFAULT_SECRET_KEYS),
            mask_form_urlencoded_body_keys: owned(DEFAULT_SECRET_KEYS),
        }
    }

    /// Default masking for responses: the URI is echoed as-is.
    #[must_use]
    pub fn response_default() -> Self {
        Self {
            mask_query_parameters: Vec::new(),
            ..Self::request_default()
        }
    }
}

impl Default for MaskSettings {
    fn default() -> Self {
        Self::request_default()
    }
}

/// Section toggles, size limit and masking for one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Render the ID line.
    pub id_included: bool,
    /// Render the URI line.
    pub uri_included: bool,
    /// Render the Took line.
    pub took_time_included: bool,
    /// Render the Headers line.
    pub headers_included: bool,
    /// Render the Body line.
    pub body_included: bool,
    /// Bodies longer than this many bytes are not masked or logged.
    pub max_body_size: usize,
    /// Masking lists.
    pub mask: MaskSettings,
}

impl LogSettings {
    /// Request defaults: everything but Took.
    #[must_use]
    pub fn request_default() -> Self {
        Self {
            id_included: true,
            uri_included: true,
            took_time_included: false,
            headers_included: true,
            body_included: true,
            max_body_size: usize::MAX,
            mask: MaskSettings::request_default(),
        }
    }

    /// Response defaults: every section.
    #[must_use]
    pub fn response_default() -> Self {
        Self {
            took_time_included: true,
            mask: MaskSettings::response_default(),
            ..Self::request_default()
        }
    }

    /// Sets the body size limit.
    #[must_use]
    pub const fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Replaces the masking lists.
    #[must_use]
    pub fn with_mask(mut self, mask: MaskSettings) -> Self {
        self.mask = mask;
        self
    }
}
