//! Header rendering and control headers.
//!
//! Control (technical) headers carry per-call logging overrides through the
//! pipeline. They are consumed by [`SectionOverrides::from_control_headers`]
//! and never rendered.

use crate::config::Direction;
use crate::masking::DEFAULT_MARKER;

/// Overrides the URI section of the request block.
pub const LOG_REQUEST_URI: &str = "LOG_REQUEST_URI_TECHNICAL_HEADER";
/// Overrides the Headers section of the request block.
pub const LOG_REQUEST_HEADERS: &str = "LOG_REQUEST_HEADERS_TECHNICAL_HEADER";
/// Overrides the Body section of the request block.
pub const LOG_REQUEST_BODY: &str = "LOG_REQUEST_BODY_TECHNICAL_HEADER";
/// Overrides the Took section of the request block.
pub const LOG_REQUEST_TOOK_TIME: &str = "LOG_REQUEST_TOOK_TIME_TECHNICAL_HEADER";
/// Overrides the URI section of the response block.
pub const LOG_RESPONSE_URI: &str = "LOG_RESPONSE_URI_TECHNICAL_HEADER";
/// Overrides the Headers section of the response block.
pub const LOG_RESPONSE_HEADERS: &str = "LOG_RESPONSE_HEADERS_TECHNICAL_HEADER";
/// Overrides the Body section of the response block.
pub const LOG_RESPONSE_BODY: &str = "LOG_RESPONSE_BODY_TECHNICAL_HEADER";
/// Overrides the Took section of the response block.
pub const LOG_RESPONSE_TOOK_TIME: &str = "LOG_RESPONSE_TOOK_TIME_TECHNICAL_HEADER";

/// All control headers. None of these is ever rendered.
pub const TECHNICAL_HEADERS: &[&str] = &[
    LOG_REQUEST_URI,
    LOG_REQUEST_HEADERS,
    LOG_REQUEST_BODY,
    LOG_REQUEST_TOOK_TIME,
    LOG_RESPONSE_URI,
    LOG_RESPONSE_HEADERS,
    LOG_RESPONSE_BODY,
    LOG_RESPONSE_TOOK_TIME,
];

/// Returns true if `name` is a control header (exact, case-sensitive).
#[must_use]
pub fn is_technical_header(name: &str) -> bool {
    TECHNICAL_HEADERS.contains(&name)
}

/// Renders header maps as a single `name:value;name:value` string.
#[derive(Debug, Clone)]
pub struct HeaderRedactor {
    marker: String,
}

impl HeaderRedactor {
    /// Creates a redactor using the default marker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    /// Sets a custom marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Renders `headers` in iteration order.
    ///
    /// Control headers are dropped. Headers named in `mask_names`
    /// (case-insensitive) render as the marker; the rest render their values
    /// joined with `,`.
    pub fn render<I, K, V>(&self, headers: I, mask_names: &[String]) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        headers
            .into_iter()
            .filter(|(name, _)| !is_technical_header(name.as_ref()))
            .map(|(name, values)| {
                let name = name.as_ref();
                let value = if mask_names.iter().any(|m| m.eq_ignore_ascii_case(name)) {
                    self.marker.clone()
                } else {
                    values
                        .into_iter()
                        .map(|v| v.as_ref().to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                };
                format!("{name}:{value}")
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for HeaderRedactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call section toggles. `Some` wins over the configured setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionOverrides {
    /// ID line.
    pub id: Option<bool>,
    /// URI line.
    pub uri: Option<bool>,
    /// Headers line.
    pub headers: Option<bool>,
    /// Body line.
    pub body: Option<bool>,
    /// Took line.
    pub took: Option<bool>,
}

impl SectionOverrides {
    /// Reads the control headers for `direction` out of a header list.
    ///
    /// Values `true`/`false` (case-insensitive, surrounding whitespace
    /// ignored) set the override; anything else leaves it unset. When a header
    /// repeats, its first parseable value wins.
    pub fn from_control_headers<I, K, V>(headers: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let (uri, hdrs, body, took) = match direction {
            Direction::Request => (
                LOG_REQUEST_URI,
                LOG_REQUEST_HEADERS,
                LOG_REQUEST_BODY,
                LOG_REQUEST_TOOK_TIME,
            ),
            Direction::Response => (
                LOG_RESPONSE_URI,
                LOG_RESPONSE_HEADERS,
                LOG_RESPONSE_BODY,
                LOG_RESPONSE_TOOK_TIME,
            ),
        };

        let mut overrides = Self::default();
        for (name, values) in headers {
            let slot = match name.as_ref() {
                n if n == uri => &mut overrides.uri,
                n if n == hdrs => &mut overrides.headers,
                n if n == body => &mut overrides.body,
                n if n == took => &mut overrides.took,
                _ => continue,
            };
            if slot.is_none() {
                *slot = values.into_iter().find_map(|v| parse_flag(v.as_ref()));
            }
        }
        overrides
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
