//! Log block assembly.
//!
//! [`HttpLogFormatter`] turns one request or response into a multi-line
//! block. It decides per section whether to render it, runs the relevant
//! masker, and pads labels into a column:
//!
//! ```text
//! ===========================client Response begin===========================
//! =ID           : 0412-67
//! =URI          : /login
//! =Headers      : Content-Type:application/json
//! =Body         : {"token":"<MASKED>"}
//! =Took         : 12 ms
//! ===========================client Response end  ===========================
//! ```
//!
//! Section order is fixed: ID, URI, Headers, Body, Took. Disabled sections
//! are left out rather than rendered blank.

use crate::config::{Direction, HttpLoggingConfig, LoggingLevel};
use crate::headers::{HeaderRedactor, SectionOverrides};
use crate::masking::{
    FormUrlencodedBodyMasker, JsonBodyMasker, Masker, MaskerChain, UriQueryMasker,
};
use std::sync::Arc;
use std::time::Instant;

/// Default banner opening a block.
pub const DEFAULT_HEADER_FORMAT: &str =
    "\n===========================%name% %type% begin===========================";
/// Default banner closing a block.
pub const DEFAULT_FOOTER_FORMAT: &str =
    "===========================%name% %type% end  ===========================";
/// Default character(s) starting each section line.
pub const DEFAULT_NEW_LINE_FORMAT: &str = "=";
/// Default replacement for oversized bodies.
pub const DEFAULT_TOO_BIG_FORMAT: &str = "<TOO BIG %contentLength% bytes>";

/// Target used for emitted blocks.
pub const LOG_TARGET: &str = "httplog";

/// Body of a request or response, materialized on demand.
///
/// The supplier only runs when the Body section is enabled and the known
/// length (if any) is within the limit.
pub struct Body<'a> {
    content_length: Option<usize>,
    supplier: Box<dyn FnOnce() -> Option<String> + 'a>,
}

impl<'a> Body<'a> {
    /// No body.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content_length: Some(0),
            supplier: Box::new(|| None),
        }
    }

    /// A body that is already in memory.
    #[must_use]
    pub fn text(text: &'a str) -> Self {
        Self {
            content_length: Some(text.len()),
            supplier: Box::new(move || Some(text.to_string())),
        }
    }

    /// A body produced by `supplier`, with an optional known length in bytes
    /// (e.g. from `Content-Length`).
    pub fn deferred<F>(content_length: Option<usize>, supplier: F) -> Self
    where
        F: FnOnce() -> Option<String> + 'a,
    {
        Self {
            content_length,
            supplier: Box::new(supplier),
        }
    }

    /// Known length, if any.
    #[must_use]
    pub const fn content_length(&self) -> Option<usize> {
        self.content_length
    }
}

impl std::fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Everything needed to render one block.
#[derive(Debug)]
pub struct LogEvent<'a> {
    /// Request or response.
    pub direction: Direction,
    /// Per-call section toggles.
    pub overrides: SectionOverrides,
    /// Correlation ID shared by the request and response blocks.
    pub id: &'a str,
    /// Request URI.
    pub uri: &'a str,
    /// Headers in their original order.
    pub headers: &'a [(String, Vec<String>)],
    /// Body.
    pub body: Body<'a>,
    /// When the exchange started, for the Took line.
    pub started_at: Instant,
}

/// Maskers for one direction.
struct DirectionMaskers {
    body: MaskerChain,
    uri: Box<dyn Masker>,
}

impl std::fmt::Debug for DirectionMaskers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionMaskers")
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl DirectionMaskers {
    fn from_config(config: &HttpLoggingConfig, direction: Direction) -> crate::Result<Self> {
        let mask = &config.settings(direction).mask;
        Ok(Self {
            body: MaskerChain::new()
                .with(JsonBodyMasker::new(&mask.mask_json_body_keys)?)
                .with(FormUrlencodedBodyMasker::new(&mask.mask_form_urlencoded_body_keys)?),
            uri: Box::new(UriQueryMasker::new(&mask.mask_query_parameters)?),
        })
    }
}

/// Assembles log blocks for one named client or server.
///
/// Holds no per-call state; share one instance across threads.
#[derive(Debug)]
pub struct HttpLogFormatter {
    name: String,
    config: Arc<HttpLoggingConfig>,
    request: DirectionMaskers,
    response: DirectionMaskers,
    headers: HeaderRedactor,
    header_format: String,
    footer_format: String,
    new_line_format: String,
    too_big_format: String,
}

impl HttpLogFormatter {
    /// Creates a formatter whose maskers come from the configured lists.
    ///
    /// Bodies go through a JSON masker followed by a form-urlencoded masker;
    /// URIs go through a query masker.
    pub fn new(name: impl Into<String>, config: Arc<HttpLoggingConfig>) -> crate::Result<Self> {
        let request = DirectionMaskers::from_config(&config, Direction::Request)?;
        let response = DirectionMaskers::from_config(&config, Direction::Response)?;
        Ok(Self {
            name: name.into(),
            config,
            request,
            response,
            headers: HeaderRedactor::new(),
            header_format: DEFAULT_HEADER_FORMAT.to_string(),
            footer_format: DEFAULT_FOOTER_FORMAT.to_string(),
            new_line_format: DEFAULT_NEW_LINE_FORMAT.to_string(),
            too_big_format: DEFAULT_TOO_BIG_FORMAT.to_string(),
        })
    }

    /// Replaces the body masker chain for a direction.
    #[must_use]
    pub fn with_body_maskers(mut self, direction: Direction, chain: MaskerChain) -> Self {
        self.maskers_mut(direction).body = chain;
        self
    }

    /// Replaces the URI masker for a direction.
    #[must_use]
    pub fn with_uri_masker(mut self, direction: Direction, masker: impl Masker + 'static) -> Self {
        self.maskers_mut(direction).uri = Box::new(masker);
        self
    }

    /// Sets the banner template opening a block (`%name%`, `%type%`).
    #[must_use]
    pub fn with_header_format(mut self, format: impl Into<String>) -> Self {
        self.header_format = format.into();
        self
    }

    /// Sets the banner template closing a block (`%name%`, `%type%`).
    #[must_use]
    pub fn with_footer_format(mut self, format: impl Into<String>) -> Self {
        self.footer_format = format.into();
        self
    }

    /// Sets the filler that starts every section line.
    #[must_use]
    pub fn with_new_line_format(mut self, format: impl Into<String>) -> Self {
        self.new_line_format = format.into();
        self
    }

    /// Sets the marker used for masked headers.
    ///
    /// Body and URI maskers carry their own marker.
    #[must_use]
    pub fn with_masked_format(mut self, marker: impl Into<String>) -> Self {
        self.headers = HeaderRedactor::new().with_marker(marker);
        self
    }

    /// Sets the template for oversized bodies (`%contentLength%`).
    #[must_use]
    pub fn with_too_big_format(mut self, format: impl Into<String>) -> Self {
        self.too_big_format = format.into();
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpLoggingConfig {
        &self.config
    }

    /// Returns the formatter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    const fn maskers(&self, direction: Direction) -> &DirectionMaskers {
        match direction {
            Direction::Request => &self.request,
            Direction::Response => &self.response,
        }
    }

    const fn maskers_mut(&mut self, direction: Direction) -> &mut DirectionMaskers {
        match direction {
            Direction::Request => &mut self.request,
            Direction::Response => &mut self.response,
        }
    }

    /// Opening banner for `direction`.
    #[must_use]
    pub fn header_line(&self, direction: Direction) -> String {
        self.banner(&self.header_format, direction)
    }

    /// Closing banner for `direction`.
    #[must_use]
    pub fn footer_line(&self, direction: Direction) -> String {
        self.banner(&self.footer_format, direction)
    }

    fn banner(&self, template: &str, direction: Direction) -> String {
        template
            .replace("%type%", direction.as_str())
            .replace("%name%", &self.name)
    }

    /// `{filler}{label}`, padded with spaces to the column width, then `: {value}`.
    #[must_use]
    pub fn format_line(&self, label: &str, value: &str) -> String {
        let start = format!("{}{label}", self.new_line_format);
        let width = self.config.new_line_column_symbols;
        format!("{start:<width$}: {value}")
    }

    /// Placeholder for a body of `content_length` bytes.
    #[must_use]
    pub fn too_big_message(&self, content_length: usize) -> String {
        self.too_big_format
            .replace("%contentLength%", &content_length.to_string())
    }

    /// ID line, or `None` if disabled.
    #[must_use]
    pub fn id_line(&self, enabled: Option<bool>, id: &str, direction: Direction) -> Option<String> {
        enabled
            .unwrap_or(self.config.settings(direction).id_included)
            .then(|| self.format_line("ID", id))
    }

    /// URI line with query parameters masked, or `None` if disabled.
    #[must_use]
    pub fn uri_line(&self, enabled: Option<bool>, uri: &str, direction: Direction) -> Option<String> {
        enabled
            .unwrap_or(self.config.settings(direction).uri_included)
            .then(|| self.format_line("URI", &self.maskers(direction).uri.mask(Some(uri))))
    }

    /// Took line (milliseconds since `started_at`), or `None` if disabled.
    #[must_use]
    pub fn took_line(
        &self,
        enabled: Option<bool>,
        started_at: Instant,
        direction: Direction,
    ) -> Option<String> {
        enabled
            .unwrap_or(self.config.settings(direction).took_time_included)
            .then(|| {
                let took = started_at.elapsed().as_millis();
                self.format_line("Took", &format!("{took} ms"))
            })
    }

    /// Headers line with masked values and control headers removed, or
    /// `None` if disabled.
    #[must_use]
    pub fn headers_line(
        &self,
        enabled: Option<bool>,
        headers: &[(String, Vec<String>)],
        direction: Direction,
    ) -> Option<String> {
        let settings = self.config.settings(direction);
        enabled.unwrap_or(settings.headers_included).then(|| {
            let rendered = self
                .headers
                .render(headers.iter().map(|(k, v)| (k, v)), &settings.mask.mask_headers);
            self.format_line("Headers", &rendered)
        })
    }

    /// Body line, or `None` if disabled.
    ///
    /// Bodies over the size limit render as the too-big message and are
    /// never masked. A known content length is checked before the supplier
    /// runs.
    #[must_use]
    pub fn body_line(&self, enabled: Option<bool>, body: Body<'_>, direction: Direction) -> Option<String> {
        if !enabled.unwrap_or(self.config.settings(direction).body_included) {
            return None;
        }

        let max = self.config.effective_max_body_size(direction);
        if let Some(length) = body.content_length.filter(|&l| l > max) {
            return Some(self.format_line("Body", &self.too_big_message(length)));
        }

        let text = (body.supplier)();
        let length = text.as_ref().map_or(0, String::len);
        let value = if length > max {
            self.too_big_message(length)
        } else {
            self.maskers(direction).body.mask(text.as_deref())
        };
        Some(self.format_line("Body", &value))
    }

    /// Renders the whole block.
    #[must_use]
    pub fn render(&self, event: LogEvent<'_>) -> String {
        let LogEvent {
            direction,
            overrides,
            id,
            uri,
            headers,
            body,
            started_at,
        } = event;

        let sections = [
            self.id_line(overrides.id, id, direction),
            self.uri_line(overrides.uri, uri, direction),
            self.headers_line(overrides.headers, headers, direction),
            self.body_line(overrides.body, body, direction),
            self.took_line(overrides.took, started_at, direction),
        ];

        let mut lines = Vec::with_capacity(sections.len() + 2);
        lines.push(self.header_line(direction));
        lines.extend(sections.into_iter().flatten());
        lines.push(self.footer_line(direction));
        lines.join("\n")
    }

    /// Renders the block and writes it at the configured level.
    ///
    /// Returns the block if it was written; `None` if logging is disabled or
    /// the level is `off`. Nothing is rendered in that case.
    pub fn log(&self, event: LogEvent<'_>) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        let level = self.config.logging_level;
        level.as_tracing_level()?;

        let direction = event.direction;
        let block = self.render(event);
        emit(level, &self.name, direction, &block);
        Some(block)
    }
}

fn emit(level: LoggingLevel, name: &str, direction: Direction, block: &str) {
    let direction = direction.as_str();
    match level {
        LoggingLevel::Off => {},
        LoggingLevel::Error => {
            tracing::error!(target: LOG_TARGET, formatter = name, direction, "{block}");
        },
        LoggingLevel::Warn => {
            tracing::warn!(target: LOG_TARGET, formatter = name, direction, "{block}");
        },
        LoggingLevel::Info => {
            tracing::info!(target: LOG_TARGET, formatter = name, direction, "{block}");
        },
        LoggingLevel::Debug => {
            tracing::debug!(target: LOG_TARGET, formatter = name, direction, "{block}");
        },
        LoggingLevel::Trace => {
            tracing::trace!(target: LOG_TARGET, formatter = name, direction, "{block}");
        },
    }
}
