//! # httplog
//!
//! Human-readable, single-block logging of HTTP requests and responses with
//! sensitive values masked before anything reaches the log sink.
//!
//! httplog sits inside an HTTP client or server pipeline and is called once for
//! the request and once for the response. Each call renders a block like:
//!
//! ```text
//! ===========================client Request begin===========================
//! =ID           : 0412-67
//! =URI          : /login?token=<MASKED>&lang=en
//! =Headers      : Authorization:<MASKED>;Accept:application/json
//! =Body         : {"user":"bob","password":"<MASKED>"}
//! ===========================client Request end  ===========================
//! ```
//!
//! ## Features
//!
//! - Text maskers for JSON bodies, form-urlencoded bodies and URI query strings
//!   that work on raw text, without parsing the payload
//! - Header redaction that strips internal control headers
//! - Per-direction section toggles with per-call overrides
//! - Size limits that skip masking entirely for oversized bodies
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Instant;
//! use httplog::{Body, Direction, HttpLogFormatter, HttpLoggingConfig, LogEvent};
//!
//! let formatter = HttpLogFormatter::new("client", Arc::new(HttpLoggingConfig::default()))?;
//! let headers = vec![("Authorization".to_string(), vec!["Bearer xyz".to_string()])];
//! let block = formatter.render(LogEvent {
//!     direction: Direction::Request,
//!     overrides: Default::default(),
//!     id: "0412-67",
//!     uri: "/login",
//!     headers: &headers,
//!     body: Body::text(r#"{"password":"hunter2"}"#),
//!     started_at: Instant::now(),
//! });
//! assert!(block.contains(r#"{"password":"<MASKED>"}"#));
//! assert!(block.contains("Authorization:<MASKED>"));
//! # Ok::<(), httplog::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod formatter;
pub mod headers;
pub mod id;
pub mod masking;
pub mod observability;

pub use config::{Direction, HttpLoggingConfig, LogSettings, LoggingLevel, MaskSettings};
pub use formatter::{Body, HttpLogFormatter, LogEvent};
pub use headers::{HeaderRedactor, SectionOverrides, TECHNICAL_HEADERS};
pub use id::IdGenerator;
pub use masking::{
    DEFAULT_MARKER, FormUrlencodedBodyMasker, JsonBodyMasker, MaskRange, Masker, MaskerChain,
    UriQueryMasker,
};

/// Error type for httplog operations.
///
/// Nothing on the per-call logging path returns an error: maskers are total
/// and oversized bodies are a regular branch. Errors only come out of
/// construction and configuration loading.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidConfig` | Negative sizes or widths, unknown levels, rejected mask patterns |
/// | `OperationFailed` | Config file I/O or TOML parsing fails, subscriber init fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration is illegal.
    ///
    /// Raised when:
    /// - A column width or body size in the config file is negative
    /// - A logging level string is not recognized
    /// - A masking field list compiles to a pattern the regex engine rejects
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The config file cannot be read or parsed
    /// - The tracing subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for httplog operations.
pub type Result<T> = std::result::Result<T, Error>;
