//! Structured logging configuration.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const ENV_LOG_FILTER: &str = "HTTPLOG_LOG";
/// Environment variable selecting the output format (`pretty` or `json`).
pub const ENV_LOG_FORMAT: &str = "HTTPLOG_LOG_FORMAT";
/// Environment variable naming a file to append logs to.
pub const ENV_LOG_FILE: &str = "HTTPLOG_LOG_FILE";

/// Output format of the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything but `json` is pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directives.
    pub filter: EnvFilter,
    /// Optional file to append to instead of stderr.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds the configuration from `HTTPLOG_LOG*` variables, then `RUST_LOG`.
    ///
    /// `verbose` raises the default filter from `info` to `debug`.
    #[must_use]
    pub fn from_env(verbose: bool) -> Self {
        Self::from_lookup(verbose, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from values read through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(verbose: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_directive = if verbose { "debug" } else { "info" };
        let directive = lookup(ENV_LOG_FILTER)
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| default_directive.to_string());
        let filter = EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        Self {
            format: lookup(ENV_LOG_FORMAT).map_or_else(LogFormat::default, |f| LogFormat::parse(&f)),
            filter,
            file: lookup(ENV_LOG_FILE).map(PathBuf::from),
        }
    }
}
