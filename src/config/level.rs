//! Severity of emitted log blocks.

use serde::{Deserialize, Serialize};

/// Level at which rendered blocks are written.
///
/// Parsing also accepts the `java.util.logging` names that older
/// deployments put in their config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    /// Nothing is written.
    Off,
    /// `ERROR`.
    Error,
    /// `WARN`.
    Warn,
    /// `INFO`.
    #[default]
    Info,
    /// `DEBUG`.
    Debug,
    /// `TRACE`.
    Trace,
}

impl LoggingLevel {
    /// Parses a level name (case-insensitive).
    ///
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" | "none" => Some(Self::Off),
            "error" | "severe" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" | "config" => Some(Self::Info),
            "debug" | "fine" => Some(Self::Debug),
            "trace" | "finer" | "finest" | "all" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Maps to a `tracing` level; `Off` has none.
    #[must_use]
    pub const fn as_tracing_level(self) -> Option<tracing::Level> {
        match self {
            Self::Off => None,
            Self::Error => Some(tracing::Level::ERROR),
            Self::Warn => Some(tracing::Level::WARN),
            Self::Info => Some(tracing::Level::INFO),
            Self::Debug => Some(tracing::Level::DEBUG),
            Self::Trace => Some(tracing::Level::TRACE),
        }
    }
}

impl std::str::FromStr for LoggingLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidConfig(format!("unknown logging level '{s}'")))
    }
}
