//! Configuration management.
//!
//! [`HttpLoggingConfig`] is built once at startup, from defaults, an optional
//! TOML file and environment overrides, and is read-only afterwards. Share it
//! between formatters with an `Arc`.
//!
//! ```toml
//! enabled = true
//! logging_level = "info"
//! new_line_column_symbols = 14
//!
//! [request]
//! took_time_included = false
//! max_body_size = 65536
//!
//! [request.mask]
//! mask_headers = ["Authorization", "Cookie"]
//! mask_query_parameters = ["token"]
//!
//! [response]
//! headers_included = false
//! ```

mod level;
mod settings;

pub use level::LoggingLevel;
pub use settings::{DEFAULT_SECRET_KEYS, Direction, LogSettings, MaskSettings};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that toggles logging.
pub const ENV_ENABLED: &str = "HTTPLOG_ENABLED";
/// Environment variable that sets the logging level.
pub const ENV_LEVEL: &str = "HTTPLOG_LEVEL";
/// Environment variable that sets the global body size limit.
pub const ENV_MAX_BODY_SIZE: &str = "HTTPLOG_MAX_BODY_SIZE";
/// Environment variable that sets the label column width.
pub const ENV_COLUMN_WIDTH: &str = "HTTPLOG_COLUMN_WIDTH";

/// Main configuration for HTTP logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpLoggingConfig {
    /// Whether blocks are written at all.
    pub enabled: bool,
    /// Level of written blocks.
    pub logging_level: LoggingLevel,
    /// Request settings.
    pub request: LogSettings,
    /// Response settings.
    pub response: LogSettings,
    /// Global body size limit, applied on top of the per-direction limits.
    pub max_body_size: usize,
    /// Position of the logging step in a pipeline. Lower runs first.
    pub order: i32,
    /// Width of the `{filler}{label}` column before the colon.
    pub new_line_column_symbols: usize,
}

impl Default for HttpLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            logging_level: LoggingLevel::Info,
            request: LogSettings::request_default(),
            response: LogSettings::response_default(),
            max_body_size: usize::MAX,
            order: 0,
            new_line_column_symbols: 14,
        }
    }
}

/// Configuration file structure (for TOML parsing).
///
/// Every field is optional; missing fields keep their defaults. Sizes are
/// signed so negative values can be rejected instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Enabled flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Logging level name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_level: Option<String>,
    /// Global body size limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<i64>,
    /// Pipeline order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Label column width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line_column_symbols: Option<i64>,
    /// Request section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ConfigFileLogSettings>,
    /// Response section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ConfigFileLogSettings>,
}

/// Request or response section in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogSettings {
    /// ID line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_included: Option<bool>,
    /// URI line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_included: Option<bool>,
    /// Took line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub took_time_included: Option<bool>,
    /// Headers line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_included: Option<bool>,
    /// Body line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_included: Option<bool>,
    /// Body size limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<i64>,
    /// Masking lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<ConfigFileMask>,
}

/// Mask section in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileMask {
    /// Header names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_headers: Option<Vec<String>>,
    /// Query parameter names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_query_parameters: Option<Vec<String>>,
    /// JSON body keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_json_body_keys: Option<Vec<String>>,
    /// Form-urlencoded body keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_form_urlencoded_body_keys: Option<Vec<String>>,
}

impl HttpLoggingConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the settings for a direction.
    #[must_use]
    pub const fn settings(&self, direction: Direction) -> &LogSettings {
        match direction {
            Direction::Request => &self.request,
            Direction::Response => &self.response,
        }
    }

    /// Body size limit for a direction: the smaller of its own and the global one.
    #[must_use]
    pub fn effective_max_body_size(&self, direction: Direction) -> usize {
        self.settings(direction).max_body_size.min(self.max_body_size)
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it holds
    /// illegal values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded http logging config");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`] or
    /// holds illegal values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/.config/httplog/config.toml` on Linux)
    /// 2. XDG-style `~/.config/httplog/config.toml` (for macOS users who keep dotfiles there)
    ///
    /// Returns default configuration if no readable config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("httplog").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("httplog")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }

        Self::default()
    }

    /// Applies `HTTPLOG_*` environment variables on top of this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an illegal value.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a looked-up value is illegal.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_ENABLED) {
            self.enabled = parse_bool(ENV_ENABLED, &v)?;
        }
        if let Some(v) = lookup(ENV_LEVEL) {
            self.logging_level = v.parse()?;
        }
        if let Some(v) = lookup(ENV_MAX_BODY_SIZE) {
            self.max_body_size = parse_size(ENV_MAX_BODY_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_COLUMN_WIDTH) {
            self.new_line_column_symbols = parse_size(ENV_COLUMN_WIDTH, &v)?;
        }
        Ok(self)
    }

    /// Converts a `ConfigFile` to `HttpLoggingConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(enabled) = file.enabled {
            config.enabled = enabled;
        }
        if let Some(level) = file.logging_level {
            config.logging_level = level.parse()?;
        }
        if let Some(size) = file.max_body_size {
            config.max_body_size = non_negative("max_body_size", size)?;
        }
        if let Some(order) = file.order {
            config.order = order;
        }
        if let Some(width) = file.new_line_column_symbols {
            config.new_line_column_symbols = non_negative("new_line_column_symbols", width)?;
        }
        if let Some(request) = file.request {
            overlay_settings(&mut config.request, request, "request")?;
        }
        if let Some(response) = file.response {
            overlay_settings(&mut config.response, response, "response")?;
        }

        Ok(config)
    }

    /// Converts back to the file representation, with every field set.
    ///
    /// Unlimited sizes are left out since TOML integers are 64-bit signed.
    #[must_use]
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            enabled: Some(self.enabled),
            logging_level: Some(self.logging_level.as_str().to_string()),
            max_body_size: finite_size(self.max_body_size),
            order: Some(self.order),
            new_line_column_symbols: i64::try_from(self.new_line_column_symbols).ok(),
            request: Some(settings_to_file(&self.request)),
            response: Some(settings_to_file(&self.response)),
        }
    }
}

fn overlay_settings(
    settings: &mut LogSettings,
    file: ConfigFileLogSettings,
    section: &str,
) -> Result<()> {
    if let Some(v) = file.id_included {
        settings.id_included = v;
    }
    if let Some(v) = file.uri_included {
        settings.uri_included = v;
    }
    if let Some(v) = file.took_time_included {
        settings.took_time_included = v;
    }
    if let Some(v) = file.headers_included {
        settings.headers_included = v;
    }
    if let Some(v) = file.body_included {
        settings.body_included = v;
    }
    if let Some(size) = file.max_body_size {
        settings.max_body_size = non_negative(&format!("{section}.max_body_size"), size)?;
    }
    if let Some(mask) = file.mask {
        if let Some(v) = mask.mask_headers {
            settings.mask.mask_headers = v;
        }
        if let Some(v) = mask.mask_query_parameters {
            settings.mask.mask_query_parameters = v;
        }
        if let Some(v) = mask.mask_json_body_keys {
            settings.mask.mask_json_body_keys = v;
        }
        if let Some(v) = mask.mask_form_urlencoded_body_keys {
            settings.mask.mask_form_urlencoded_body_keys = v;
        }
    }
    Ok(())
}

fn settings_to_file(settings: &LogSettings) -> ConfigFileLogSettings {
    ConfigFileLogSettings {
        id_included: Some(settings.id_included),
        uri_included: Some(settings.uri_included),
        took_time_included: Some(settings.took_time_included),
        headers_included: Some(settings.headers_included),
        body_included: Some(settings.body_included),
        max_body_size: finite_size(settings.max_body_size),
        mask: Some(ConfigFileMask {
            mask_headers: Some(settings.mask.mask_headers.clone()),
            mask_query_parameters: Some(settings.mask.mask_query_parameters.clone()),
            mask_json_body_keys: Some(settings.mask.mask_json_body_keys.clone()),
            mask_form_urlencoded_body_keys: Some(
                settings.mask.mask_form_urlencoded_body_keys.clone(),
            ),
        }),
    }
}

fn finite_size(size: usize) -> Option<i64> {
    if size == usize::MAX {
        None
    } else {
        i64::try_from(size).ok()
    }
}

fn non_negative(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::InvalidConfig(format!("{name} must not be negative, got {value}")))
}

fn parse_size(name: &str, value: &str) -> Result<usize> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{name} is not an integer: '{value}'")))?;
    non_negative(name, parsed)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "{name} is not a boolean: '{value}'"
        ))),
    }
}
