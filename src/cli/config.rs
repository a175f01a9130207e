//! Config CLI command.

use crate::config::HttpLoggingConfig;

/// Renders the effective configuration as TOML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn show_config(config: &HttpLoggingConfig) -> crate::Result<String> {
    toml::to_string(&config.to_config_file()).map_err(|e| crate::Error::OperationFailed {
        operation: "serialize_config".to_string(),
        cause: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_show_default_config() {
        let text = show_config(&HttpLoggingConfig::default()).unwrap();
        assert!(text.contains("logging_level = \"info\""));
        assert!(text.contains("[request]"));
        assert!(text.contains("[response.mask]"));
        assert!(!text.contains("max_body_size"), "unlimited sizes are omitted");
    }

    #[test]
    fn test_show_config_reparses() {
        let mut config = HttpLoggingConfig::default();
        config.response.max_body_size = 2048;
        let text = show_config(&config).unwrap();
        assert_eq!(HttpLoggingConfig::from_toml_str(&text).unwrap(), config);
    }
}
