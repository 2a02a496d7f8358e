//! Configuration file parsing (JSON format).

use std::path::Path;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_str(&content)
}

/// Load configuration from a JSON string.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = load_config_str("{}").unwrap();
        assert_eq!(config.discord.command_prefix, "!");
        assert_eq!(config.liveness.host, "0.0.0.0");
        assert_eq!(config.liveness.port, 8080);
        assert!(config.liveness.enabled);
        assert_eq!(config.announcement.colour, 0x9B59B6);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = load_config_str(
            r#"{
                "discord": { "command_prefix": "?" },
                "announcement": { "title": "Hosted!" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.discord.command_prefix, "?");
        assert_eq!(config.discord.http_timeout_secs, 15);
        assert_eq!(config.announcement.title, "Hosted!");
        assert_eq!(
            config.announcement.fallback_avatar_url,
            "https://via.placeholder.com/32"
        );
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = load_config_str("{ discord: ");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config("/nonexistent/aurora-beacon.json");
        match result {
            Err(ConfigError::IoError { path, .. }) => {
                assert_eq!(path, "/nonexistent/aurora-beacon.json")
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }
}
