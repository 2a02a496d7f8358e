//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::env::TOKEN_VAR;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Discord
    if config.discord.token.trim().is_empty() {
        errors.push(format!("discord.token is required (set {})", TOKEN_VAR));
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }
    if config.discord.command_prefix.is_empty() {
        errors.push("discord.command_prefix must not be empty".to_string());
    }
    if config.discord.command_prefix.chars().any(char::is_whitespace) {
        errors.push("discord.command_prefix must not contain whitespace".to_string());
    }
    if config.discord.http_timeout_secs == 0 {
        errors.push("discord.http_timeout_secs must be non-zero".to_string());
    }

    // Liveness
    if config.liveness.enabled {
        if config.liveness.host.is_empty() {
            errors.push("liveness.host is required".to_string());
        }
        if config.liveness.port == 0 {
            errors.push("liveness.port must be non-zero".to_string());
        }
    }

    // Announcement
    if config.announcement.title.is_empty() {
        errors.push("announcement.title is required".to_string());
    }
    if config.announcement.colour > 0xFF_FFFF {
        errors.push(format!(
            "announcement.colour {:#X} is not a 24-bit RGB value",
            config.announcement.colour
        ));
    }
    for (field, url) in [
        ("announcement.fallback_thumbnail_url", &config.announcement.fallback_thumbnail_url),
        ("announcement.fallback_avatar_url", &config.announcement.fallback_avatar_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(format!("{} must be an http(s) URL (got '{}')", field, url));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_valid_config() -> Config {
        let mut config = Config::default();
        config.discord.token = "valid_token_here".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        let config = make_valid_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_token_fails() {
        let config = Config::default();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DISCORD_BOT_TOKEN"));
    }

    #[test]
    fn test_placeholder_token_fails() {
        let mut config = make_valid_config();
        config.discord.token = "YOUR_DISCORD_TOKEN_HERE".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }

    #[test]
    fn test_zero_port_only_matters_when_enabled() {
        let mut config = make_valid_config();
        config.liveness.port = 0;
        assert!(validate_config(&config).is_err());

        config.liveness.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let mut config = Config::default();
        config.discord.command_prefix = String::new();
        config.announcement.fallback_thumbnail_url = "not-a-url".to_string();

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("discord.token"));
        assert!(message.contains("command_prefix"));
        assert!(message.contains("fallback_thumbnail_url"));
    }

    #[test]
    fn test_whitespace_prefix_fails() {
        let mut config = make_valid_config();
        config.discord.command_prefix = "! ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
