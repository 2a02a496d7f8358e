//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `DISCORD_BOT_TOKEN` - Discord bot token
//! - `BOT_COMMAND_PREFIX` - Command prefix
//! - `BOT_LIVENESS_HOST` - Health check bind address
//! - `BOT_LIVENESS_PORT` - Health check port

use std::env;

use tracing::warn;

use crate::config::types::Config;

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Environment variable prefix for all other config overrides.
const ENV_PREFIX: &str = "BOT";

/// Apply process environment overrides to a config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| env::var(key).ok())
}

/// Apply overrides from an arbitrary variable source.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(TOKEN_VAR) {
        config.discord.token = token;
    }

    if let Some(prefix) = lookup(&format!("{}_COMMAND_PREFIX", ENV_PREFIX)) {
        config.discord.command_prefix = prefix;
    }

    if let Some(host) = lookup(&format!("{}_LIVENESS_HOST", ENV_PREFIX)) {
        config.liveness.host = host;
    }
    if let Some(port) = lookup(&format!("{}_LIVENESS_PORT", ENV_PREFIX)) {
        match port.parse() {
            Ok(port) => config.liveness.port = port,
            Err(_) => warn!("Ignoring invalid {}_LIVENESS_PORT: {}", ENV_PREFIX, port),
        }
    }

    config
}

/// Get the config file path from the environment, if one is set.
pub fn get_config_path() -> Option<String> {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).ok()
}
