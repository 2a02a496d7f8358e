//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discord: DiscordConfig,
    pub liveness: LivenessConfig,
    pub announcement: AnnouncementConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub token: String,
    /// Prefix every command must start with.
    pub command_prefix: String,
    /// Request timeout for Discord HTTP calls, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: "!".to_string(),
            http_timeout_secs: 15,
        }
    }
}

/// Health check endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Content of the broadcast embed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnouncementConfig {
    pub title: String,
    pub description: String,
    /// RGB embed colour.
    pub colour: u32,
    /// Used when the hosting server has no icon.
    pub fallback_thumbnail_url: String,
    /// Used when the caller has no avatar.
    pub fallback_avatar_url: String,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            title: "🌌 Aurora Borealis Hosted!".to_string(),
            description: "Details for the newly hosted Aurora Borealis server.".to_string(),
            colour: 0x9B59B6,
            fallback_thumbnail_url: "https://via.placeholder.com/150".to_string(),
            fallback_avatar_url: "https://via.placeholder.com/32".to_string(),
        }
    }
}
