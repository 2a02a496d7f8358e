//! Discord bot integration.
//!
//! This module provides the command handling, the announcement broadcast,
//! and the serenity client wiring.

pub mod announce;
pub mod broadcast;
pub mod client;
pub mod commands;
pub mod handler;
pub mod platform;

// Re-export main types for external use
pub use client::DiscordBotBuilder;
