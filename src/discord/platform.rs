//! The slice of the Discord API the command handlers depend on.
//!
//! `SerenityPlatform` (in `handler`) implements it against the live client
//! cache and HTTP API; tests use `fake::FakePlatform`.

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId, RoleId};
use serenity::model::mention::Mentionable;

use crate::common::DiscordResult;
use crate::discord::announce::Announcement;

/// Outcome of resolving a configured id against the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<I, T> {
    /// Nothing is configured for this guild.
    NotConfigured,
    /// Configured, but the platform no longer knows the id.
    Stale(I),
    Resolved(T),
}

impl<I: Copy, T> Lookup<I, T> {
    pub fn resolve<F>(configured: Option<I>, resolver: F) -> Self
    where
        F: FnOnce(I) -> Option<T>,
    {
        match configured {
            None => Lookup::NotConfigured,
            Some(id) => match resolver(id) {
                Some(found) => Lookup::Resolved(found),
                None => Lookup::Stale(id),
            },
        }
    }
}

/// A role that exists in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
}

impl RoleInfo {
    pub fn mention(&self) -> String {
        self.id.mention().to_string()
    }
}

/// A guild text channel the bot can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub name: String,
}

/// A message to deliver: plain text, an announcement embed, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub content: Option<String>,
    pub announcement: Option<Announcement>,
}

impl Outgoing {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            announcement: None,
        }
    }

    /// An announcement, optionally preceded by a role mention.
    pub fn announcement(mention: Option<String>, announcement: Announcement) -> Self {
        Self {
            content: mention.map(|m| format!("{} ", m)),
            announcement: Some(announcement),
        }
    }
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Look up a role in a guild's role list.
    fn role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleInfo>;

    /// Look up a channel belonging to a guild.
    fn channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelInfo>;

    async fn send(&self, channel_id: ChannelId, message: Outgoing) -> DiscordResult<()>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;
    use crate::common::error::DiscordError;

    /// In-memory platform recording every delivered message.
    #[derive(Debug, Default)]
    pub struct FakePlatform {
        roles: HashMap<(GuildId, RoleId), RoleInfo>,
        channels: HashMap<ChannelId, ChannelInfo>,
        threads: HashMap<ChannelId, ChannelInfo>,
        failing: HashSet<ChannelId>,
        sent: Mutex<Vec<(ChannelId, Outgoing)>>,
    }

    impl FakePlatform {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_role(mut self, guild_id: u64, role_id: u64, name: &str) -> Self {
            let guild_id = GuildId::new(guild_id);
            let id = RoleId::new(role_id);
            self.roles.insert(
                (guild_id, id),
                RoleInfo {
                    id,
                    name: name.to_string(),
                },
            );
            self
        }

        pub fn with_channel(mut self, guild_id: u64, channel_id: u64) -> Self {
            let id = ChannelId::new(channel_id);
            self.channels.insert(
                id,
                ChannelInfo {
                    id,
                    guild_id: GuildId::new(guild_id),
                    name: format!("channel-{}", channel_id),
                },
            );
            self
        }

        /// A thread is tracked apart from the guild's channels, as in the cache.
        pub fn with_thread(mut self, guild_id: u64, thread_id: u64) -> Self {
            let id = ChannelId::new(thread_id);
            self.threads.insert(
                id,
                ChannelInfo {
                    id,
                    guild_id: GuildId::new(guild_id),
                    name: format!("thread-{}", thread_id),
                },
            );
            self
        }

        /// Sends to this channel fail as if Discord rejected them.
        pub fn with_failing_channel(mut self, channel_id: u64) -> Self {
            self.failing.insert(ChannelId::new(channel_id));
            self
        }

        pub fn delete_role(&mut self, guild_id: u64, role_id: u64) {
            self.roles
                .remove(&(GuildId::new(guild_id), RoleId::new(role_id)));
        }

        pub fn delete_channel(&mut self, channel_id: u64) {
            self.channels.remove(&ChannelId::new(channel_id));
        }

        pub fn sent(&self) -> Vec<(ChannelId, Outgoing)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, channel_id: u64) -> Vec<Outgoing> {
            let channel_id = ChannelId::new(channel_id);
            self.sent()
                .into_iter()
                .filter(|(id, _)| *id == channel_id)
                .map(|(_, message)| message)
                .collect()
        }

        /// Text of every plain reply sent to a channel.
        pub fn texts_to(&self, channel_id: u64) -> Vec<String> {
            self.sent_to(channel_id)
                .into_iter()
                .filter_map(|message| message.content)
                .collect()
        }
    }

    #[async_trait]
    impl Platform for FakePlatform {
        fn role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleInfo> {
            self.roles.get(&(guild_id, role_id)).cloned()
        }

        fn channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelInfo> {
            self.channels
                .get(&channel_id)
                .or_else(|| self.threads.get(&channel_id))
                .filter(|channel| channel.guild_id == guild_id)
                .cloned()
        }

        async fn send(&self, channel_id: ChannelId, message: Outgoing) -> DiscordResult<()> {
            if self.failing.contains(&channel_id) {
                return Err(DiscordError::SendFailed {
                    message: "Missing Permissions".to_string(),
                });
            }
            self.sent.lock().unwrap().push((channel_id, message));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_three_way() {
        let found: Lookup<u64, &str> = Lookup::resolve(Some(1), |_| Some("role"));
        assert_eq!(found, Lookup::Resolved("role"));

        let gone: Lookup<u64, &str> = Lookup::resolve(Some(2), |_| None);
        assert_eq!(gone, Lookup::Stale(2));

        let unset: Lookup<u64, &str> = Lookup::resolve(None, |_| Some("never"));
        assert_eq!(unset, Lookup::NotConfigured);
    }

    #[test]
    fn test_role_mention_format() {
        let role = RoleInfo {
            id: RoleId::new(42),
            name: "Hosts".to_string(),
        };
        assert_eq!(role.mention(), "<@&42>");
    }
}
