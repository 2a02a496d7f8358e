//! In-memory guild configuration.
//!
//! Nothing here is persisted; every mapping starts empty on process start.
//! Entries are overwritten, never removed. The store has a single owner
//! (the command handler running in the event loop), so it carries no locks.

use std::collections::BTreeMap;

use serenity::model::id::{ChannelId, GuildId, RoleId};

use crate::state::gate;

/// A broadcast destination: one guild's announcement channel and its ping role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementTarget {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub ping_role: Option<RoleId>,
}

/// Guild-keyed bot settings.
#[derive(Debug, Default)]
pub struct ConfigStore {
    announcement_channels: BTreeMap<GuildId, ChannelId>,
    ping_roles: BTreeMap<GuildId, RoleId>,
    command_restrictions: BTreeMap<GuildId, RoleId>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcement_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.announcement_channels.get(&guild_id).copied()
    }

    /// Returns the previously configured channel, if any.
    pub fn set_announcement_channel(
        &mut self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Option<ChannelId> {
        self.announcement_channels.insert(guild_id, channel_id)
    }

    pub fn ping_role(&self, guild_id: GuildId) -> Option<RoleId> {
        self.ping_roles.get(&guild_id).copied()
    }

    pub fn set_ping_role(&mut self, guild_id: GuildId, role_id: RoleId) -> Option<RoleId> {
        self.ping_roles.insert(guild_id, role_id)
    }

    pub fn command_restriction(&self, guild_id: GuildId) -> Option<RoleId> {
        self.command_restrictions.get(&guild_id).copied()
    }

    pub fn set_command_restriction(
        &mut self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> Option<RoleId> {
        self.command_restrictions.insert(guild_id, role_id)
    }

    /// Check the guild's command restriction against the caller's roles.
    pub fn allows(&self, guild_id: GuildId, caller_roles: &[RoleId]) -> bool {
        gate::allowed(self.command_restriction(guild_id), caller_roles)
    }

    /// Every configured announcement channel, in guild id order.
    pub fn announcement_targets(&self) -> Vec<AnnouncementTarget> {
        self.announcement_channels
            .iter()
            .map(|(&guild_id, &channel_id)| AnnouncementTarget {
                guild_id,
                channel_id,
                ping_role: self.ping_role(guild_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = ConfigStore::new();
        let guild = GuildId::new(1);

        assert_eq!(store.announcement_channel(guild), None);
        assert_eq!(store.ping_role(guild), None);
        assert_eq!(store.command_restriction(guild), None);
        assert!(store.announcement_targets().is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = ConfigStore::new();
        let guild = GuildId::new(1);

        assert_eq!(store.set_announcement_channel(guild, ChannelId::new(10)), None);
        assert_eq!(
            store.set_announcement_channel(guild, ChannelId::new(11)),
            Some(ChannelId::new(10))
        );
        assert_eq!(store.announcement_channel(guild), Some(ChannelId::new(11)));
        assert_eq!(store.announcement_targets().len(), 1);
    }

    #[test]
    fn test_mappings_are_independent() {
        let mut store = ConfigStore::new();
        let a = GuildId::new(1);
        let b = GuildId::new(2);

        store.set_ping_role(a, RoleId::new(100));
        store.set_announcement_channel(b, ChannelId::new(20));

        assert_eq!(store.announcement_channel(a), None);
        assert_eq!(store.ping_role(b), None);
        assert_eq!(
            store.announcement_targets(),
            vec![AnnouncementTarget {
                guild_id: b,
                channel_id: ChannelId::new(20),
                ping_role: None,
            }]
        );
    }

    #[test]
    fn test_targets_carry_ping_role_in_guild_order() {
        let mut store = ConfigStore::new();
        store.set_announcement_channel(GuildId::new(5), ChannelId::new(50));
        store.set_announcement_channel(GuildId::new(3), ChannelId::new(30));
        store.set_ping_role(GuildId::new(5), RoleId::new(500));

        let targets = store.announcement_targets();
        assert_eq!(targets[0].guild_id, GuildId::new(3));
        assert_eq!(targets[0].ping_role, None);
        assert_eq!(targets[1].guild_id, GuildId::new(5));
        assert_eq!(targets[1].ping_role, Some(RoleId::new(500)));
    }

    #[test]
    fn test_allows_uses_guild_restriction() {
        let mut store = ConfigStore::new();
        let guild = GuildId::new(1);
        let other = GuildId::new(2);
        store.set_command_restriction(guild, RoleId::new(9));

        assert!(!store.allows(guild, &[RoleId::new(1)]));
        assert!(store.allows(guild, &[RoleId::new(9)]));
        assert!(store.allows(other, &[]));
    }
}
