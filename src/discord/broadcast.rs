//! Announcement fan-out to every configured guild.

use serenity::model::id::{ChannelId, GuildId};
use tracing::{error, info, warn};

use crate::discord::announce::Announcement;
use crate::discord::platform::{Lookup, Outgoing, Platform};
use crate::state::AnnouncementTarget;

/// Per-target outcome of a broadcast.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<GuildId>,
    pub failed: Vec<(GuildId, ChannelId)>,
}

impl BroadcastReport {
    pub fn total(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Send `announcement` to every target.
///
/// A target whose channel is gone, or whose send fails, is recorded as
/// failed and the remaining targets are still attempted. A ping role that no
/// longer resolves only drops the mention.
pub async fn broadcast<P>(
    platform: &P,
    targets: &[AnnouncementTarget],
    announcement: &Announcement,
) -> BroadcastReport
where
    P: Platform + ?Sized,
{
    let mut report = BroadcastReport::default();

    for target in targets {
        let Some(channel) = platform.channel(target.guild_id, target.channel_id) else {
            warn!(
                "Skipping channel {} in guild {}: channel not found",
                target.channel_id, target.guild_id
            );
            report.failed.push((target.guild_id, target.channel_id));
            continue;
        };

        let mention = match Lookup::resolve(target.ping_role, |role_id| {
            platform.role(channel.guild_id, role_id)
        }) {
            Lookup::Resolved(role) => Some(role.mention()),
            Lookup::Stale(role_id) => {
                warn!(
                    "Ping role {} no longer exists in guild {}; sending without mention",
                    role_id, target.guild_id
                );
                None
            }
            Lookup::NotConfigured => None,
        };

        let message = Outgoing::announcement(mention, announcement.clone());
        match platform.send(channel.id, message).await {
            Ok(()) => report.delivered.push(target.guild_id),
            Err(e) => {
                error!(
                    "Failed to send message to channel {} in guild {}: {}",
                    channel.id, target.guild_id, e
                );
                report.failed.push((target.guild_id, target.channel_id));
            }
        }
    }

    info!(
        "Broadcast delivered to {} of {} configured channels",
        report.delivered.len(),
        report.total()
    );

    report
}
