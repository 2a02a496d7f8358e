//! Discord message event handling.
//!
//! Turns gateway messages into [`Invocation`]s and runs them through the
//! [`CommandHandler`] against the live client.

use serenity::all::{
    ChannelId, Context, CreateMessage, GuildId, Message, Permissions, RoleId,
};
use serenity::async_trait;
use tracing::{debug, error, warn};

use crate::common::error::DiscordError;
use crate::common::DiscordResult;
use crate::discord::commands::{CommandHandler, Invocation};
use crate::discord::platform::{ChannelInfo, Outgoing, Platform, RoleInfo};

/// [`Platform`] backed by the serenity cache and HTTP client.
pub struct SerenityPlatform<'a> {
    ctx: &'a Context,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Platform for SerenityPlatform<'_> {
    fn role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleInfo> {
        let guild = self.ctx.cache.guild(guild_id)?;
        guild.roles.get(&role_id).map(|role| RoleInfo {
            id: role.id,
            name: role.name.clone(),
        })
    }

    fn channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelInfo> {
        let guild = self.ctx.cache.guild(guild_id)?;
        guild
            .channels
            .get(&channel_id)
            .or_else(|| guild.threads.iter().find(|thread| thread.id == channel_id))
            .map(|channel| ChannelInfo {
                id: channel.id,
                guild_id: channel.guild_id,
                name: channel.name.clone(),
            })
    }

    async fn send(&self, channel_id: ChannelId, message: Outgoing) -> DiscordResult<()> {
        channel_id
            .send_message(&self.ctx.http, create_message(message)?)
            .await?;
        Ok(())
    }
}

fn create_message(message: Outgoing) -> DiscordResult<CreateMessage> {
    if message.content.is_none() && message.announcement.is_none() {
        return Err(DiscordError::SendFailed {
            message: "message has neither content nor embed".to_string(),
        });
    }

    let mut builder = CreateMessage::new();
    if let Some(content) = message.content {
        builder = builder.content(content);
    }
    if let Some(announcement) = message.announcement {
        builder = builder.embed(announcement.to_embed());
    }
    Ok(builder)
}

/// Whether a member has the administrator permission.
///
/// `role_permissions` must include the guild's @everyone role.
pub fn is_administrator<I>(is_owner: bool, role_permissions: I) -> bool
where
    I: IntoIterator<Item = Permissions>,
{
    is_owner
        || role_permissions
            .into_iter()
            .any(|permissions| permissions.contains(Permissions::ADMINISTRATOR))
}

/// Whether a message should reach the command handler.
///
/// Skips our own messages, other bots, direct messages and blank content.
fn should_handle(is_own: bool, is_bot: bool, in_guild: bool, content: &str) -> bool {
    !is_own && !is_bot && in_guild && !content.trim().is_empty()
}

/// Build the invocation context for a guild message from the cache.
fn build_invocation(ctx: &Context, msg: &Message) -> Option<Invocation> {
    let guild_id = msg.guild_id?;
    let roles: Vec<RoleId> = msg
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();

    let (is_admin, guild_icon_url) = match ctx.cache.guild(guild_id) {
        Some(guild) => {
            // The @everyone role shares the guild's id.
            let everyone = RoleId::new(guild_id.get());
            let permissions = roles
                .iter()
                .chain(std::iter::once(&everyone))
                .filter_map(|id| guild.roles.get(id))
                .map(|role| role.permissions);
            let is_admin = is_administrator(guild.owner_id == msg.author.id, permissions);
            (is_admin, guild.icon_url())
        }
        None => {
            warn!("Guild {} not in cache, treating {} as non-admin", guild_id, msg.author.name);
            (false, None)
        }
    };

    Some(Invocation {
        guild_id,
        channel_id: msg.channel_id,
        author_tag: msg.author.tag(),
        author_avatar_url: msg.author.avatar_url(),
        roles,
        is_admin,
        guild_icon_url,
    })
}

/// Discord event handler.
pub struct BotHandler {
    command_handler: CommandHandler,
}

impl BotHandler {
    pub fn new(command_handler: CommandHandler) -> Self {
        Self { command_handler }
    }

    pub async fn handle_message(&mut self, ctx: &Context, msg: Message) {
        let is_own = msg.author.id == ctx.cache.current_user().id;
        if !should_handle(is_own, msg.author.bot, msg.guild_id.is_some(), &msg.content) {
            return;
        }
        let content = msg.content.trim();

        let Some(invocation) = build_invocation(ctx, &msg) else {
            return;
        };

        let platform = SerenityPlatform::new(ctx);
        match self
            .command_handler
            .handle_command(&platform, &invocation, content)
            .await
        {
            Ok(true) => {}
            Ok(false) => debug!("Ignoring non-command message from {}", msg.author.name),
            Err(e) => error!("Command handler error: {}", e),
        }
    }
}
