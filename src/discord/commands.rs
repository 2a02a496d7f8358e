//! Discord bot commands (!config, !setrole, !restrict, !host, !ping, !help).
//!
//! Handles command parsing and execution. Handlers talk to Discord only
//! through [`Platform`], and own the guild settings they read and write.

use serenity::model::id::{ChannelId, GuildId, RoleId};
use serenity::model::mention::Mentionable;
use tracing::{debug, error, info, warn};

use crate::config::types::AnnouncementConfig;
use crate::discord::announce::Announcement;
use crate::discord::broadcast::broadcast;
use crate::discord::platform::{Lookup, Outgoing, Platform};
use crate::state::ConfigStore;

const NO_PERMISSION: &str = "You don't have permission to use this command.";
const INVALID_ROLE: &str = "Invalid role ID provided. Please provide a valid role ID.";
const NOT_ADMIN: &str = "You must be an administrator to restrict bot commands.";

/// Who ran a command, and where.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub author_tag: String,
    pub author_avatar_url: Option<String>,
    /// Role ids the caller holds in this guild.
    pub roles: Vec<RoleId>,
    /// Whether the caller has the administrator permission in this guild.
    pub is_admin: bool,
    pub guild_icon_url: Option<String>,
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Config,
    SetRole(RoleId),
    Restrict(RoleId),
    Host { link: String, hosted_by: String },
    Ping,
    Help,
}

/// A known command was invoked with missing or malformed arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageError {
    /// Command signature without the prefix.
    pub usage: &'static str,
    /// Check the command restriction before replying with the usage line.
    pub gated: bool,
}

const SETROLE_USAGE: UsageError = UsageError {
    usage: "setrole <role id>",
    gated: false,
};
const RESTRICT_USAGE: UsageError = UsageError {
    usage: "restrict <role id>",
    gated: false,
};
const HOST_USAGE: UsageError = UsageError {
    usage: "host <private server link> <hosted by>",
    gated: true,
};

impl Command {
    /// Parse a message.
    ///
    /// Returns `None` for anything that is not a known command.
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Command, UsageError>> {
        let rest = content.strip_prefix(prefix)?;
        let (name, args) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let args = split_args(args);

        let command = match name.to_lowercase().as_str() {
            "config" => Ok(Command::Config),
            "setrole" => role_arg(args.as_deref(), SETROLE_USAGE).map(Command::SetRole),
            "restrict" => role_arg(args.as_deref(), RESTRICT_USAGE).map(Command::Restrict),
            "host" => match args.as_deref() {
                Some([link, hosted_by, ..]) if !link.is_empty() && !hosted_by.is_empty() => {
                    Ok(Command::Host {
                        link: link.clone(),
                        hosted_by: hosted_by.clone(),
                    })
                }
                _ => Err(HOST_USAGE),
            },
            "ping" => Ok(Command::Ping),
            "help" => Ok(Command::Help),
            _ => return None,
        };

        Some(command)
    }
}

fn role_arg(args: Option<&[String]>, usage: UsageError) -> Result<RoleId, UsageError> {
    args.and_then(|args| args.first())
        .and_then(|arg| parse_role_id(arg))
        .ok_or(usage)
}

/// Accepts a bare id or a role mention (`<@&id>`).
pub fn parse_role_id(arg: &str) -> Option<RoleId> {
    let digits = arg
        .strip_prefix("<@&")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);

    digits
        .parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .map(RoleId::new)
}

/// Split arguments on whitespace; double quotes group words into one argument.
///
/// Returns `None` when a quote is left open.
pub fn split_args(input: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return None;
    }
    if has_token {
        args.push(current);
    }

    Some(args)
}

/// Command handler for Discord bot.
pub struct CommandHandler {
    prefix: String,
    announcement: AnnouncementConfig,
    store: ConfigStore,
}

impl CommandHandler {
    pub fn new(prefix: impl Into<String>, announcement: AnnouncementConfig, store: ConfigStore) -> Self {
        Self {
            prefix: prefix.into(),
            announcement,
            store,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Parse and execute a command from Discord.
    ///
    /// Returns `true` if the message was a command, `false` otherwise.
    pub async fn handle_command<P>(
        &mut self,
        platform: &P,
        invocation: &Invocation,
        content: &str,
    ) -> anyhow::Result<bool>
    where
        P: Platform + ?Sized,
    {
        let command = match Command::parse(&self.prefix, content) {
            Some(Ok(command)) => command,
            Some(Err(UsageError { usage, gated })) => {
                if gated && !self.store.allows(invocation.guild_id, &invocation.roles) {
                    reply(platform, invocation, NO_PERMISSION).await?;
                    return Ok(true);
                }
                debug!("Bad arguments from {}: {}", invocation.author_tag, content);
                let text = format!("Usage: `{}{}`", self.prefix, usage);
                reply(platform, invocation, text).await?;
                return Ok(true);
            }
            None => return Ok(false),
        };

        info!(
            "{:?} from {} in guild {}",
            command, invocation.author_tag, invocation.guild_id
        );

        match command {
            Command::Config => self.handle_config(platform, invocation).await?,
            Command::SetRole(role_id) => self.handle_set_role(platform, invocation, role_id).await?,
            Command::Restrict(role_id) => self.handle_restrict(platform, invocation, role_id).await?,
            Command::Host { link, hosted_by } => {
                self.handle_host(platform, invocation, &link, &hosted_by)
                    .await?
            }
            Command::Ping => self.handle_ping(platform, invocation).await?,
            Command::Help => self.handle_help(platform, invocation).await?,
        }

        Ok(true)
    }

    /// Handle !config.
    async fn handle_config<P>(&mut self, platform: &P, invocation: &Invocation) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        if !self.store.allows(invocation.guild_id, &invocation.roles) {
            return reply(platform, invocation, NO_PERMISSION).await;
        }

        let previous = self
            .store
            .set_announcement_channel(invocation.guild_id, invocation.channel_id);
        info!(
            "Announcement channel for guild {} set to {} (was {:?})",
            invocation.guild_id, invocation.channel_id, previous
        );

        let text = format!(
            "Configured this channel for messages: {}",
            invocation.channel_id.mention()
        );
        reply(platform, invocation, text).await
    }

    /// Handle !setrole.
    async fn handle_set_role<P>(
        &mut self,
        platform: &P,
        invocation: &Invocation,
        role_id: RoleId,
    ) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        if !self.store.allows(invocation.guild_id, &invocation.roles) {
            return reply(platform, invocation, NO_PERMISSION).await;
        }

        let Some(role) = platform.role(invocation.guild_id, role_id) else {
            return reply(platform, invocation, INVALID_ROLE).await;
        };

        self.store.set_ping_role(invocation.guild_id, role.id);
        info!("Ping role for guild {} set to {} ({})", invocation.guild_id, role.name, role.id);

        let text = format!("Ping role set to {} for this server.", role.mention());
        reply(platform, invocation, text).await
    }

    /// Handle !restrict. Administrators only; never subject to the restriction itself.
    async fn handle_restrict<P>(
        &mut self,
        platform: &P,
        invocation: &Invocation,
        role_id: RoleId,
    ) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        if !invocation.is_admin {
            return reply(platform, invocation, NOT_ADMIN).await;
        }

        let Some(role) = platform.role(invocation.guild_id, role_id) else {
            return reply(platform, invocation, INVALID_ROLE).await;
        };

        self.store.set_command_restriction(invocation.guild_id, role.id);
        info!(
            "Commands in guild {} restricted to {} ({})",
            invocation.guild_id, role.name, role.id
        );

        let text = format!(
            "Bot commands restricted to members with the role: {}",
            role.mention()
        );
        reply(platform, invocation, text).await
    }

    /// Handle !host: broadcast to every configured guild.
    async fn handle_host<P>(
        &mut self,
        platform: &P,
        invocation: &Invocation,
        link: &str,
        hosted_by: &str,
    ) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        if !self.store.allows(invocation.guild_id, &invocation.roles) {
            return reply(platform, invocation, NO_PERMISSION).await;
        }

        if self.store.announcement_channel(invocation.guild_id).is_none() {
            let text = format!("Please configure the bot using `{}config` first.", self.prefix);
            return reply(platform, invocation, text).await;
        }

        let announcement = Announcement::hosted(
            &self.announcement,
            link,
            hosted_by,
            &invocation.author_tag,
            invocation.author_avatar_url.as_deref(),
            invocation.guild_icon_url.as_deref(),
        );

        let targets = self.store.announcement_targets();
        let report = broadcast(platform, &targets, &announcement).await;

        let text = if report.all_delivered() {
            "Broadcast message sent to all configured servers.".to_string()
        } else {
            format!(
                "Broadcast message sent to {} of {} configured servers.",
                report.delivered.len(),
                report.total()
            )
        };
        reply(platform, invocation, text).await
    }

    /// Handle !ping: mention the ping role in the announcement channel.
    async fn handle_ping<P>(&mut self, platform: &P, invocation: &Invocation) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        if !self.store.allows(invocation.guild_id, &invocation.roles) {
            return reply(platform, invocation, NO_PERMISSION).await;
        }

        let guild_id = invocation.guild_id;
        let prefix = &self.prefix;

        let role = match Lookup::resolve(self.store.ping_role(guild_id), |id| {
            platform.role(guild_id, id)
        }) {
            Lookup::Resolved(role) => role,
            Lookup::NotConfigured => {
                let text = format!(
                    "No role configured for this server. Use `{}setrole` to set a role ID.",
                    prefix
                );
                return reply(platform, invocation, text).await;
            }
            Lookup::Stale(role_id) => {
                warn!("Ping role {} for guild {} no longer exists", role_id, guild_id);
                let text = format!(
                    "Configured role not found. Please set a valid role ID using `{}setrole`.",
                    prefix
                );
                return reply(platform, invocation, text).await;
            }
        };

        let channel = match Lookup::resolve(self.store.announcement_channel(guild_id), |id| {
            platform.channel(guild_id, id)
        }) {
            Lookup::Resolved(channel) => channel,
            Lookup::NotConfigured => {
                let text = format!("Server not configured. Use `{}config` to set up this server.", prefix);
                return reply(platform, invocation, text).await;
            }
            Lookup::Stale(channel_id) => {
                warn!("Announcement channel {} for guild {} no longer exists", channel_id, guild_id);
                let text = format!(
                    "Configured channel not found. Please reconfigure using `{}config`.",
                    prefix
                );
                return reply(platform, invocation, text).await;
            }
        };

        let ping = Outgoing::text(format!("{} A new message for you!", role.mention()));
        let text = match platform.send(channel.id, ping).await {
            Ok(()) => {
                info!("Pinged {} in #{} (guild {})", role.name, channel.name, guild_id);
                format!("Pinging {} in the configured channel.", role.mention())
            }
            Err(e) => {
                error!(
                    "Failed to send ping to channel {} in guild {}: {}",
                    channel.id, guild_id, e
                );
                format!("Failed to ping {} in the configured channel.", role.mention())
            }
        };
        reply(platform, invocation, text).await
    }

    /// Handle !help.
    async fn handle_help<P>(&self, platform: &P, invocation: &Invocation) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        let p = &self.prefix;
        let help_text = format!(
            "**Available Commands:**\n\
             • `{p}config` - Use this channel for announcements\n\
             • `{p}setrole <role id>` - Set the role pinged with announcements\n\
             • `{p}restrict <role id>` - Limit bot commands to a role (administrators only)\n\
             • `{p}host <private server link> <hosted by>` - Announce a hosted server to every configured server\n\
             • `{p}ping` - Ping the configured role in the announcement channel\n\
             • `{p}help` - Show this help message"
        );

        reply(platform, invocation, help_text).await
    }
}

async fn reply<P>(platform: &P, invocation: &Invocation, text: impl Into<String>) -> anyhow::Result<()>
where
    P: Platform + ?Sized,
{
    platform
        .send(invocation.channel_id, Outgoing::text(text))
        .await?;
    Ok(())
}
