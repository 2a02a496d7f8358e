//! Discord bot client abstraction.
//!
//! Provides a high-level interface for creating and running the Discord bot,
//! hiding serenity implementation details from the rest of the application.
//!
//! Serenity dispatches events on its own tasks. [`DiscordBotEvents`] only
//! forwards them into a channel; [`DiscordBot::process_events`] handles them
//! one at a time, so the command handler and its guild settings have a
//! single owner and need no locking.

use std::sync::Arc;
use std::time::Duration;

use serenity::async_trait;
use serenity::gateway::ShardManager;
use serenity::http::HttpBuilder;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::types::Config;
use crate::discord::commands::CommandHandler;
use crate::discord::handler::BotHandler;
use crate::state::ConfigStore;

#[derive(Debug, Clone)]
pub enum DiscordBotEvent {
    /// Bot connected and ready.
    Ready(Ready),
    /// Message received.
    Message { context: Context, message: Message },
}

struct DiscordBotEvents {
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
}

impl DiscordBotEvents {
    fn new(discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>) -> Self {
        Self { discord_events_tx }
    }
}

#[async_trait]
impl EventHandler for DiscordBotEvents {
    async fn ready(&self, _context: Context, ready: Ready) {
        if let Err(error) = self.discord_events_tx.send(DiscordBotEvent::Ready(ready)) {
            warn!("Failed to process discord event: {}", error);
        }
    }

    async fn message(&self, context: Context, message: Message) {
        if let Err(error) = self
            .discord_events_tx
            .send(DiscordBotEvent::Message { context, message })
        {
            warn!("Failed to process discord event: {}", error);
        }
    }
}

/// Builder for creating the Discord bot.
pub struct DiscordBotBuilder {
    config: Config,
}

impl DiscordBotBuilder {
    /// Create a new Discord bot builder.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the Discord bot with an empty settings store.
    pub async fn build(self) -> anyhow::Result<DiscordBot> {
        let (discord_events_tx, discord_events_rx) = mpsc::unbounded_channel::<DiscordBotEvent>();

        let client = build_client(
            &self.config.discord.token,
            Duration::from_secs(self.config.discord.http_timeout_secs),
            discord_events_tx,
        )
        .await?;

        let command_handler = CommandHandler::new(
            self.config.discord.command_prefix.clone(),
            self.config.announcement.clone(),
            ConfigStore::new(),
        );

        Ok(DiscordBot {
            client,
            handler: BotHandler::new(command_handler),
            discord_events_rx,
        })
    }
}

async fn build_client(
    token: &str,
    timeout: Duration,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
) -> anyhow::Result<Client> {
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    // Bound every Discord request so a hanging send cannot stall the event loop forever
    let reqwest_client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let events = DiscordBotEvents::new(discord_events_tx);
    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(events)
        .await?;
    Ok(client)
}

pub struct DiscordBot {
    client: Client,
    handler: BotHandler,
    discord_events_rx: mpsc::UnboundedReceiver<DiscordBotEvent>,
}

impl DiscordBot {
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        self.client.shard_manager.clone()
    }

    /// Connect and process events until the gateway closes or `shutdown_rx` flips to `true`.
    ///
    /// A gateway start failure (e.g. an invalid token) is returned as an error.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
        let shard_manager = self.shard_manager();
        let DiscordBot {
            mut client,
            mut handler,
            mut discord_events_rx,
        } = self;

        info!("Connecting to Discord...");

        tokio::select! {
            result = client.start() => {
                result?;
                info!("Discord client disconnected normally");
            }
            _ = Self::process_events(&mut discord_events_rx, &mut handler) => {}
            _ = async {
                // Wait for shutdown signal
                loop {
                    if shutdown_rx.changed().await.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                info!("Initiating graceful Discord shutdown...");
                shard_manager.shutdown_all().await;
                info!("Discord shutdown complete");
            } => {}
        }

        info!("Discord task ended");
        Ok(())
    }

    async fn process_events(
        discord_events_rx: &mut mpsc::UnboundedReceiver<DiscordBotEvent>,
        handler: &mut BotHandler,
    ) {
        while let Some(event) = discord_events_rx.recv().await {
            match event {
                DiscordBotEvent::Ready(ready) => {
                    info!(
                        "Bot is online as {}! ({} guilds)",
                        ready.user.name,
                        ready.guilds.len()
                    );
                }
                DiscordBotEvent::Message { context, message } => {
                    handler.handle_message(&context, message).await;
                }
            }
        }
        debug!("Discord events channel closed.");
    }
}
