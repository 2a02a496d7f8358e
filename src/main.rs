//! Aurora Beacon - hosted server announcements for Discord
//!
//! Listens for `!` commands, keeps per-server settings in memory, and
//! broadcasts hosted private server details to every configured server.

mod common;
mod config;
mod discord;
mod liveness;
mod state;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use config::{env::get_config_path, load_and_validate};
use discord::DiscordBotBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Aurora Beacon v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    match config_path.as_deref() {
        Some(path) => info!("Loading configuration from {}...", path),
        None => info!("No config file set, using defaults and environment"),
    }

    let config = load_and_validate(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Command prefix: {}", config.discord.command_prefix);
    info!(
        "  Liveness: {}",
        if config.liveness.enabled {
            format!("{}:{}", config.liveness.host, config.liveness.port)
        } else {
            "disabled".to_string()
        }
    );

    // ============================================================
    // Liveness endpoint
    // ============================================================
    if config.liveness.enabled {
        let liveness_config = config.liveness.clone();
        tokio::spawn(async move {
            if let Err(e) = liveness::serve(&liveness_config).await {
                error!("Liveness endpoint stopped: {}", e);
            }
        });
    }

    // ============================================================
    // Discord bot
    // ============================================================
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let discord_bot = DiscordBotBuilder::new(config).build().await?;
    let discord_task = discord_bot.run(shutdown_rx);
    tokio::pin!(discord_task);

    tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - disconnecting...");
        }
        result = &mut discord_task => {
            if let Err(e) = &result {
                error!("Discord client error: {}", e);
            }
            return result;
        }
    }

    // Handle graceful shutdown
    if let Err(e) = shutdown_tx.send(true) {
        warn!("Shutdown channel closed (Discord task already exited): {}", e);
    }
    let timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(timeout, discord_task).await {
        Ok(Ok(())) => info!("Discord client shut down gracefully"),
        Ok(Err(e)) => warn!("Discord client error during shutdown: {}", e),
        Err(_) => warn!("Discord shutdown timed out"),
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
