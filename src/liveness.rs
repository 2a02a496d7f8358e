//! Keep-alive HTTP endpoint.
//!
//! Answers `GET /` so an external uptime monitor can see the process is up.
//! It shares no state with the bot.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::types::LivenessConfig;

pub const LIVENESS_BODY: &str = "Bot is running!";

pub fn router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> &'static str {
    LIVENESS_BODY
}

/// Bind the configured address and serve until the process exits.
pub async fn serve(config: &LivenessConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    serve_on(listener).await
}

pub async fn serve_on(listener: TcpListener) -> std::io::Result<()> {
    info!("Liveness endpoint listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
