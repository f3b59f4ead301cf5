//! FunLearn Agent · lesson-to-game backend
//!
//! - Axum HTTP API: process lessons into templated games, list them, and
//!   generate/validate JavaScript games through a game agent
//! - Optional OpenAI game agent (via environment variables), local fallback otherwise
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 8000)
//!   OPENAI_API_KEY      : enables the OpenAI game agent if present
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_FAST_MODEL   : default "gpt-4o-mini" (validation)
//!   OPENAI_STRONG_MODEL : default "gpt-4o" (game generation)
//!   AGENT_CONFIG_PATH   : path to TOML config (agent name + prompts)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod classify;
mod config;
mod domain;
mod errors;
mod extract;
mod game_agent;
mod generator;
mod logic;
mod openai;
mod processor;
mod protocol;
mod routes;
mod state;
mod store;
mod telemetry;
mod templates;
mod util;

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::port_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    // Shared state: validated templates, lesson store, game agents.
    let state = Arc::new(AppState::new()?);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port_from_env()));
    let listener = TcpListener::bind(addr).await?;
    info!(target: "funlearn_agent", %addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(target: "funlearn_agent", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(target: "funlearn_agent", error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!(target: "funlearn_agent", "Shutdown signal received");
}
