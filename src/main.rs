// Oakbot - Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use oakbot::config::{load_config, ConfigOverrides};
use oakbot::delegate::{CompletionDelegate, Knowledge};
use oakbot::router::{MessageRouter, Router};
use oakbot::server::{ChatServer, SessionManager};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "oakbot")]
#[command(about = "Northeastern University student assistant chat API", version)]
struct Args {
    /// Path to a TOML config file (default: ~/.oakbot/config.toml)
    #[arg(long, env = "OAKBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let overrides = ConfigOverrides {
        config_path: args.config,
        host: args.host,
        port: args.port,
    };
    let config = load_config(&overrides)?;

    let delegate = CompletionDelegate::initialize(&config.provider, Knowledge::default());
    let message_router = MessageRouter::new(Router::default(), delegate);
    let session_manager = SessionManager::new(&config.sessions);

    ChatServer::new(message_router, session_manager)
        .serve(&config)
        .await
}

/// Initialize tracing
///
/// Default: INFO level, can be overridden with RUST_LOG.
/// OAKBOT_DEBUG=1 raises the default to DEBUG.
fn init_tracing() {
    let show_debug = std::env::var("OAKBOT_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);
    let default_level = if show_debug { "debug" } else { "info" };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
