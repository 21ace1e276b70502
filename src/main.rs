//! Polymarket predictions MCP server.
//!
//! Entry point. Loads env files and configuration, initialises structured
//! logging on stderr, builds the CLOB client and serves tool calls over
//! stdio until the client disconnects or Ctrl+C is received.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use polymarket_predictions::config::{self, AppConfig, ClobCredentials};
use polymarket_predictions::platforms::polymarket::ClobClient;
use polymarket_predictions::platforms::MarketClient;
use polymarket_predictions::server::{self, McpServer};
use polymarket_predictions::tools::ToolDispatcher;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Env files first: config may name variables they define.
    let env_file = config::load_env_files();

    let cfg = AppConfig::load_or_default(CONFIG_PATH)?;
    init_logging(&cfg);

    if let Some(path) = &env_file {
        info!(path = %path.display(), "Loaded env file");
    }

    info!(
        server = %cfg.server.name,
        version = %cfg.server.version,
        "Starting MCP server on stdio"
    );

    let credentials = ClobCredentials::from_env(&cfg.clob);
    if credentials.is_none() {
        warn!(
            key_env = %cfg.clob.key_env,
            funder_env = %cfg.clob.funder_env,
            "CLOB credentials not set; tool calls will report a configuration error"
        );
    }

    let client = ClobClient::new(&cfg.clob, credentials).context("Failed to build CLOB client")?;
    info!(client = client.name(), host = client.host(), "Market client ready");

    let dispatcher = ToolDispatcher::new(Arc::new(client));
    let mcp = McpServer::new(cfg.server.clone(), dispatcher);

    tokio::select! {
        result = server::serve_stdio(mcp) => {
            result?;
            info!("Client disconnected. Shutting down.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    Ok(())
}

/// Initialise the `tracing` subscriber on stderr; stdout is the protocol channel.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));

    let json_logging = cfg.logging.json || std::env::var("PREDICTIONS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
