//! Tool server binary.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use mcp_adapters::{BraveConfig, YahooConfig, register_builtin_tools};
use mcp_config::{BIND_ADDR_VAR, ConfigResult, LOG_VAR, ServerConfig, load_dotenv};
use mcp_kernel::ToolServer;
use mcp_tools::ToolRegistry;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "mcp-server", version, about = "Serve the hierarchical tool registry over HTTP")]
struct Args {
    /// Listen address.
    #[arg(long, env = "MCP_BIND_ADDR")]
    bind: Option<SocketAddr>,
    /// Log filter directive.
    #[arg(long, env = "MCP_LOG")]
    log: Option<String>,
}

/// Loads configuration with command-line values taking precedence over
/// `lookup`, so a bad environment value never masks a valid flag.
fn load_config<F>(args: &Args, lookup: F) -> ConfigResult<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    ServerConfig::from_lookup(|name| match name {
        BIND_ADDR_VAR => args.bind.map(|addr| addr.to_string()).or_else(|| lookup(name)),
        LOG_VAR => args.log.clone().or_else(|| lookup(name)),
        _ => lookup(name),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    let args = Args::parse();

    let config = load_config(&args, |name| std::env::var(name).ok())
        .context("failed to load configuration")?;

    mcp_telemetry::init_tracing(config.log_filter())?;
    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let brave = BraveConfig::new(config.brave_api_key()).with_timeout(config.http_timeout());
    let yahoo = YahooConfig::default().with_timeout(config.http_timeout());
    let mut registry = ToolRegistry::builder();
    register_builtin_tools(&mut registry, brave, yahoo).context("failed to register tools")?;

    let registry = registry.freeze();
    info!(tools = registry.len(), addr = %config.bind_addr(), "starting tool server");

    ToolServer::new(registry, config.bind_addr())
        .serve(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!(%err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
