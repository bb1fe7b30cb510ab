//! gitgate MCP server
//!
//! Exposes git operations as MCP tools to agentic clients.
//!
//! # Usage
//!
//! ```bash
//! gitgate-mcp [--git <program>] [--timeout-secs <n>] [--config <file>] [--verbose]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `gitgate_mcp=info`)
//! - `GITGATE_GIT`, `GITGATE_TIMEOUT_SECS`, `GITGATE_CONFIG`: same as the flags
//!
//! # Protocol
//!
//! JSON-RPC 2.0 over stdio, one message per line:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use gitgate_mcp::{GatewayConfig, GatewayServer, StdioTransport, serve};

/// MCP server exposing git operations as tools
#[derive(Parser)]
#[command(name = "gitgate-mcp")]
#[command(about = "MCP server exposing git operations as tools")]
#[command(version)]
struct Args {
    /// git executable to run (overrides the config file)
    #[arg(long, env = "GITGATE_GIT")]
    git: Option<String>,

    /// Kill a git command that runs longer than this many seconds
    #[arg(long, env = "GITGATE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// TOML configuration file
    #[arg(short, long, env = "GITGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("gitgate_mcp={level}").parse()?)
                .add_directive(format!("gitgate_exec={level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::default(),
    }
    .with_overrides(args.git, args.timeout_secs);
    config.validate()?;

    tracing::info!(
        git = %config.git.program,
        timeout = ?config.timeout(),
        "Starting gitgate-mcp server"
    );

    let server = GatewayServer::new(&config);
    let mut transport = StdioTransport::stdio();
    if let Err(e) = serve(&server, &mut transport).await {
        tracing::error!(error = %e, "Transport failed");
        return Err(e.into());
    }

    Ok(())
}
