//! fava-mcp executable.
//!
//! Reads configuration from flags, the environment, or a `.env` file, then
//! serves MCP over stdio. Logs go to stderr; stdout carries the protocol.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fava_mcp::{render_json, FavaClient, FavaConfig, McpServer, McpSession, Result};

#[derive(Parser, Debug)]
#[command(name = "fava-mcp", version, about = "MCP server for a Fava (Beancount) ledger")]
struct Cli {
    /// Fava base URL including the ledger slug, e.g. http://localhost:5000/my-ledger
    #[arg(long, env = "FAVA_URL")]
    fava_url: Option<String>,

    /// Basic-auth username
    #[arg(long, env = "FAVA_USERNAME")]
    username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "FAVA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-request timeout in seconds (default: no timeout)
    #[arg(long, env = "FAVA_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Check connectivity to Fava and exit instead of serving
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    // Loaded before the subscriber so `.env` can set RUST_LOG.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Some(problem) = dotenv_problem(&dotenv) {
        tracing::warn!(error = %problem, "Ignoring .env file");
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fava-mcp failed");
            ExitCode::FAILURE
        }
    }
}

/// A missing `.env` is normal; anything else (unreadable, malformed) is worth
/// reporting.
fn dotenv_problem(result: &dotenvy::Result<PathBuf>) -> Option<&dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = FavaConfig::new(cli.fava_url.unwrap_or_default())?
        .with_credentials(cli.username, cli.password)
        .with_timeout(cli.timeout_secs.map(Duration::from_secs));

    // The blocking client must be built and dropped outside the async runtime.
    let client = FavaClient::new(config)?;
    tracing::info!(
        url = client.config().base_url(),
        auth = client.config().credentials().is_some(),
        "Using Fava instance"
    );
    let session = McpSession::new(client);

    if cli.check {
        return check(&session);
    }

    let server = Arc::new(McpServer::new(session));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;
    runtime.block_on(Arc::clone(&server).run())
}

fn check(session: &McpSession) -> Result<()> {
    let data = session.ledger_data()?;
    let preview: String = render_json(&data).chars().take(200).collect();
    eprintln!("Connection successful!");
    eprintln!("ledger_data (truncated): {}...", preview);
    Ok(())
}
