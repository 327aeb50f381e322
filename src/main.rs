//! Session search MCP server.
//!
//! Exposes transcript search tools over stdio. Add to an MCP client
//! configuration:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "session-search": {
//!       "command": "session-search-mcp"
//!     }
//!   }
//! }
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use session_search::config::EngineConfig;
use session_search::server::SessionSearchService;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "session-search-mcp")]
#[command(version)]
#[command(about = "Search chat session transcripts over MCP", long_about = None)]
struct Cli {
    /// Transcript root (defaults to $SESSION_SEARCH_ROOT, then
    /// ~/.claude/projects)
    #[arg(long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol; logs go to stderr only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.root {
        Some(root) => EngineConfig::new(root),
        None => EngineConfig::from_env()?,
    };

    tracing::info!(root = %config.projects_root.display(), "starting session search MCP server");

    let service = SessionSearchService::new(config);
    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    tracing::info!("session search MCP server stopped");
    Ok(())
}
