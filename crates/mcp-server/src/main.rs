//! Peek MCP Server
//!
//! Exposes peek's inspection and docstring tools to AI agents via MCP protocol.
//!
//! ## Tools
//!
//! - `inspect_module` - Structure of a Python module, class, function, or JSON/TOML file
//! - `get_docstring` - Formatted, paginated docstring of a code entity
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "peek": {
//!       "command": "peek-mcp",
//!       "env": { "PEEK_PATH": "/path/to/project/src" }
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use peek_inspect::{InspectConfig, Registry};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod tools;

use tools::PeekService;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = InspectConfig::from_env();
    let registry = Registry::from_config(&config).context("Failed to build inspector registry")?;
    log::info!(
        "Starting Peek MCP server (search paths: {:?})",
        config.provider.search_paths
    );

    let service = PeekService::new(registry);
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Peek MCP server stopped");
    Ok(())
}
