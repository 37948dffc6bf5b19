//! morgen-mcp: Morgen Calendar MCP Server Main Binary
//!
//! Main entry point for the Morgen MCP server. Speaks the Model Context
//! Protocol over stdio.
//!
//! Usage:
//!   morgen-mcp           - Start the MCP server on stdio
//!   morgen-mcp --help    - Show help
//!   morgen-mcp --version - Show version

mod server;

use morgen_api::MorgenClient;
use morgen_core::{Config, ToolManager, VirtualIdRegistry};
use morgen_tools::register_tools;
use rmcp::ServiceExt;
use rmcp::transport::io;
use server::MorgenServer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// MCP server on stdio
    Serve,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("morgen-mcp {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Serve => {}
    }

    // Initialize logging (stderr only, stdout carries the protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting morgen-mcp...");
    tracing::info!("API base URL: {}", config.base_url);

    run_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Serve
}

/// Print help message
fn print_help() {
    println!("morgen-mcp - Morgen Calendar MCP Server");
    println!();
    println!("Usage:");
    println!("  morgen-mcp           Start the MCP server on stdio");
    println!("  morgen-mcp --help    Show this help message");
    println!("  morgen-mcp --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  MORGEN_API_KEY            Morgen API key (required)");
    println!("  MORGEN_BASE_URL           API endpoint (default: https://api.morgen.so/v3)");
    println!("  MORGEN_HTTP_TIMEOUT_SECS  HTTP timeout in seconds (default: 30)");
}

/// Run the MCP server until the client disconnects
async fn run_server(config: Config) -> anyhow::Result<()> {
    let client = Arc::new(
        MorgenClient::new(&config)
            .map_err(|e| anyhow::anyhow!("Failed to create API client: {}", e))?,
    );
    let registry = Arc::new(VirtualIdRegistry::new());

    // Register tools
    let mut tool_manager = ToolManager::new();
    register_tools(&mut tool_manager, client, registry);

    tracing::info!(
        "Registered {} tools: {:?}",
        tool_manager.len(),
        tool_manager.tool_names()
    );

    let server = MorgenServer::new(Arc::new(tool_manager));
    let service = server
        .serve(io::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start MCP server: {}", e))?;

    tracing::info!("morgen-mcp initialized successfully");

    service
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {}", e))?;

    tracing::info!("Shutdown complete");
    Ok(())
}
