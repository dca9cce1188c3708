//! Stock Image MCP Server
//!
//! Concurrent stock-image search across Unsplash, Pixabay and Storyblocks.
//!
//! # Configuration
//! Set provider keys via env vars or configure them in `~/.binks/stock-images.toml`

use anyhow::Result;
use clap::{Parser, Subcommand};
use rmcp::{transport::stdio, ServiceExt};
use std::io::{BufRead, Write};

use stock_image_mcp::config::{Config, LoggingConfig};
use stock_image_mcp::{telemetry, ImageSearchAggregator, StockImageMcpServer};

#[derive(Parser)]
#[command(name = "stock-image-mcp")]
#[command(about = "Search Unsplash, Pixabay and Storyblocks for stock images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the combined results as JSON
    Search {
        /// Search term (prompted for if not provided)
        term: Option<String>,
    },
    /// Run as an MCP server over stdio (default)
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing("stock_image_mcp", &LoggingConfig::from_env())?;

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Search { term }) => {
            let term = match term {
                Some(term) => term,
                None => prompt_for_term()?,
            };
            search(&config, &term).await
        }
        Some(Commands::Serve) | None => serve(&config).await,
    }
}

/// Read a search term from stdin, prompting on stderr
fn prompt_for_term() -> Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Enter search term: ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn search(config: &Config, term: &str) -> Result<()> {
    let aggregator = ImageSearchAggregator::from_config(config)?;
    let combined = aggregator.aggregate_search(term).await?;

    for failure in &combined.failures {
        eprintln!("{}", failure);
    }
    eprintln!("Total results: {}", combined.results.len());

    println!("{}", serde_json::to_string_pretty(&combined)?);
    Ok(())
}

async fn serve(config: &Config) -> Result<()> {
    tracing::info!("Starting Stock Image MCP Server");

    let server = StockImageMcpServer::new(config)?;
    for status in server.config_status().providers {
        let state = if status.available {
            "configured"
        } else {
            "missing credentials"
        };
        tracing::info!("{}: {}", status.source, state);
    }

    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
