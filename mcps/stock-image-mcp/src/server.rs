//! MCP Server implementation for stock-image search
//!
//! Exposes the aggregated Unsplash/Pixabay/Storyblocks search as MCP tools.

use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregator::{ImageSearchAggregator, ProviderStatus};
use crate::config::Config;

/// The main Stock Image MCP Server
#[derive(Clone)]
pub struct StockImageMcpServer {
    aggregator: Arc<ImageSearchAggregator>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter and Status Types
// ============================================================================

/// Provider status reported by `get_config`; never contains key material
#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    pub providers: Vec<ProviderStatus>,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImageSearchParams {
    /// The search query
    #[schemars(description = "Search term, e.g. 'mountain lake at sunset'")]
    pub query: String,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl StockImageMcpServer {
    pub fn new(config: &Config) -> Result<Self> {
        let aggregator = ImageSearchAggregator::from_config(config)?;
        Ok(Self::with_aggregator(aggregator))
    }

    /// Serve a pre-built aggregator (custom providers or endpoints)
    pub fn with_aggregator(aggregator: ImageSearchAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            tool_router: Self::tool_router(),
        }
    }

    pub fn config_status(&self) -> ConfigStatus {
        ConfigStatus {
            providers: self.aggregator.providers(),
            timeout_secs: self.aggregator.timeout().as_secs(),
        }
    }

    #[tool(
        description = "Search Unsplash, Pixabay and Storyblocks for stock images. Returns \
                       thumbnail and preview URLs, titles and tags, plus any provider failures."
    )]
    async fn search_images(
        &self,
        Parameters(params): Parameters<ImageSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Searching images for: {}", params.query);

        let results = self
            .aggregator
            .aggregate_search(&params.query)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Show which stock-image providers are configured and the request timeout.")]
    async fn get_config(&self) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(&self.config_status())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for StockImageMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Stock Image MCP Server - searches Unsplash, Pixabay and Storyblocks \
                 concurrently and returns one combined list of normalized image records. \
                 Providers without API keys are reported as failures."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
