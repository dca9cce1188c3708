//! Stock Image MCP Library
//!
//! Concurrent stock-image search across Unsplash, Pixabay and Storyblocks.
//! Each provider's response is normalized into [`NormalizedImageResult`] and
//! the batches are concatenated in a fixed provider order.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use stock_image_mcp::{Config, ImageSearchAggregator};
//!
//! let config = Config::load()?;
//! let aggregator = ImageSearchAggregator::from_config(&config)?;
//! let combined = aggregator.aggregate_search("mountain lake").await?;
//! for failure in &combined.failures {
//!     eprintln!("{failure}");
//! }
//! ```
//!
//! # Configuration
//! Set `UNSPLASH_ACCESS_KEY`, `PIXABAY_API_KEY`, `STORYBLOCKS_PUBLIC_KEY` and
//! `STORYBLOCKS_PRIVATE_KEY`, or configure them in `~/.binks/stock-images.toml`

pub mod aggregator;
pub mod config;
pub mod error;
pub mod providers;
pub mod server;
pub mod telemetry;
pub mod types;

pub use aggregator::{ImageSearchAggregator, ProviderStatus};
pub use config::Config;
pub use error::{ProviderError, ProviderErrorKind, SearchError};
pub use providers::ImageProvider;
pub use server::{ImageSearchParams, StockImageMcpServer};
pub use types::{AggregatedResults, ImageSource, NormalizedImageResult};
