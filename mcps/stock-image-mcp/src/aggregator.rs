//! Concurrent fan-out over all providers
//!
//! [`ImageSearchAggregator::aggregate_search`] starts every provider search at
//! once, waits for all of them, and concatenates the successful batches in
//! provider order. A failing provider is reported in
//! [`AggregatedResults::failures`] and never hides the others' results.

use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ProviderError, ProviderErrorKind, SearchError};
use crate::providers::{ImageProvider, PixabayProvider, StoryblocksProvider, UnsplashProvider};
use crate::types::{AggregatedResults, ImageSource};

/// Whether a provider can be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub source: ImageSource,
    pub available: bool,
}

/// Fans one search term out to every provider
pub struct ImageSearchAggregator {
    providers: Vec<Arc<dyn ImageProvider>>,
    timeout: Duration,
}

impl ImageSearchAggregator {
    /// Build the three stock-image adapters over one shared HTTP client
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.search.user_agent.as_str())
            .build()
            .context("failed to create HTTP client")?;

        // Order here is the order results are concatenated in
        let providers: Vec<Arc<dyn ImageProvider>> = vec![
            Arc::new(UnsplashProvider::new(client.clone(), config)),
            Arc::new(PixabayProvider::new(client.clone(), config)),
            Arc::new(StoryblocksProvider::new(client, config)),
        ];

        for provider in &providers {
            if !provider.is_available() {
                tracing::warn!(
                    "Provider '{}' has no credentials configured and will report a failure",
                    provider.source()
                );
            }
        }

        Ok(Self::with_providers(providers, config.search.timeout()))
    }

    /// Use an explicit provider list; results keep this order
    pub fn with_providers(providers: Vec<Arc<dyn ImageProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn providers(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|p| ProviderStatus {
                source: p.source(),
                available: p.is_available(),
            })
            .collect()
    }

    /// Search every provider concurrently and combine the results
    ///
    /// The term is trimmed; an empty term is rejected before any request is
    /// sent. Each provider gets the configured deadline, after which it is
    /// reported as [`ProviderErrorKind::Timeout`].
    pub async fn aggregate_search(&self, term: &str) -> Result<AggregatedResults, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }

        tracing::info!(
            "Searching {} providers for: {}",
            self.providers.len(),
            term
        );

        let searches = self.providers.iter().map(|provider| {
            let source = provider.source();
            async move {
                match tokio::time::timeout(self.timeout, provider.search(term)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ProviderError::new(source, ProviderErrorKind::Timeout)),
                }
            }
        });

        // join_all yields outcomes in the order the futures were given
        let outcomes = join_all(searches).await;

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(batch) => results.extend(batch),
                Err(err) => {
                    tracing::warn!(provider = %err.provider, "Provider search failed: {}", err.kind);
                    failures.push(err);
                }
            }
        }

        tracing::info!(
            "Search for '{}' returned {} results ({} providers failed)",
            term,
            results.len(),
            failures.len()
        );

        Ok(AggregatedResults {
            query: term.to_string(),
            results,
            failures,
        })
    }
}
