//! Pixabay adapter
//!
//! Searches `GET /api/?key=<key>&q=<term>`. Pixabay has no titles, but every
//! hit carries a comma-separated tag list.
//! See: https://pixabay.com/api/docs/

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::Deserialize;

use super::{deserialize_id, endpoint, missing_credentials, ImageProvider};
use crate::config::{Config, Secret, PIXABAY_KEY_ENV};
use crate::error::ProviderError;
use crate::types::{ImageSource, NormalizedImageResult};

/// Pixabay backend
#[derive(Debug, Clone)]
pub struct PixabayProvider {
    client: Client,
    base_url: String,
    api_key: Option<Secret>,
}

impl PixabayProvider {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.pixabay.clone(),
            api_key: config.credentials.pixabay().cloned(),
        }
    }
}

// Pixabay API response types
#[derive(Debug, Deserialize)]
struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(rename = "previewURL")]
    preview_url: String,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(default)]
    tags: String,
}

/// Split Pixabay's `"cat, animal,pet"` tag string into trimmed tags
fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        // Blank segments such as in "cat,,pet" are dropped rather than kept as ""
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Pixabay
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn build_request(&self, term: &str) -> Result<Request, ProviderError> {
        let Some(ref api_key) = self.api_key else {
            return Err(missing_credentials(self.source(), PIXABAY_KEY_ENV));
        };

        let url = endpoint(self.source(), &self.base_url, "/api/")?;

        self.client
            .get(url)
            .query(&[("key", api_key.expose()), ("q", term)])
            .build()
            .map_err(|e| ProviderError::from_reqwest(self.source(), e))
    }

    fn parse_response(&self, body: &[u8]) -> Result<Vec<NormalizedImageResult>, ProviderError> {
        let response: PixabayResponse =
            serde_json::from_slice(body).map_err(|e| ProviderError::decode(self.source(), e))?;

        Ok(response
            .hits
            .into_iter()
            .map(|hit| NormalizedImageResult {
                image_id: hit.id,
                thumbnail_url: hit.preview_url,
                preview_url: hit.webformat_url,
                title: None,
                source: ImageSource::Pixabay,
                tags: split_tags(&hit.tags),
            })
            .collect())
    }
}
