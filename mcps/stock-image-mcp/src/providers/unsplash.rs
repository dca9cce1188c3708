//! Unsplash adapter
//!
//! Lists photos from `GET /photos?query=<term>`, authenticated with a
//! `Client-ID` authorization header.
//! See: https://unsplash.com/documentation

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Request};
use serde::Deserialize;

use super::{deserialize_id, endpoint, missing_credentials, ImageProvider, NO_TITLE};
use crate::config::{Config, Secret, UNSPLASH_KEY_ENV};
use crate::error::ProviderError;
use crate::types::{ImageSource, NormalizedImageResult};

/// Unsplash backend
#[derive(Debug, Clone)]
pub struct UnsplashProvider {
    client: Client,
    base_url: String,
    api_key: Option<Secret>,
}

impl UnsplashProvider {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.unsplash.clone(),
            api_key: config.credentials.unsplash().cloned(),
        }
    }
}

// Unsplash API response types
#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    alt_description: Option<String>,
    urls: UnsplashUrls,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    thumb: String,
    small: String,
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Unsplash
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn build_request(&self, term: &str) -> Result<Request, ProviderError> {
        let Some(ref api_key) = self.api_key else {
            return Err(missing_credentials(self.source(), UNSPLASH_KEY_ENV));
        };

        let url = endpoint(self.source(), &self.base_url, "/photos")?;

        self.client
            .get(url)
            .query(&[("query", term)])
            .header(AUTHORIZATION, format!("Client-ID {}", api_key.expose()))
            .build()
            .map_err(|e| ProviderError::from_reqwest(self.source(), e))
    }

    fn parse_response(&self, body: &[u8]) -> Result<Vec<NormalizedImageResult>, ProviderError> {
        let photos: Vec<UnsplashPhoto> =
            serde_json::from_slice(body).map_err(|e| ProviderError::decode(self.source(), e))?;

        Ok(photos
            .into_iter()
            .map(|photo| NormalizedImageResult {
                image_id: photo.id,
                thumbnail_url: photo.urls.thumb,
                preview_url: photo.urls.small,
                title: Some(
                    photo
                        .alt_description
                        .unwrap_or_else(|| NO_TITLE.to_string()),
                ),
                source: ImageSource::Unsplash,
                // The listing endpoint carries no tags
                tags: Vec::new(),
            })
            .collect())
    }
}
