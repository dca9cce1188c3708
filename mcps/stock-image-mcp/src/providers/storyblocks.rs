//! Storyblocks adapter
//!
//! Storyblocks authenticates every request with a time-bound HMAC: the
//! signature is HMAC-SHA256 over the resource path, keyed by the private key
//! concatenated with the expiry timestamp. Signature and `EXPIRES` are
//! generated together each time a request is built.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, Request};
use serde::Deserialize;
use sha2::Sha256;

use super::{deserialize_id, endpoint, missing_credentials, ImageProvider, NO_TITLE};
use crate::config::{Config, Secret, STORYBLOCKS_PRIVKEY_ENV, STORYBLOCKS_PUBKEY_ENV};
use crate::error::ProviderError;
use crate::types::{ImageSource, NormalizedImageResult};

type HmacSha256 = Hmac<Sha256>;

/// Resource path that is both requested and signed
pub const SEARCH_RESOURCE: &str = "/api/v2/images/search";

/// Seconds a signature stays valid
pub const EXPIRY_WINDOW_SECS: i64 = 120;

/// Compute the lowercase hex HMAC for a search request expiring at `expires`
pub fn sign_request(private_key: &str, expires: i64) -> String {
    let key = format!("{private_key}{expires}");
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(SEARCH_RESOURCE.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// An expiry timestamp and the signature that covers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryblocksSignature {
    /// Unix timestamp after which Storyblocks rejects the request
    pub expires: i64,
    /// Lowercase hex HMAC-SHA256 digest
    pub hmac: String,
}

impl StoryblocksSignature {
    /// Sign a request built at `now`
    pub fn generate(private_key: &str, now: DateTime<Utc>) -> Self {
        let expires = now.timestamp() + EXPIRY_WINDOW_SECS;
        Self {
            expires,
            hmac: sign_request(private_key, expires),
        }
    }
}

/// Storyblocks backend
#[derive(Debug, Clone)]
pub struct StoryblocksProvider {
    client: Client,
    base_url: String,
    public_key: Option<Secret>,
    private_key: Option<Secret>,
}

impl StoryblocksProvider {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.storyblocks.clone(),
            public_key: config.credentials.storyblocks_pubkey().cloned(),
            private_key: config.credentials.storyblocks_privkey().cloned(),
        }
    }

    /// Build the request with a signature for the given clock reading
    fn build_request_at(&self, term: &str, now: DateTime<Utc>) -> Result<Request, ProviderError> {
        let Some(ref public_key) = self.public_key else {
            return Err(missing_credentials(self.source(), STORYBLOCKS_PUBKEY_ENV));
        };
        let Some(ref private_key) = self.private_key else {
            return Err(missing_credentials(self.source(), STORYBLOCKS_PRIVKEY_ENV));
        };

        let url = endpoint(self.source(), &self.base_url, SEARCH_RESOURCE)?;
        let signature = StoryblocksSignature::generate(private_key.expose(), now);
        let expires = signature.expires.to_string();

        self.client
            .get(url)
            .query(&[
                ("APIKEY", public_key.expose()),
                ("EXPIRES", expires.as_str()),
                ("HMAC", signature.hmac.as_str()),
                ("keywords", term),
            ])
            .build()
            .map_err(|e| ProviderError::from_reqwest(self.source(), e))
    }
}

// Storyblocks API response types
#[derive(Debug, Deserialize)]
struct StoryblocksResponse {
    #[serde(default)]
    results: Vec<StoryblocksItem>,
}

#[derive(Debug, Deserialize)]
struct StoryblocksItem {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    thumbnail_url: String,
    preview_url: String,
    title: Option<String>,
}

#[async_trait]
impl ImageProvider for StoryblocksProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Storyblocks
    }

    fn is_available(&self) -> bool {
        self.public_key.is_some() && self.private_key.is_some()
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn build_request(&self, term: &str) -> Result<Request, ProviderError> {
        self.build_request_at(term, Utc::now())
    }

    fn parse_response(&self, body: &[u8]) -> Result<Vec<NormalizedImageResult>, ProviderError> {
        let response: StoryblocksResponse =
            serde_json::from_slice(body).map_err(|e| ProviderError::decode(self.source(), e))?;

        Ok(response
            .results
            .into_iter()
            .map(|item| NormalizedImageResult {
                image_id: item.id,
                thumbnail_url: item.thumbnail_url,
                preview_url: item.preview_url,
                title: Some(item.title.unwrap_or_else(|| NO_TITLE.to_string())),
                source: ImageSource::Storyblocks,
                tags: Vec::new(),
            })
            .collect())
    }
}
