//! Stock-image provider adapters
//!
//! Each adapter knows how to build one authenticated request for its
//! provider and how to map that provider's JSON into
//! [`NormalizedImageResult`]s. Sending the request and classifying failures
//! is shared by the provided [`ImageProvider::search`] method.

use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::{ProviderError, ProviderErrorKind};
use crate::types::{ImageSource, NormalizedImageResult};

pub mod pixabay;
pub mod storyblocks;
pub mod unsplash;

pub use pixabay::PixabayProvider;
pub use storyblocks::StoryblocksProvider;
pub use unsplash::UnsplashProvider;

/// Title used when a provider that normally has one sends none
pub const NO_TITLE: &str = "No title available";

/// Trait for stock-image providers
///
/// Implementors hold a clone of the shared [`Client`], so every adapter in an
/// aggregated search draws from the same connection pool.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Which provider this adapter talks to
    fn source(&self) -> ImageSource;

    /// Check if the provider's credentials are configured
    fn is_available(&self) -> bool;

    /// HTTP client used to send requests
    fn client(&self) -> &Client;

    /// Build the authenticated GET request for `term`
    ///
    /// The term is percent-encoded into the query string.
    fn build_request(&self, term: &str) -> Result<Request, ProviderError>;

    /// Map a successful response body into normalized records
    fn parse_response(&self, body: &[u8]) -> Result<Vec<NormalizedImageResult>, ProviderError>;

    /// Run one search against this provider
    ///
    /// Exactly one request is sent. Any status other than 200 is reported as
    /// [`ProviderErrorKind::HttpStatus`].
    async fn search(&self, term: &str) -> Result<Vec<NormalizedImageResult>, ProviderError> {
        let source = self.source();
        let request = self.build_request(term)?;

        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| ProviderError::from_reqwest(source, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(provider = %source, status = status.as_u16(), "Provider returned error status");
            return Err(ProviderError::status(source, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(source, e))?;

        let results = self.parse_response(&body)?;
        tracing::debug!(provider = %source, count = results.len(), "Provider search complete");
        Ok(results)
    }
}

/// Append `path` to a configured base URL, keeping any path prefix the base has
pub(crate) fn endpoint(source: ImageSource, base: &str, path: &str) -> Result<Url, ProviderError> {
    let invalid = |e: url::ParseError| {
        ProviderError::new(
            source,
            ProviderErrorKind::Request(format!("invalid endpoint {base}: {e}")),
        )
    };

    let mut url = Url::parse(base).map_err(invalid)?;
    if !url.path().ends_with('/') {
        let prefix = format!("{}/", url.path());
        url.set_path(&prefix);
    }
    url.join(path.trim_start_matches('/')).map_err(invalid)
}

pub(crate) fn missing_credentials(source: ImageSource, env_var: &'static str) -> ProviderError {
    ProviderError::new(source, ProviderErrorKind::MissingCredentials { env_var })
}

/// Accept ids sent either as JSON strings or as integers
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Item {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[test]
    fn test_deserialize_id_accepts_string_and_number() {
        let text: Item = serde_json::from_str(r#"{"id": "abc-123"}"#).unwrap();
        assert_eq!(text.id, "abc-123");

        let number: Item = serde_json::from_str(r#"{"id": 195893}"#).unwrap();
        assert_eq!(number.id, "195893");
    }

    #[test]
    fn test_deserialize_id_rejects_other_types() {
        assert!(serde_json::from_str::<Item>(r#"{"id": [1]}"#).is_err());
    }

    #[test]
    fn test_endpoint_joins_path() {
        let url = endpoint(ImageSource::Pixabay, "http://127.0.0.1:9000", "/api/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let url = endpoint(ImageSource::Unsplash, "http://proxy.local/unsplash", "/photos").unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/unsplash/photos");

        let url = endpoint(ImageSource::Pixabay, "http://proxy.local/pixabay/", "/api/").unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/pixabay/api/");

        let url = endpoint(
            ImageSource::Storyblocks,
            "http://proxy.local/sb",
            "/api/v2/images/search",
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/sb/api/v2/images/search");
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        let err = endpoint(ImageSource::Unsplash, "not a url", "/photos").unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::Request(_)));
        assert_eq!(err.provider, ImageSource::Unsplash);
    }
}
