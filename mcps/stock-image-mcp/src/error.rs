//! Error types for provider adapters and the aggregator
//!
//! A [`ProviderError`] never aborts an aggregated search: it is collected next
//! to the successful results so the caller can see which provider failed and
//! why.

use serde::Serialize;
use thiserror::Error;

use crate::types::ImageSource;

/// A provider request that did not yield a usable result
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{provider} search failed: {kind}")]
pub struct ProviderError {
    /// Provider whose request failed
    pub provider: ImageSource,
    /// What went wrong
    #[serde(flatten)]
    pub kind: ProviderErrorKind,
}

/// Failure categories for a single provider request
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Connection, TLS or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// The body was not the JSON shape the provider documents
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The provider answered with a non-200 status
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// The request did not complete before the deadline
    #[error("request timed out")]
    Timeout,

    /// The provider's credentials are not configured
    #[error("credentials not configured (set {env_var})")]
    MissingCredentials {
        /// Environment variable that supplies the missing key
        env_var: &'static str,
    },

    /// The request could not be built (e.g. a malformed endpoint URL)
    #[error("invalid request: {0}")]
    Request(String),
}

impl ProviderError {
    pub fn new(provider: ImageSource, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }

    /// Classify a transport-level reqwest failure
    pub fn from_reqwest(provider: ImageSource, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else if err.is_decode() {
            ProviderErrorKind::Decode(err.to_string())
        } else if err.is_builder() {
            ProviderErrorKind::Request(err.to_string())
        } else {
            ProviderErrorKind::Network(err.to_string())
        };
        Self::new(provider, kind)
    }

    pub fn decode(provider: ImageSource, err: serde_json::Error) -> Self {
        Self::new(provider, ProviderErrorKind::Decode(err.to_string()))
    }

    pub fn status(provider: ImageSource, code: u16) -> Self {
        Self::new(provider, ProviderErrorKind::HttpStatus(code))
    }
}

/// Errors that reject an aggregated search before any provider is called
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The search term was empty or whitespace only
    #[error("search term must not be empty")]
    EmptyTerm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_provider_and_status() {
        let err = ProviderError::status(ImageSource::Pixabay, 500);
        assert_eq!(
            err.to_string(),
            "Pixabay search failed: unexpected HTTP status 500"
        );
    }

    #[test]
    fn test_serializes_flat_with_kind_tag() {
        let err = ProviderError::status(ImageSource::Storyblocks, 403);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "provider": "Storyblocks",
                "kind": "http_status",
                "detail": 403
            })
        );

        let timeout = ProviderError::new(ImageSource::Unsplash, ProviderErrorKind::Timeout);
        let json = serde_json::to_value(&timeout).unwrap();
        assert_eq!(json["kind"], "timeout");
    }

    #[test]
    fn test_decode_error_keeps_serde_message() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ProviderError::decode(ImageSource::Unsplash, serde_err);
        assert!(matches!(err.kind, ProviderErrorKind::Decode(ref msg) if !msg.is_empty()));
    }
}
