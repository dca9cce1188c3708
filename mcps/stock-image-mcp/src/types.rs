//! Common types for stock-image search results
//!
//! Every provider adapter maps its own response shape into
//! [`NormalizedImageResult`], so callers never see provider-specific JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProviderError;

/// The stock-image provider a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSource {
    Unsplash,
    Pixabay,
    Storyblocks,
}

impl ImageSource {
    /// All providers, in the order their results are concatenated
    pub const ALL: [ImageSource; 3] = [
        ImageSource::Unsplash,
        ImageSource::Pixabay,
        ImageSource::Storyblocks,
    ];

    /// Display name, also used as the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Unsplash => "Unsplash",
            ImageSource::Pixabay => "Pixabay",
            ImageSource::Storyblocks => "Storyblocks",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single image hit, normalized across providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedImageResult {
    /// Provider-assigned identifier (unique only within `source`)
    pub image_id: String,
    /// URL of a small preview image
    pub thumbnail_url: String,
    /// URL of a medium-resolution preview image
    pub preview_url: String,
    /// Descriptive text, when the provider supplies any
    pub title: Option<String>,
    /// Provider that produced this record
    pub source: ImageSource,
    /// Provider tags, empty when the provider has none
    pub tags: Vec<String>,
}

/// Combined outcome of one aggregated search
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedResults {
    /// The search term that was executed (trimmed)
    pub query: String,
    /// Records from every provider that succeeded, in provider order
    pub results: Vec<NormalizedImageResult>,
    /// One entry per provider that did not yield a usable result
    pub failures: Vec<ProviderError>,
}

impl AggregatedResults {
    /// Number of records contributed by `source`
    pub fn count_by_source(&self, source: ImageSource) -> usize {
        self.results.iter().filter(|r| r.source == source).count()
    }

    /// Whether every provider answered successfully
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
