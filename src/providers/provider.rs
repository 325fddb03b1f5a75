//! Provider interfaces

use crate::error::{Error, Result};
use crate::store::{Coordinates, Suggestion};
use async_trait::async_trait;

/// Text suggestions for a place and category
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Fetch suggestion items for a place and category
    async fn suggestions(&self, place: &str, category: &str) -> Result<Vec<Suggestion>>;
}

/// Remote photo discovery for a place
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Remote photo URLs for a place, at most `count`
    async fn image_urls(&self, place: &str, count: usize) -> Result<Vec<String>>;
}

/// Place name to coordinates resolution
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Coordinates for a place name; `None` when the place is unknown
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>>;
}

/// Raster map rendering for coordinates
#[async_trait]
pub trait MapRenderer: Send + Sync {
    /// Raster map bytes (PNG or JPEG) centered on the coordinates
    async fn render(&self, coords: Coordinates) -> Result<Vec<u8>>;
}

/// Text-to-speech synthesis
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Audio bytes for the spoken text
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Resolve an API key from config, falling back to an environment variable.
pub(crate) fn resolve_api_key(configured: Option<&str>, env_var: &str) -> Result<String> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| Error::Config(format!("no API key configured and {} is not set", env_var)))
}
