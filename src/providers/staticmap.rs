//! OpenStreetMap static map renderer

use super::provider::MapRenderer;
use crate::config::StaticMapConfig;
use crate::error::Result;
use crate::store::Coordinates;
use async_trait::async_trait;
use std::time::Duration;

/// Static map fetcher against an OSM staticmap endpoint
pub struct OsmStaticMap {
    config: StaticMapConfig,
    client: reqwest::Client,
}

impl OsmStaticMap {
    /// Build from config with a bounded request timeout.
    pub fn new(config: StaticMapConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }

    fn map_url(&self, coords: Coordinates) -> String {
        format!(
            "{}?center={},{}&zoom={}&size={}x{}&markers={},{},red-pushpin",
            self.config.base_url,
            coords.lat,
            coords.lon,
            self.config.zoom,
            self.config.width,
            self.config.height,
            coords.lat,
            coords.lon,
        )
    }
}

#[async_trait]
impl MapRenderer for OsmStaticMap {
    async fn render(&self, coords: Coordinates) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.map_url(coords))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
