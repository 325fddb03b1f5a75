//! Nominatim geocoding provider

use super::provider::GeocodeProvider;
use crate::config::NominatimConfig;
use crate::error::{Error, Result};
use crate::store::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Place name resolution against the Nominatim search API
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    /// Build from config. Nominatim requires an identifying User-Agent.
    pub fn new(config: NominatimConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }
}

// Nominatim returns lat/lon as strings
#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

fn first_hit_coordinates(hits: &[SearchHit]) -> Result<Option<Coordinates>> {
    let Some(hit) = hits.first() else {
        return Ok(None);
    };
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|_| Error::Provider(format!("unparseable latitude {:?}", hit.lat)))?;
    let lon = hit
        .lon
        .parse::<f64>()
        .map_err(|_| Error::Provider(format!("unparseable longitude {:?}", hit.lon)))?;
    Ok(Some(Coordinates { lat, lon }))
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let hits: Vec<SearchHit> = response.json().await?;
        first_hit_coordinates(&hits)
    }
}
