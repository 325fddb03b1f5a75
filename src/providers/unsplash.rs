//! Unsplash photo search provider

use super::provider::{resolve_api_key, ImageProvider};
use crate::config::UnsplashConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Photo URL search against the Unsplash API
pub struct UnsplashImageProvider {
    config: UnsplashConfig,
    access_key: String,
    client: reqwest::Client,
}

impl UnsplashImageProvider {
    /// Build from config; the access key comes from the config or the
    /// `UNSPLASH_ACCESS_KEY` environment variable.
    pub fn new(config: UnsplashConfig, timeout: Duration) -> Result<Self> {
        let access_key = resolve_api_key(config.access_key.as_deref(), ACCESS_KEY_ENV)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, access_key, client })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    // results occasionally omit the urls block; skip those instead of
    // failing the whole response
    urls: Option<PhotoUrls>,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

fn collect_urls(results: Vec<SearchResult>, count: usize) -> Vec<String> {
    results
        .into_iter()
        .filter_map(|result| result.urls.map(|urls| urls.regular))
        .take(count)
        .collect()
}

#[async_trait]
impl ImageProvider for UnsplashImageProvider {
    async fn image_urls(&self, place: &str, count: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.config.base_url))
            .query(&[
                ("query", place.to_string()),
                ("per_page", count.to_string()),
                ("orientation", "landscape".to_string()),
                ("client_id", self.access_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: SearchResponse = response.json().await?;
        Ok(collect_urls(parsed.results, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_urls_skips_missing_blocks() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"results": [
                {"urls": {"regular": "https://images.example/a.jpg", "small": "x"}},
                {"description": "no urls here"},
                {"urls": {"regular": "https://images.example/b.jpg"}}
            ]}"#,
        )
        .unwrap();

        let urls = collect_urls(parsed.results, 3);
        assert_eq!(urls, vec![
            "https://images.example/a.jpg".to_string(),
            "https://images.example/b.jpg".to_string(),
        ]);
    }

    #[test]
    fn test_collect_urls_respects_count() {
        let results = vec![
            SearchResult { urls: Some(PhotoUrls { regular: "a".to_string() }) },
            SearchResult { urls: Some(PhotoUrls { regular: "b".to_string() }) },
        ];
        assert_eq!(collect_urls(results, 1), vec!["a".to_string()]);
    }
}
