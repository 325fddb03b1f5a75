//! HTTP artifact downloader

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("wayfarer/", env!("CARGO_PKG_VERSION"));

/// Byte and image fetching seam used by the offline store.
///
/// The store depends only on this trait; tests substitute stub fetchers.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch raw bytes from a URL
    async fn fetch(&self, url: &str) -> Result<Bytes>;

    /// Fetch and decode an image from a URL
    async fn fetch_image(&self, url: &str) -> Result<DynamicImage> {
        let bytes = self.fetch(url).await?;
        image::load_from_memory(&bytes)
            .map_err(|e| Error::Download(format!("undecodable image from {}: {}", url, e)))
    }
}

/// Reqwest-backed downloader with a bounded per-call timeout
pub struct ArtifactDownloader {
    client: reqwest::Client,
}

impl ArtifactDownloader {
    /// Create a downloader; every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactFetcher for ArtifactDownloader {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

/// Save a decoded image as an RGB JPEG at the given quality.
pub fn save_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let rgb = image.to_rgb8();
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
    rgb.write_with_encoder(encoder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct StaticFetcher(Vec<u8>);

    #[async_trait]
    impl ArtifactFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes> {
            Ok(Bytes::from(self.0.clone()))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([12, 34, 56]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[tokio::test]
    async fn test_fetch_image_decodes() {
        let fetcher = StaticFetcher(png_bytes());
        let img = fetcher.fetch_image("http://example/photo.png").await.unwrap();
        assert_eq!((img.width(), img.height()), (4, 4));
    }

    #[tokio::test]
    async fn test_fetch_image_rejects_garbage() {
        let fetcher = StaticFetcher(b"not an image".to_vec());
        let err = fetcher.fetch_image("http://example/bad").await.unwrap_err();
        assert!(matches!(err, Error::Download(_)));
    }

    #[test]
    fn test_save_jpeg_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 8, image::Rgb([200, 100, 50])));

        save_jpeg(&img, &path, 85).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (8, 8));
    }
}
