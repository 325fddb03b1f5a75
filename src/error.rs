//! Wayfarer error types

use thiserror::Error;

/// Wayfarer error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Place name that normalizes to an empty key
    #[error("Invalid place name: {0:?}")]
    InvalidPlace(String),

    /// Content provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Artifact download error
    #[error("Download error: {0}")]
    Download(String),

    /// Offline store error
    #[error("Store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for Wayfarer operations
pub type Result<T> = std::result::Result<T, Error>;
