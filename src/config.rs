//! Wayfarer configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Wayfarer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WayfarerConfig {
    /// Storage layout
    #[serde(default)]
    pub storage: StorageConfig,

    /// Network probing and timeouts
    #[serde(default)]
    pub network: NetworkConfig,

    /// Content provider configurations
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl WayfarerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for the index, downloaded photos and rendered maps
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Default data directory (~/.wayfarer)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wayfarer")
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout for provider calls and artifact downloads, seconds
    pub request_timeout_secs: u64,

    /// Endpoint probed to decide online vs. offline in auto mode
    pub probe_endpoint: String,

    /// Probe timeout, seconds
    pub probe_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            probe_endpoint: "https://www.google.com".to_string(),
            probe_timeout_secs: 2,
        }
    }
}

/// Content provider configurations
///
/// Keyless providers (Nominatim, the OSM static map service) are always
/// available. Keyed providers (OpenAI, Unsplash) are enabled only when a
/// key is present in the config or the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// OpenAI text and speech config
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Unsplash photo search config
    #[serde(default)]
    pub unsplash: UnsplashConfig,

    /// Nominatim geocoder config
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// Static map renderer config
    #[serde(default)]
    pub staticmap: StaticMapConfig,

    /// Photos fetched per place
    pub photo_count: usize,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig::default(),
            unsplash: UnsplashConfig::default(),
            nominatim: NominatimConfig::default(),
            staticmap: StaticMapConfig::default(),
            photo_count: 3,
        }
    }
}

/// OpenAI provider config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key; falls back to the `OPENAI_API_KEY` environment variable
    pub api_key: Option<String>,

    /// Chat model used for suggestions
    pub model: String,

    /// API base URL
    pub base_url: String,

    /// Speech synthesis model
    pub speech_model: String,

    /// Speech synthesis voice
    pub voice: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
        }
    }
}

/// Unsplash provider config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsplashConfig {
    /// Access key; falls back to the `UNSPLASH_ACCESS_KEY` environment variable
    pub access_key: Option<String>,

    /// API base URL
    pub base_url: String,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: "https://api.unsplash.com".to_string(),
        }
    }
}

/// Nominatim geocoder config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    /// API base URL
    pub base_url: String,

    /// User-Agent sent with geocoding requests (required by Nominatim)
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "wayfarer/0.1".to_string(),
        }
    }
}

/// Static map renderer config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticMapConfig {
    /// Static map endpoint
    pub base_url: String,

    /// Map zoom level
    pub zoom: u8,

    /// Map width, pixels
    pub width: u32,

    /// Map height, pixels
    pub height: u32,
}

impl Default for StaticMapConfig {
    fn default() -> Self {
        Self {
            base_url: "https://staticmap.openstreetmap.de/staticmap.php".to_string(),
            zoom: 12,
            width: 800,
            height: 400,
        }
    }
}
