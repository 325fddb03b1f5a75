//! Offline place store with file-based JSON persistence
//!
//! Directory layout:
//! ```text
//! <data_dir>/
//! ├── offline_data.json
//! ├── images/
//! │   ├── <key>-<millis>-<seq>.jpg
//! │   └── ...
//! └── maps/
//!     └── <key>_map.png
//! ```
//!
//! The store is the only writer of the index file, and every mutation
//! rewrites it in full. Photo and map files are owned by the record that
//! references them and are deleted with it.

use crate::error::{Error, Result};
use crate::fetch::{save_jpeg, ArtifactFetcher};
use crate::providers::MapRenderer;
use crate::store::key::PlaceKey;
use crate::store::placeholder::placeholder_map;
use crate::store::record::{Coordinates, PlaceRecord, Suggestion};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

const INDEX_FILE: &str = "offline_data.json";
const IMAGES_DIR: &str = "images";
const MAPS_DIR: &str = "maps";
const JPEG_QUALITY: u8 = 85;
const PLACEHOLDER_WIDTH: u32 = 800;
const PLACEHOLDER_HEIGHT: u32 = 400;

/// Offline place cache backed by a single JSON index
pub struct OfflineStore {
    data_dir: PathBuf,
    index_path: PathBuf,
    images_dir: PathBuf,
    maps_dir: PathBuf,
    fetcher: Arc<dyn ArtifactFetcher>,
    renderer: Arc<dyn MapRenderer>,
    index: Arc<RwLock<BTreeMap<PlaceKey, PlaceRecord>>>,
    download_seq: AtomicU64,
}

impl OfflineStore {
    /// Open (or create) a store rooted at `data_dir`.
    ///
    /// A corrupted index never fails the open: unparseable or wrong-shaped
    /// files load as empty, individually malformed entries are dropped, and
    /// the cleaned index is written straight back.
    pub async fn open(
        data_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn ArtifactFetcher>,
        renderer: Arc<dyn MapRenderer>,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        let images_dir = data_dir.join(IMAGES_DIR);
        let maps_dir = data_dir.join(MAPS_DIR);
        tokio::fs::create_dir_all(&images_dir).await?;
        tokio::fs::create_dir_all(&maps_dir).await?;

        let index_path = data_dir.join(INDEX_FILE);
        let index = load_index(&index_path).await;

        let store = Self {
            data_dir,
            index_path,
            images_dir,
            maps_dir,
            fetcher,
            renderer,
            index: Arc::new(RwLock::new(index)),
            download_seq: AtomicU64::new(0),
        };
        store.persist().await?;
        Ok(store)
    }

    /// Merge one category's suggestions, and optionally coordinates and
    /// photo URLs, into a place record, downloading artifacts as needed.
    ///
    /// Artifact failures degrade: a failed photo download skips that URL, a
    /// failed map render substitutes the deterministic placeholder. Only the
    /// final index write can fail the call; by then the record is already
    /// merged in memory.
    pub async fn upsert_category(
        &self,
        display_name: &str,
        category: &str,
        suggestions: Vec<Suggestion>,
        coordinates: Option<Coordinates>,
        image_urls: &[String],
    ) -> Result<PlaceKey> {
        let key = PlaceKey::normalize(display_name)
            .ok_or_else(|| Error::InvalidPlace(display_name.to_string()))?;

        let mut record = {
            let index = self.index.read().await;
            index
                .get(&key)
                .cloned()
                .unwrap_or_else(|| PlaceRecord::new(display_name))
        };
        record.display_name = display_name.to_string();
        record.categories.insert(category.to_lowercase(), suggestions);
        record.set_coordinates(coordinates);

        for url in image_urls {
            match self.download_photo(&key, url).await {
                Ok(path) => record.images.push(path),
                Err(e) => tracing::warn!("Skipping photo {} for {}: {}", url, key, e),
            }
        }

        if let Some(coords) = record.coordinates() {
            record.map_image = Some(self.write_map(&key, &record.display_name, coords).await);
        }

        {
            let mut index = self.index.write().await;
            index.insert(key.clone(), record);
        }
        self.persist().await?;
        Ok(key)
    }

    /// Look up a cached record. Absence means "not cached", not an error.
    pub async fn get(&self, key: &PlaceKey) -> Option<PlaceRecord> {
        self.index.read().await.get(key).cloned()
    }

    /// Remove a place and every file it references.
    ///
    /// File deletion is best-effort (a missing file is not an error) and
    /// removing an absent key is a no-op.
    pub async fn remove(&self, key: &PlaceKey) -> Result<()> {
        let removed = self.index.write().await.remove(key);
        let Some(record) = removed else {
            return Ok(());
        };

        for path in record.images.iter().chain(record.map_image.iter()) {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to delete {}: {}", path.display(), e);
                }
            }
        }
        self.persist().await
    }

    /// All cached place keys, sorted
    pub async fn list_keys(&self) -> Vec<PlaceKey> {
        self.index.read().await.keys().cloned().collect()
    }

    /// Number of cached places
    pub async fn record_count(&self) -> usize {
        self.index.read().await.len()
    }

    /// Root directory of the store
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Fetch one photo and write it as a uniquely named JPEG under the
    /// store's image directory. No partial file survives a failure.
    async fn download_photo(&self, key: &PlaceKey, url: &str) -> Result<PathBuf> {
        let image = self.fetcher.fetch_image(url).await?;
        // timestamp plus a process-wide sequence number, so repeated
        // downloads for the same place never collide
        let seq = self.download_seq.fetch_add(1, Ordering::Relaxed);
        let filename = format!("{}-{}-{}.jpg", key, chrono::Utc::now().timestamp_millis(), seq);
        let path = self.images_dir.join(filename);

        if let Err(e) = save_jpeg(&image, &path, JPEG_QUALITY) {
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }
        Ok(path)
    }

    /// Render the map for `coords` to the fixed per-key map path (repeated
    /// saves overwrite it), substituting the deterministic placeholder when
    /// the renderer fails. Always returns the map path.
    async fn write_map(&self, key: &PlaceKey, display_name: &str, coords: Coordinates) -> PathBuf {
        let path = self.maps_dir.join(format!("{}_map.png", key));

        match self.renderer.render(coords).await {
            Ok(bytes) => match tokio::fs::write(&path, &bytes).await {
                Ok(()) => return path,
                Err(e) => tracing::warn!("Failed to write map for {}: {}", key, e),
            },
            Err(e) => tracing::warn!("Map render failed for {}, using placeholder: {}", key, e),
        }

        let placeholder =
            placeholder_map(display_name, coords, PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
        if let Err(e) = placeholder.save_with_format(&path, image::ImageFormat::Png) {
            tracing::warn!("Failed to write placeholder map for {}: {}", key, e);
        }
        path
    }

    /// Rewrite the full index file. This is the only mutation failure that
    /// surfaces to callers: the record is merged in memory either way, but
    /// a failed flush must not masquerade as a completed save.
    async fn persist(&self) -> Result<()> {
        let index = self.index.read().await;
        let json = serde_json::to_string_pretty(&*index)?;
        tokio::fs::write(&self.index_path, json).await.map_err(|e| {
            Error::Store(format!("failed to write {}: {}", self.index_path.display(), e))
        })?;
        Ok(())
    }
}

/// Read and validate the durable index. Missing, unparseable or
/// wrong-shaped files all load as empty; entries that fail record
/// validation are dropped.
async fn load_index(path: &Path) -> BTreeMap<PlaceKey, PlaceRecord> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(_) => return BTreeMap::new(),
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unparseable offline index {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };
    let serde_json::Value::Object(entries) = value else {
        tracing::warn!("Offline index {} is not an object, starting empty", path.display());
        return BTreeMap::new();
    };

    let mut index = BTreeMap::new();
    for (raw_key, entry) in entries {
        let Some(key) = PlaceKey::normalize(&raw_key) else {
            tracing::warn!("Dropping index entry with unusable key {:?}", raw_key);
            continue;
        };
        match serde_json::from_value::<PlaceRecord>(entry) {
            Ok(record) => {
                index.insert(key, record);
            }
            Err(e) => tracing::warn!("Dropping malformed index entry {:?}: {}", raw_key, e),
        }
    }
    index
}
