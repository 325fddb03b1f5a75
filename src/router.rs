//! Online/offline request routing
//!
//! Decides per interaction whether to call content providers or serve the
//! offline cache, and writes provider results back into the store when the
//! user asks to keep a place for offline use. Provider failures never
//! escalate past this module: online paths degrade to the cache and then
//! to canned fallback text.

use crate::error::{Error, Result};
use crate::probe::{ConnectivityProbe, Mode};
use crate::providers::{GeocodeProvider, ImageProvider, SpeechSynthesizer, TextProvider};
use crate::store::{Coordinates, OfflineStore, PlaceKey, PlaceRecord, Suggestion};
use std::sync::Arc;

/// Where a search result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Fresh provider content
    Online,
    /// Served from the offline store
    Offline,
    /// Canned fallback text; nothing cached, no provider content
    Fallback,
    /// Offline and the place is not in the store
    NotCached,
}

/// Outcome of a search interaction
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub source: Source,
    pub suggestions: Vec<Suggestion>,
    pub coordinates: Option<Coordinates>,
    /// Remote photo URLs discovered online (empty when served from cache)
    pub image_urls: Vec<String>,
    /// The cached record for this place, when one exists
    pub cached: Option<PlaceRecord>,
}

/// Routes user requests between content providers and the offline store
pub struct RequestRouter {
    store: Arc<OfflineStore>,
    probe: ConnectivityProbe,
    mode: Mode,
    text: Option<Arc<dyn TextProvider>>,
    images: Option<Arc<dyn ImageProvider>>,
    geocoder: Option<Arc<dyn GeocodeProvider>>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    photo_count: usize,
}

impl RequestRouter {
    /// Create a router with no providers attached
    pub fn new(store: Arc<OfflineStore>, probe: ConnectivityProbe, mode: Mode) -> Self {
        Self {
            store,
            probe,
            mode,
            text: None,
            images: None,
            geocoder: None,
            speech: None,
            photo_count: 3,
        }
    }

    /// Attach a text suggestion provider
    pub fn with_text_provider(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.text = Some(provider);
        self
    }

    /// Attach a photo search provider
    pub fn with_image_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.images = Some(provider);
        self
    }

    /// Attach a geocoder
    pub fn with_geocoder(mut self, provider: Arc<dyn GeocodeProvider>) -> Self {
        self.geocoder = Some(provider);
        self
    }

    /// Attach a speech synthesizer
    pub fn with_speech(mut self, provider: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(provider);
        self
    }

    /// Set how many photos to look up per place
    pub fn photo_count(mut self, count: usize) -> Self {
        self.photo_count = count;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &OfflineStore {
        &self.store
    }

    /// Run a search interaction for a city and category.
    pub async fn search(&self, city: &str, category: &str) -> Result<SearchOutcome> {
        let key =
            PlaceKey::normalize(city).ok_or_else(|| Error::InvalidPlace(city.to_string()))?;

        if !self.mode.resolve(&self.probe).await {
            return Ok(self.from_cache(&key, category).await);
        }

        let (suggestions, coordinates, image_urls) = self.gather_online(city, category).await;

        match suggestions {
            Some(items) => Ok(SearchOutcome {
                source: Source::Online,
                suggestions: items,
                coordinates,
                image_urls,
                cached: self.store.get(&key).await,
            }),
            None => {
                // provider gave nothing: consult the cache before falling
                // back to canned text
                let cached = self.from_cache(&key, category).await;
                if cached.source == Source::Offline {
                    Ok(SearchOutcome {
                        coordinates: cached.coordinates.or(coordinates),
                        image_urls,
                        ..cached
                    })
                } else {
                    Ok(SearchOutcome {
                        source: Source::Fallback,
                        suggestions: fallback_suggestions(city, category),
                        coordinates,
                        image_urls,
                        cached: None,
                    })
                }
            }
        }
    }

    /// Gather provider content for a place and persist it for offline use.
    ///
    /// Each provider degrades independently; missing text is replaced with
    /// the canned fallback so the stored record is never empty. Refused
    /// outright when the effective mode is offline.
    pub async fn save_for_offline(&self, city: &str, category: &str) -> Result<PlaceKey> {
        if !self.mode.resolve(&self.probe).await {
            return Err(Error::Provider(
                "network unavailable, cannot download for offline use".to_string(),
            ));
        }

        let (suggestions, coordinates, image_urls) = self.gather_online(city, category).await;
        let suggestions = suggestions.unwrap_or_else(|| fallback_suggestions(city, category));

        self.store
            .upsert_category(city, category, suggestions, coordinates, &image_urls)
            .await
    }

    /// Remove a cached place by name or key
    pub async fn remove(&self, city: &str) -> Result<()> {
        let key =
            PlaceKey::normalize(city).ok_or_else(|| Error::InvalidPlace(city.to_string()))?;
        self.store.remove(&key).await
    }

    /// Keys of all cached places
    pub async fn list(&self) -> Vec<PlaceKey> {
        self.store.list_keys().await
    }

    /// Synthesize spoken audio for a text block.
    pub async fn speak(&self, text: &str) -> Result<Vec<u8>> {
        if self.mode == Mode::ForceOffline {
            return Err(Error::Provider(
                "speech synthesis needs the network".to_string(),
            ));
        }
        let Some(speech) = &self.speech else {
            return Err(Error::Provider("no speech synthesizer configured".to_string()));
        };
        speech.synthesize(text).await
    }

    /// Call each configured provider, degrading independently on failure.
    async fn gather_online(
        &self,
        city: &str,
        category: &str,
    ) -> (Option<Vec<Suggestion>>, Option<Coordinates>, Vec<String>) {
        let coordinates = match &self.geocoder {
            Some(geocoder) => match geocoder.geocode(city).await {
                Ok(coords) => coords,
                Err(e) => {
                    tracing::warn!("Geocoding failed for {}: {}", city, e);
                    None
                }
            },
            None => None,
        };

        let suggestions = match &self.text {
            Some(provider) => match provider.suggestions(city, category).await {
                Ok(items) if !items.is_empty() => Some(items),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Text provider failed for {}: {}", city, e);
                    None
                }
            },
            None => None,
        };

        let image_urls = match &self.images {
            Some(provider) => match provider.image_urls(city, self.photo_count).await {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!("Photo search failed for {}: {}", city, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        (suggestions, coordinates, image_urls)
    }

    async fn from_cache(&self, key: &PlaceKey, category: &str) -> SearchOutcome {
        match self.store.get(key).await {
            Some(record) => SearchOutcome {
                source: Source::Offline,
                suggestions: record
                    .suggestions(category)
                    .map(<[Suggestion]>::to_vec)
                    .unwrap_or_default(),
                coordinates: record.coordinates(),
                image_urls: Vec::new(),
                cached: Some(record),
            },
            None => SearchOutcome {
                source: Source::NotCached,
                suggestions: Vec::new(),
                coordinates: None,
                image_urls: Vec::new(),
                cached: None,
            },
        }
    }
}

/// Canned suggestions used when no text provider result is available
fn fallback_suggestions(city: &str, category: &str) -> Vec<Suggestion> {
    vec![
        Suggestion {
            name: format!("{} 1", category),
            description: format!("Popular {} spot in {}.", category.to_lowercase(), city),
            tip: "Local tip.".to_string(),
        },
        Suggestion {
            name: format!("{} 2", category),
            description: "Another recommended place.".to_string(),
            tip: "Local tip.".to_string(),
        },
        Suggestion {
            name: format!("{} 3", category),
            description: "Hidden gem.".to_string(),
            tip: "Local tip.".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::fetch::ArtifactFetcher;
    use crate::providers::MapRenderer;

    struct StubFetcher;

    #[async_trait]
    impl ArtifactFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes> {
            let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
            let mut cursor = std::io::Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut cursor, image::ImageFormat::Png)
                .unwrap();
            Ok(Bytes::from(cursor.into_inner()))
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl MapRenderer for FailingRenderer {
        async fn render(&self, _coords: Coordinates) -> Result<Vec<u8>> {
            Err(Error::Provider("tile server down".to_string()))
        }
    }

    struct StubText {
        fail: bool,
    }

    #[async_trait]
    impl TextProvider for StubText {
        async fn suggestions(&self, place: &str, _category: &str) -> Result<Vec<Suggestion>> {
            if self.fail {
                return Err(Error::Provider("quota exceeded".to_string()));
            }
            Ok(vec![Suggestion {
                name: format!("{} highlight", place),
                description: "Worth a visit.".to_string(),
                tip: "Morning is quietest.".to_string(),
            }])
        }
    }

    /// Trips the test if any provider call reaches it
    struct PanickingText;

    #[async_trait]
    impl TextProvider for PanickingText {
        async fn suggestions(&self, _place: &str, _category: &str) -> Result<Vec<Suggestion>> {
            panic!("provider must not be called in forced-offline mode");
        }
    }

    struct StubGeocoder;

    #[async_trait]
    impl GeocodeProvider for StubGeocoder {
        async fn geocode(&self, _place: &str) -> Result<Option<Coordinates>> {
            Ok(Some(Coordinates { lat: 12.30, lon: 76.65 }))
        }
    }

    struct StubImages;

    #[async_trait]
    impl ImageProvider for StubImages {
        async fn image_urls(&self, _place: &str, count: usize) -> Result<Vec<String>> {
            Ok((0..count).map(|i| format!("http://photos.example/{}.jpg", i)).collect())
        }
    }

    fn dead_probe() -> ConnectivityProbe {
        ConnectivityProbe::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap()
    }

    async fn store_in(dir: &TempDir) -> Arc<OfflineStore> {
        Arc::new(
            OfflineStore::open(dir.path(), Arc::new(StubFetcher), Arc::new(FailingRenderer))
                .await
                .unwrap(),
        )
    }

    async fn seed(store: &OfflineStore) -> PlaceKey {
        store
            .upsert_category(
                "Mysore",
                "places",
                vec![Suggestion {
                    name: "Palace".to_string(),
                    description: "Royal residence.".to_string(),
                    tip: String::new(),
                }],
                Some(Coordinates { lat: 12.30, lon: 76.65 }),
                &[],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_force_offline_serves_cache_without_providers() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        seed(&store).await;

        let router = RequestRouter::new(store, dead_probe(), Mode::ForceOffline)
            .with_text_provider(Arc::new(PanickingText));

        let outcome = router.search("Mysore", "Places").await.unwrap();
        assert_eq!(outcome.source, Source::Offline);
        assert_eq!(outcome.suggestions[0].name, "Palace");
        assert!(outcome.coordinates.is_some());
    }

    #[tokio::test]
    async fn test_force_offline_uncached_place() {
        let dir = TempDir::new().unwrap();
        let router = RequestRouter::new(store_in(&dir).await, dead_probe(), Mode::ForceOffline);

        let outcome = router.search("Hampi", "Places").await.unwrap();
        assert_eq!(outcome.source, Source::NotCached);
        assert!(outcome.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_online_uses_providers() {
        let dir = TempDir::new().unwrap();
        let router = RequestRouter::new(store_in(&dir).await, dead_probe(), Mode::ForceOnline)
            .with_text_provider(Arc::new(StubText { fail: false }))
            .with_geocoder(Arc::new(StubGeocoder))
            .with_image_provider(Arc::new(StubImages))
            .photo_count(2);

        let outcome = router.search("Mysore", "Places").await.unwrap();
        assert_eq!(outcome.source, Source::Online);
        assert_eq!(outcome.suggestions[0].name, "Mysore highlight");
        assert_eq!(outcome.image_urls.len(), 2);
        assert!(outcome.coordinates.is_some());
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_cache() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        seed(&store).await;

        let router = RequestRouter::new(store, dead_probe(), Mode::ForceOnline)
            .with_text_provider(Arc::new(StubText { fail: true }));

        let outcome = router.search("Mysore", "places").await.unwrap();
        assert_eq!(outcome.source, Source::Offline);
        assert_eq!(outcome.suggestions[0].name, "Palace");
    }

    #[tokio::test]
    async fn test_provider_failure_without_cache_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let router = RequestRouter::new(store_in(&dir).await, dead_probe(), Mode::ForceOnline)
            .with_text_provider(Arc::new(StubText { fail: true }));

        let outcome = router.search("Hampi", "Food").await.unwrap();
        assert_eq!(outcome.source, Source::Fallback);
        assert_eq!(outcome.suggestions.len(), 3);
        assert!(outcome.suggestions[0].description.contains("food spot in Hampi"));
    }

    #[tokio::test]
    async fn test_auto_mode_with_dead_network_reads_cache() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        seed(&store).await;

        let router = RequestRouter::new(store, dead_probe(), Mode::Auto)
            .with_text_provider(Arc::new(PanickingText));

        let outcome = router.search("Mysore", "places").await.unwrap();
        assert_eq!(outcome.source, Source::Offline);
    }

    #[tokio::test]
    async fn test_save_for_offline_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let router = RequestRouter::new(store.clone(), dead_probe(), Mode::ForceOnline)
            .with_text_provider(Arc::new(StubText { fail: false }))
            .with_geocoder(Arc::new(StubGeocoder))
            .with_image_provider(Arc::new(StubImages))
            .photo_count(1);

        let key = router.save_for_offline("Mysore", "Places").await.unwrap();
        let record = store.get(&key).await.unwrap();
        assert_eq!(record.suggestions("places").unwrap()[0].name, "Mysore highlight");
        assert_eq!(record.images.len(), 1);
        // renderer is the failing stub, so the placeholder filled in
        assert!(record.map_image.is_some());
    }

    #[tokio::test]
    async fn test_save_for_offline_stores_fallback_when_text_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let router = RequestRouter::new(store.clone(), dead_probe(), Mode::ForceOnline)
            .with_text_provider(Arc::new(StubText { fail: true }));

        let key = router.save_for_offline("Hampi", "Places").await.unwrap();
        let record = store.get(&key).await.unwrap();
        assert_eq!(record.suggestions("places").unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_save_for_offline_refused_when_offline() {
        let dir = TempDir::new().unwrap();
        let router = RequestRouter::new(store_in(&dir).await, dead_probe(), Mode::ForceOffline);

        let result = router.save_for_offline("Mysore", "Places").await;
        assert!(matches!(result, Err(Error::Provider(_))));
    }

    #[tokio::test]
    async fn test_speak_refused_when_forced_offline() {
        let dir = TempDir::new().unwrap();
        let router = RequestRouter::new(store_in(&dir).await, dead_probe(), Mode::ForceOffline);

        assert!(router.speak("hello").await.is_err());
    }
}
