//! Wayfarer - Offline-first AI tour guide
//!
//! Wayfarer answers "what should I see, eat or do in <city>" with
//! suggestions from an LLM, photos from an image search API, coordinates
//! from a geocoder and a static map render, and keeps everything it
//! fetched in a local offline store so the same city can be served again
//! with no network at all.
//!
//! ## Architecture
//!
//! ```text
//! user request ──▶ RequestRouter ──▶ (online) content providers ──▶ OfflineStore.upsert_category
//!                       │                                                    │
//!                       │            ┌──────────────┐                        ▼
//!                       └──────────▶ │ OfflineStore │ ◀── offline_data.json + images/ + maps/
//!                         (offline)  └──────────────┘
//! ```
//!
//! The store is the authoritative owner of the durable JSON index and of
//! every downloaded photo and rendered map; providers are narrow seams
//! that may be absent or failing at any time, and the router degrades
//! through cache and canned fallbacks instead of surfacing their errors.
//!
//! ## Modules
//!
//! - [`store`]: offline place cache (index, records, keys, placeholder maps)
//! - [`fetch`]: bounded-timeout artifact downloader
//! - [`providers`]: LLM, photo search, geocoding, static map and speech adapters
//! - [`router`]: online/offline request routing
//! - [`probe`]: connectivity probe and mode selection
//! - [`config`]: configuration management

pub mod config;
pub mod error;
pub mod fetch;
pub mod probe;
pub mod providers;
pub mod router;
pub mod store;

pub use config::WayfarerConfig;
pub use error::{Error, Result};
pub use router::{RequestRouter, SearchOutcome, Source};
pub use store::{Coordinates, OfflineStore, PlaceKey, PlaceRecord, Suggestion};
