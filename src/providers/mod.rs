//! Content provider adapters
//!
//! Narrow interfaces over the external services the guide consumes: LLM
//! text suggestions, photo search, geocoding, static map rendering and
//! speech synthesis. Every provider is optional at runtime, and every
//! provider failure is a typed error for the router to decide on.

mod nominatim;
mod openai;
mod provider;
mod staticmap;
mod unsplash;

pub use nominatim::NominatimGeocoder;
pub use openai::{OpenAiSpeech, OpenAiTextProvider};
pub use provider::{GeocodeProvider, ImageProvider, MapRenderer, SpeechSynthesizer, TextProvider};
pub use staticmap::OsmStaticMap;
pub use unsplash::UnsplashImageProvider;
