//! Artifact download engine
//!
//! Fetches remote photo and map bytes with bounded timeouts and turns every
//! failure (timeout, non-2xx status, undecodable payload) into a typed
//! error value, so one bad URL never aborts a batch.

mod downloader;

pub use downloader::{save_jpeg, ArtifactDownloader, ArtifactFetcher};
