//! Wayfarer - offline-first AI tour guide
//!
//! A CLI that fetches travel suggestions, photos and maps for a city and
//! can pin any city into a local offline store for network-free use.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer::config::WayfarerConfig;
use wayfarer::fetch::ArtifactDownloader;
use wayfarer::probe::{ConnectivityProbe, Mode};
use wayfarer::providers::{
    NominatimGeocoder, OpenAiSpeech, OpenAiTextProvider, OsmStaticMap, UnsplashImageProvider,
};
use wayfarer::router::{RequestRouter, SearchOutcome, Source};
use wayfarer::store::{OfflineStore, PlaceKey};

#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(version)]
#[command(about = "Offline-first AI tour guide")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WAYFARER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Online/offline mode
    #[arg(long, value_enum, default_value = "auto")]
    mode: Mode,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a city for suggestions in a category
    Search {
        /// City name
        city: String,

        /// Suggestion category (places, food, culture, hotels, ...)
        #[arg(short = 'C', long, default_value = "places")]
        category: String,

        /// Speak the suggestions (writes an MP3 into the data directory)
        #[arg(long)]
        speak: bool,
    },

    /// Download a city's content into the offline store
    Save {
        /// City name
        city: String,

        /// Suggestion category (places, food, culture, hotels, ...)
        #[arg(short = 'C', long, default_value = "places")]
        category: String,
    },

    /// Remove a cached city and its files
    Remove {
        /// City name or key
        city: String,
    },

    /// List cached cities
    List,

    /// Run diagnostics
    Doctor,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("wayfarer={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        WayfarerConfig::load(config_path)?
    } else {
        WayfarerConfig::default()
    };
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    match cli.command {
        Commands::Search { city, category, speak } => {
            run_search(&config, cli.mode, &city, &category, speak).await?;
        }
        Commands::Save { city, category } => {
            run_save(&config, cli.mode, &city, &category).await?;
        }
        Commands::Remove { city } => {
            run_remove(&config, &city).await?;
        }
        Commands::List => {
            run_list(&config).await?;
        }
        Commands::Doctor => {
            run_doctor(&config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

/// Wire the store, probe and whatever providers have keys into a router.
async fn build_router(config: &WayfarerConfig, mode: Mode) -> Result<RequestRouter> {
    let timeout = Duration::from_secs(config.network.request_timeout_secs);

    let downloader = Arc::new(ArtifactDownloader::new(timeout)?);
    let renderer = Arc::new(OsmStaticMap::new(config.providers.staticmap.clone(), timeout)?);
    let store = Arc::new(OfflineStore::open(&config.storage.data_dir, downloader, renderer).await?);
    let probe = ConnectivityProbe::new(
        config.network.probe_endpoint.clone(),
        Duration::from_secs(config.network.probe_timeout_secs),
    )?;

    let mut router = RequestRouter::new(store, probe, mode)
        .photo_count(config.providers.photo_count)
        .with_geocoder(Arc::new(NominatimGeocoder::new(
            config.providers.nominatim.clone(),
            timeout,
        )?));

    // keyed providers are optional: no key just means the feature is off
    match OpenAiTextProvider::new(config.providers.openai.clone(), timeout) {
        Ok(provider) => router = router.with_text_provider(Arc::new(provider)),
        Err(e) => tracing::debug!("Text provider disabled: {}", e),
    }
    match OpenAiSpeech::new(config.providers.openai.clone(), timeout) {
        Ok(provider) => router = router.with_speech(Arc::new(provider)),
        Err(e) => tracing::debug!("Speech synthesis disabled: {}", e),
    }
    match UnsplashImageProvider::new(config.providers.unsplash.clone(), timeout) {
        Ok(provider) => router = router.with_image_provider(Arc::new(provider)),
        Err(e) => tracing::debug!("Photo search disabled: {}", e),
    }

    Ok(router)
}

async fn run_search(
    config: &WayfarerConfig,
    mode: Mode,
    city: &str,
    category: &str,
    speak: bool,
) -> Result<()> {
    let router = build_router(config, mode).await?;
    let outcome = router.search(city, category).await?;

    print_outcome(city, category, &outcome);

    if speak && !outcome.suggestions.is_empty() {
        let text = outcome
            .suggestions
            .iter()
            .map(|s| format!("{}. {}", s.name, s.description))
            .collect::<Vec<_>>()
            .join(" ");
        match router.speak(&text).await {
            Ok(audio) => {
                let path = config.storage.data_dir.join(format!(
                    "{}.mp3",
                    PlaceKey::normalize(city).map(|k| k.to_string()).unwrap_or_default()
                ));
                tokio::fs::write(&path, audio).await?;
                println!();
                println!("Audio written to {}", path.display());
            }
            Err(e) => println!("Speech unavailable: {}", e),
        }
    }

    Ok(())
}

fn print_outcome(city: &str, category: &str, outcome: &SearchOutcome) {
    match outcome.source {
        Source::Online => println!("{} — {} (live)", city, category),
        Source::Offline => println!("{} — {} (from offline store)", city, category),
        Source::Fallback => println!("{} — {} (fallback, no provider content)", city, category),
        Source::NotCached => {
            println!(
                "{} is not available offline. Go online and use `wayfarer save` to download it.",
                city
            );
            return;
        }
    }

    println!();
    if outcome.suggestions.is_empty() {
        println!("No stored suggestions for this category.");
    }
    for suggestion in &outcome.suggestions {
        println!("* {}", suggestion.name);
        println!("  {}", suggestion.description);
        if !suggestion.tip.is_empty() {
            println!("  Tip: {}", suggestion.tip);
        }
    }

    if let Some(coords) = outcome.coordinates {
        println!();
        println!("Location: {:.4}, {:.4}", coords.lat, coords.lon);
    }

    if !outcome.image_urls.is_empty() {
        println!();
        println!("Photos:");
        for url in &outcome.image_urls {
            println!("  {}", url);
        }
    }

    if let Some(record) = &outcome.cached {
        if !record.images.is_empty() {
            println!();
            println!("Cached photos:");
            for path in &record.images {
                println!("  {}", path.display());
            }
        }
        if let Some(map) = &record.map_image {
            println!("Cached map: {}", map.display());
        }
    }
}

async fn run_save(config: &WayfarerConfig, mode: Mode, city: &str, category: &str) -> Result<()> {
    let router = build_router(config, mode).await?;
    let key = router.save_for_offline(city, category).await?;

    let record = router.store().get(&key).await;
    println!("Saved {} (key: {})", city, key);
    if let Some(record) = record {
        println!(
            "  {} categories, {} photos, map {}",
            record.categories.len(),
            record.images.len(),
            if record.map_image.is_some() { "yes" } else { "no" },
        );
    }
    Ok(())
}

async fn run_remove(config: &WayfarerConfig, city: &str) -> Result<()> {
    let router = build_router(config, Mode::ForceOffline).await?;
    router.remove(city).await?;
    println!("Removed {}", city);
    Ok(())
}

async fn run_list(config: &WayfarerConfig) -> Result<()> {
    let router = build_router(config, Mode::ForceOffline).await?;

    let keys = router.list().await;
    if keys.is_empty() {
        println!("No cities stored offline yet.");
        return Ok(());
    }

    println!("Offline cities:");
    for key in keys {
        if let Some(record) = router.store().get(&key).await {
            println!(
                "  {} ({}: {} categories, {} photos)",
                record.display_name,
                key,
                record.categories.len(),
                record.images.len(),
            );
        }
    }
    Ok(())
}

async fn run_doctor(config: &WayfarerConfig) -> Result<()> {
    println!("Wayfarer doctor");
    println!();

    println!("Checking storage...");
    let data_dir = &config.storage.data_dir;
    if data_dir.exists() {
        println!("  ✓ Data directory: {}", data_dir.display());
    } else {
        println!("  ℹ Data directory {} will be created on first use", data_dir.display());
    }

    let router = build_router(config, Mode::ForceOffline).await?;
    println!("  ✓ Offline index loaded: {} places", router.store().record_count().await);

    println!();
    println!("Checking network...");
    let probe = ConnectivityProbe::new(
        config.network.probe_endpoint.clone(),
        Duration::from_secs(config.network.probe_timeout_secs),
    )?;
    if probe.is_online().await {
        println!("  ✓ Online ({} reachable)", config.network.probe_endpoint);
    } else {
        println!("  ✗ Offline ({} unreachable)", config.network.probe_endpoint);
    }

    println!();
    println!("Checking providers...");
    let timeout = Duration::from_secs(config.network.request_timeout_secs);
    match OpenAiTextProvider::new(config.providers.openai.clone(), timeout) {
        Ok(_) => println!("  ✓ Text suggestions (OpenAI key present)"),
        Err(_) => println!("  ✗ Text suggestions disabled (no OpenAI key)"),
    }
    match UnsplashImageProvider::new(config.providers.unsplash.clone(), timeout) {
        Ok(_) => println!("  ✓ Photo search (Unsplash key present)"),
        Err(_) => println!("  ✗ Photo search disabled (no Unsplash key)"),
    }
    println!("  ✓ Geocoding via {}", config.providers.nominatim.base_url);
    println!("  ✓ Maps via {}", config.providers.staticmap.base_url);

    println!();
    println!("Doctor check complete!");
    Ok(())
}

fn show_config(config: Option<&WayfarerConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
