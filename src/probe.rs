//! Network connectivity probe and mode selection

use crate::error::Result;
use clap::ValueEnum;
use std::time::Duration;

/// Online/offline operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Probe the network and follow whatever it reports
    #[default]
    Auto,
    /// Always call providers, even if the probe would report offline
    ForceOnline,
    /// Never touch the network; serve cached content only
    ForceOffline,
}

impl Mode {
    /// Effective online state. Only `Auto` consults the probe.
    pub async fn resolve(self, probe: &ConnectivityProbe) -> bool {
        match self {
            Mode::Auto => probe.is_online().await,
            Mode::ForceOnline => true,
            Mode::ForceOffline => false,
        }
    }
}

/// Best-effort reachability check against a known endpoint
pub struct ConnectivityProbe {
    endpoint: String,
    client: reqwest::Client,
}

impl ConnectivityProbe {
    /// Create a probe for `endpoint` with a bounded timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// True when the endpoint answered at all; false on any error.
    pub async fn is_online(&self) -> bool {
        self.client.get(&self.endpoint).send().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on the discard port, so the probe fails fast without
    // leaving the machine.
    fn dead_probe() -> ConnectivityProbe {
        ConnectivityProbe::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap()
    }

    #[tokio::test]
    async fn test_auto_follows_probe() {
        assert!(!Mode::Auto.resolve(&dead_probe()).await);
    }

    #[tokio::test]
    async fn test_forced_modes_skip_probe() {
        assert!(Mode::ForceOnline.resolve(&dead_probe()).await);
        assert!(!Mode::ForceOffline.resolve(&dead_probe()).await);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_offline() {
        assert!(!dead_probe().is_online().await);
    }
}
