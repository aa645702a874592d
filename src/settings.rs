use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::session::Backend;

/// Runtime settings, read from `CATALOG_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause after loading a listing page.
    pub get_delay_ms: u64,
    /// Pause after each click on a listing page.
    pub click_delay_ms: u64,
    /// Pause after loading a problem detail page.
    pub detail_delay_ms: u64,
    /// Pause after loading a fixed-topic listing page.
    pub listing_delay_ms: u64,
    pub backend: Backend,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            get_delay_ms: 5000,
            click_delay_ms: 1000,
            detail_delay_ms: 3000,
            listing_delay_ms: 1000,
            backend: Backend::Spider,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("CATALOG").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .context("Invalid CATALOG_* settings")
    }

    pub fn delays(&self) -> Delays {
        Delays {
            get: Duration::from_millis(self.get_delay_ms),
            click: Duration::from_millis(self.click_delay_ms),
            detail: Duration::from_millis(self.detail_delay_ms),
            listing: Duration::from_millis(self.listing_delay_ms),
        }
    }
}

/// Fixed waits handed to the page session.
#[derive(Debug, Clone, Copy)]
pub struct Delays {
    pub get: Duration,
    pub click: Duration,
    pub detail: Duration,
    pub listing: Duration,
}

#[cfg(test)]
impl Delays {
    pub const NONE: Delays = Delays {
        get: Duration::ZERO,
        click: Duration::ZERO,
        detail: Duration::ZERO,
        listing: Duration::ZERO,
    };
}
