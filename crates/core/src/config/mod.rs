use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{PlayerUiError, Result};

/// Top-level configuration structure for the helpers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub marquee: MarqueeConfig,
    pub skip: SkipConfig,
}

impl AppConfig {
    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(?path, "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.marquee.validate()?;
        self.skip.validate()
    }
}

/// Timing of scrolling marquee text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Horizontal scroll speed.
    pub speed_px_per_sec: f64,
    /// Pause added at the end of every cycle before the rendezvous.
    pub edge_pause_secs: f64,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            speed_px_per_sec: 40.0,
            edge_pause_secs: 1.0,
        }
    }
}

impl MarqueeConfig {
    fn validate(&self) -> Result<()> {
        if self.speed_px_per_sec.is_nan() || self.speed_px_per_sec <= 0.0 {
            return Err(PlayerUiError::InvalidInput(
                "marquee speed must be positive",
            ));
        }
        if self.edge_pause_secs.is_nan() || self.edge_pause_secs < 0.0 {
            return Err(PlayerUiError::InvalidInput(
                "marquee edge pause cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Configuration of the skip/seek accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    /// How long an accumulated seek position stays authoritative.
    pub reset_after_ms: u64,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            reset_after_ms: 2_000,
        }
    }
}

impl SkipConfig {
    pub fn reset_after(&self) -> Duration {
        Duration::from_millis(self.reset_after_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.reset_after_ms == 0 {
            return Err(PlayerUiError::InvalidInput(
                "skip reset window must be non-zero",
            ));
        }
        Ok(())
    }
}
