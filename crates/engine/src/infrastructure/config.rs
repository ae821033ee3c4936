//! Engine configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use holdfast_domain::{TierThresholds, WorldName};

/// Engine configuration loaded from environment
#[derive(Debug, Clone)]
pub struct TerritoryConfig {
    /// Path of the persisted territory document
    pub data_path: PathBuf,
    /// Protection tier breakpoints
    pub thresholds: TierThresholds,
    /// Background influence decay
    pub decay: DecayConfig,
    /// Worlds known to the standalone world directory
    pub worlds: Vec<WorldName>,
}

/// Influence decay worker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayConfig {
    /// Seconds between decay ticks
    pub interval_seconds: u64,
    /// Influence removed from every territory per tick (0 disables decay)
    pub points: u8,
}

impl DecayConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }

    pub fn is_enabled(&self) -> bool {
        self.points > 0
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            points: 0,
        }
    }
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/territories.json"),
            thresholds: TierThresholds::default(),
            decay: DecayConfig::default(),
            worlds: default_worlds(),
        }
    }
}

fn default_worlds() -> Vec<WorldName> {
    ["world", "world_nether", "world_the_end"]
        .into_iter()
        .filter_map(|w| WorldName::new(w).ok())
        .collect()
}

/// Parse an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl TerritoryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let thresholds = TierThresholds::new(
            env_or("HOLDFAST_TIER_CORE", TierThresholds::DEFAULT_CORE),
            env_or("HOLDFAST_TIER_SECURE", TierThresholds::DEFAULT_SECURE),
            env_or("HOLDFAST_TIER_CONTESTED", TierThresholds::DEFAULT_CONTESTED),
        )
        .context("HOLDFAST_TIER_* thresholds must be strictly descending and at most 100")?;

        let worlds = match env::var("HOLDFAST_WORLDS") {
            Ok(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(WorldName::new)
                .collect::<Result<Vec<_>, _>>()
                .context("HOLDFAST_WORLDS must be a comma-separated list of world names")?,
            Err(_) => defaults.worlds,
        };

        Ok(Self {
            data_path: env::var("HOLDFAST_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            thresholds,
            decay: DecayConfig {
                interval_seconds: env_or(
                    "HOLDFAST_DECAY_INTERVAL_SECS",
                    defaults.decay.interval_seconds,
                ),
                points: env_or("HOLDFAST_DECAY_POINTS", defaults.decay.points),
            },
            worlds,
        })
    }
}
