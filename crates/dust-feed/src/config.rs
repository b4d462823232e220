//! Feed configuration
//!
//! Every setting has a default and can be overridden from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DUST_FORECAST_URL` | Open-Meteo forecast endpoint |
//! | `DUST_AIR_QUALITY_URL` | Open-Meteo air-quality endpoint |
//! | `DUST_TIMEOUT_SEC` | 10 |
//! | `DUST_POLL_INTERVAL_SEC` | 60 |
//! | `DUST_HORIZON` | 12 |
//! | `DUST_TIER_SCOPE` | `global` (`region` ranks within each region) |

use dust_risk::{TierScope, HORIZON};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

pub const ENV_FORECAST_URL: &str = "DUST_FORECAST_URL";
pub const ENV_AIR_QUALITY_URL: &str = "DUST_AIR_QUALITY_URL";
pub const ENV_TIMEOUT_SEC: &str = "DUST_TIMEOUT_SEC";
pub const ENV_POLL_INTERVAL_SEC: &str = "DUST_POLL_INTERVAL_SEC";
pub const ENV_HORIZON: &str = "DUST_HORIZON";
pub const ENV_TIER_SCOPE: &str = "DUST_TIER_SCOPE";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Meteorological source endpoint
    pub forecast_url: String,
    /// Air-quality source endpoint
    pub air_quality_url: String,
    /// Per-request timeout in seconds
    pub timeout_sec: u64,
    /// Seconds between polling cycles
    pub poll_interval_sec: u64,
    /// Points kept per site series
    pub horizon: usize,
    /// Ranking scope for risk tiers
    pub tier_scope: TierScope,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            air_quality_url: DEFAULT_AIR_QUALITY_URL.to_string(),
            timeout_sec: 10,
            poll_interval_sec: 60,
            horizon: HORIZON,
            tier_scope: TierScope::Global,
        }
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn positive(key: &'static str, value: String) -> Result<u64, ConfigError> {
    let n: u64 = parse(key, value.clone())?;
    if n == 0 {
        return Err(ConfigError::Invalid {
            key,
            value,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(n)
}

impl FeedConfig {
    /// Defaults overridden by `DUST_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_FORECAST_URL) {
            config.forecast_url = v;
        }
        if let Some(v) = lookup(ENV_AIR_QUALITY_URL) {
            config.air_quality_url = v;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SEC) {
            config.timeout_sec = positive(ENV_TIMEOUT_SEC, v)?;
        }
        if let Some(v) = lookup(ENV_POLL_INTERVAL_SEC) {
            config.poll_interval_sec = positive(ENV_POLL_INTERVAL_SEC, v)?;
        }
        if let Some(v) = lookup(ENV_HORIZON) {
            config.horizon = positive(ENV_HORIZON, v)? as usize;
        }
        if let Some(v) = lookup(ENV_TIER_SCOPE) {
            config.tier_scope = parse(ENV_TIER_SCOPE, v)?;
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_sec)
    }
}
