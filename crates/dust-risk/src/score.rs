//! Composite dust storm risk score
//!
//! Each signal is scaled against a reference ceiling and clamped to [0, 1]:
//! - Wind (lifts dust): 30 m/s
//! - PM10 (coarse particulates): 150 µg/m³
//! - Dust (mineral dust): 200 µg/m³
//! - Dryness (1 - RH/100)
//!
//! Particulate load carries the highest weight. The composite lies in
//! [0, 3.6].

use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// Reference ceilings
pub const WIND_CEILING_MS: f64 = 30.0;
pub const PM10_CEILING_UGM3: f64 = 150.0;
pub const DUST_CEILING_UGM3: f64 = 200.0;

/// Humidity assumed when the provider omits it
pub const DEFAULT_RH_PCT: f64 = 50.0;

/// Composite weights
pub const W_PM10: f64 = 1.1;
pub const W_DUST: f64 = 1.1;
pub const W_WIND: f64 = 0.8;
pub const W_DRYNESS: f64 = 0.6;

pub const MAX_SCORE: f64 = W_PM10 + W_DUST + W_WIND + W_DRYNESS;

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// NaN counts as absent.
fn value_or(v: Option<f64>, default: f64) -> f64 {
    v.filter(|x| !x.is_nan()).unwrap_or(default)
}

/// Normalized score inputs, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskComponents {
    pub wind: f64,
    pub pm10: f64,
    pub dust: f64,
    pub dryness: f64,
}

impl RiskComponents {
    pub fn from_observation(obs: &Observation) -> Self {
        let wind = value_or(obs.wind, 0.0);
        let pm10 = value_or(obs.pm10, 0.0);
        let dust = value_or(obs.dust, 0.0);
        let rh = value_or(obs.rh, DEFAULT_RH_PCT);

        Self {
            wind: clamp01(wind / WIND_CEILING_MS),
            pm10: clamp01(pm10 / PM10_CEILING_UGM3),
            dust: clamp01(dust / DUST_CEILING_UGM3),
            dryness: clamp01(1.0 - rh / 100.0),
        }
    }

    /// Weighted composite
    pub fn composite(&self) -> f64 {
        W_PM10 * self.pm10 + W_DUST * self.dust + W_WIND * self.wind + W_DRYNESS * self.dryness
    }
}

/// Composite risk score for an observation. Total: always returns a value
/// in [0, 3.6].
pub fn risk_score(obs: &Observation) -> f64 {
    RiskComponents::from_observation(obs).composite()
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
