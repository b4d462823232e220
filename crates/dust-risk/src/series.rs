//! Trailing risk series per site

use crate::observation::{HourlyReadings, Observation};
use crate::score::{risk_score, round2};
use serde::{Deserialize, Serialize};

/// Points kept in a site's series
pub const HORIZON: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Provider timestamp, or the index when the provider gave none
    pub t: String,
    /// Risk score, 2 decimals
    pub score: f64,
}

/// Scores the `horizon` readings ending at `idx` (inclusive), oldest first.
///
/// A reading missing at some hour falls back to the value at `idx`, then to
/// the scorer's own default. At least one point is always produced.
pub fn build_series(readings: &HourlyReadings, idx: usize, horizon: usize) -> Vec<SeriesPoint> {
    let current = readings.observation_at(idx);
    let start = idx.saturating_sub(horizon.max(1) - 1);

    (start..=idx)
        .map(|k| {
            let at = readings.observation_at(k);
            let obs = Observation {
                wind: at.wind.or(current.wind),
                direction: at.direction.or(current.direction),
                pm10: at.pm10.or(current.pm10),
                dust: at.dust.or(current.dust),
                rh: at.rh.or(current.rh),
            };
            SeriesPoint {
                t: readings.label(k),
                score: round2(risk_score(&obs)),
            }
        })
        .collect()
}
