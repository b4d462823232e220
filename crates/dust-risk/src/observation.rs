//! Observation model
//!
//! An [`Observation`] is one reading for one site. [`HourlyReadings`] holds
//! the raw provider arrays a reading and its series are cut from.

use serde::{Deserialize, Serialize};

/// Current conditions at a site. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Wind speed at 10 m (m/s)
    pub wind: Option<f64>,
    /// Wind direction at 10 m (degrees), carried through, not scored
    pub direction: Option<f64>,
    /// PM10 concentration (µg/m³)
    pub pm10: Option<f64>,
    /// Dust concentration (µg/m³)
    pub dust: Option<f64>,
    /// Relative humidity at 2 m (%)
    pub rh: Option<f64>,
}

/// Hourly arrays for one site, merged from the meteorological and
/// air-quality providers.
///
/// `time` comes from the meteorological provider and is the index axis for
/// both sources. Arrays may be shorter than `time` or contain `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyReadings {
    pub time: Vec<String>,
    pub wind: Vec<Option<f64>>,
    pub direction: Vec<Option<f64>>,
    pub rh: Vec<Option<f64>>,
    pub pm10: Vec<Option<f64>>,
    pub dust: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], idx: usize) -> Option<f64> {
    values.get(idx).copied().flatten()
}

impl HourlyReadings {
    /// Index of the "current" reading: the last timestamp, or 0 when the
    /// time axis is empty.
    pub fn current_index(&self) -> usize {
        self.time.len().saturating_sub(1)
    }

    /// Observation at `idx`, with absent entries left as `None`.
    pub fn observation_at(&self, idx: usize) -> Observation {
        Observation {
            wind: at(&self.wind, idx),
            direction: at(&self.direction, idx),
            pm10: at(&self.pm10, idx),
            dust: at(&self.dust, idx),
            rh: at(&self.rh, idx),
        }
    }

    /// Observation at [`current_index`](Self::current_index).
    pub fn current(&self) -> Observation {
        self.observation_at(self.current_index())
    }

    /// Timestamp label for `idx`, falling back to the index itself.
    pub fn label(&self, idx: usize) -> String {
        self.time
            .get(idx)
            .cloned()
            .unwrap_or_else(|| idx.to_string())
    }
}
