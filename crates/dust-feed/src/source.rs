//! Observation source interface

use crate::error::Result;
use async_trait::async_trait;
use dust_risk::HourlyReadings;
use dust_sites::Site;

/// Anything that can produce hourly readings for a site.
///
/// Implementations report a missing value as `None` inside the readings and
/// reserve `Err` for a failure of the whole site.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn fetch(&self, site: &Site) -> Result<HourlyReadings>;
}
