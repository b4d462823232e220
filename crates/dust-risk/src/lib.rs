//! Dust Storm Risk Scoring
//!
//! Pure, I/O-free half of the dust feed:
//! - Observation model and raw hourly readings
//! - Composite risk score (particulates, wind, dryness)
//! - Trailing series window per site
//! - Rank-based High/Medium/Low tiering
//!
//! # Usage
//!
//! ```rust
//! use dust_risk::{assign_tiers, risk_score, Observation, RiskTier};
//!
//! let obs = Observation {
//!     wind: Some(12.0),
//!     pm10: Some(180.0),
//!     ..Default::default()
//! };
//! assert!(risk_score(&obs) > 1.0);
//!
//! let tiers = assign_tiers(&[3.0, 1.5, 0.2]);
//! assert_eq!(tiers, vec![RiskTier::High, RiskTier::Medium, RiskTier::Low]);
//! ```

pub mod location;
pub mod observation;
pub mod score;
pub mod series;
pub mod tier;

// Re-exports
pub use location::ScoredLocation;
pub use observation::{HourlyReadings, Observation};
pub use score::{
    risk_score, round2, RiskComponents, DEFAULT_RH_PCT, DUST_CEILING_UGM3, MAX_SCORE,
    PM10_CEILING_UGM3, WIND_CEILING_MS, W_DRYNESS, W_DUST, W_PM10, W_WIND,
};
pub use series::{build_series, SeriesPoint, HORIZON};
pub use tier::{
    assign_tiers, tier_locations, RiskTier, TierScope, HIGH_FRACTION, MEDIUM_FRACTION,
};
