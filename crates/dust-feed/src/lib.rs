//! Dust Feed
//!
//! Acquisition half of the dust storm pipeline:
//! - Open-Meteo forecast + air-quality fetch per site
//! - Fan-out/fan-in scoring cycle over the site registry
//! - Versioned snapshot store and interval poller
//!
//! | Source | Data | Auth |
//! |--------|------|------|
//! | Open-Meteo Forecast | wind speed, wind direction, humidity | None |
//! | Open-Meteo Air Quality | PM10, dust | None |
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = FeedConfig::from_env()?;
//! let client = OpenMeteoClient::new(&config)?;
//! let registry = Arc::new(SiteRegistry::dust_belt());
//! let aggregator = Aggregator::new(Arc::new(client), registry, &config);
//! let report = aggregator.run_cycle().await;
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod open_meteo;
pub mod poller;
pub mod report;
pub mod source;

// Re-exports
pub use aggregator::{Aggregator, ScoredReading, SiteOutcome};
pub use config::{ConfigError, FeedConfig};
pub use error::{FetchError, Provider};
pub use open_meteo::OpenMeteoClient;
pub use poller::{Poller, SnapshotStore};
pub use report::{DustReport, Snapshot};
pub use source::ObservationSource;
