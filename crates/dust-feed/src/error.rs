use std::fmt;
use thiserror::Error;

/// Upstream data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Forecast,
    AirQuality,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forecast => f.write_str("Open-Meteo forecast"),
            Self::AirQuality => f.write_str("Open-Meteo air-quality"),
        }
    }
}

/// Whole-site fetch failure. A missing field is never one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),
    #[error("{provider} request failed: {reason}")]
    Request { provider: Provider, reason: String },
    #[error("{provider} returned status {status}")]
    Status { provider: Provider, status: u16 },
    #[error("{provider} response could not be decoded: {reason}")]
    Decode { provider: Provider, reason: String },
}

pub type Result<T> = std::result::Result<T, FetchError>;
