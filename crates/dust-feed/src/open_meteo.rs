//! Open-Meteo client
//!
//! Two free, keyless endpoints per site:
//! - Forecast: hourly wind speed (m/s), wind direction, relative humidity
//! - Air quality: hourly PM10 and dust
//!
//! Both are requested together. A transport error, a non-success status or
//! an undecodable body on either request fails the site. Missing or `null`
//! arrays and `null` entries decode as absent values; a `null` timestamp is
//! labelled by its position.

use crate::config::FeedConfig;
use crate::error::{FetchError, Provider, Result};
use crate::source::ObservationSource;
use async_trait::async_trait;
use dust_risk::HourlyReadings;
use dust_sites::Site;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

const FORECAST_HOURLY: &str = "wind_speed_10m,wind_direction_10m,relative_humidity_2m";
const AIR_QUALITY_HOURLY: &str = "pm10,dust";

/// Open-Meteo forecast response
#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    hourly: Option<ForecastHourly>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastHourly {
    #[serde(default, deserialize_with = "null_as_empty")]
    time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    wind_direction_10m: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    relative_humidity_2m: Vec<Option<f64>>,
}

/// Open-Meteo air-quality response
#[derive(Debug, Default, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    hourly: Option<AirQualityHourly>,
}

// The air-quality time axis is ignored; the forecast axis indexes both sources.
#[derive(Debug, Default, Deserialize)]
struct AirQualityHourly {
    #[serde(default, deserialize_with = "null_as_empty")]
    pm10: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    dust: Vec<Option<f64>>,
}

/// A hourly array sent as `null` reads the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn merge(forecast: ForecastResponse, air: AirQualityResponse) -> HourlyReadings {
    let f = forecast.hourly.unwrap_or_default();
    let a = air.hourly.unwrap_or_default();
    let time = f
        .time
        .into_iter()
        .enumerate()
        .map(|(idx, t)| t.unwrap_or_else(|| idx.to_string()))
        .collect();
    HourlyReadings {
        time,
        wind: f.wind_speed_10m,
        direction: f.wind_direction_10m,
        rh: f.relative_humidity_2m,
        pm10: a.pm10,
        dust: a.dust,
    }
}

/// Open-Meteo client shared by every site fetch
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    forecast_url: String,
    air_quality_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            forecast_url: config.forecast_url.clone(),
            air_quality_url: config.air_quality_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        provider: Provider,
        url: &str,
        site: &Site,
        hourly: &str,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        debug!("Fetching {} for {} from {}", provider, site.id, url);

        let mut query: Vec<(&str, String)> = vec![
            ("latitude", site.lat.to_string()),
            ("longitude", site.lon.to_string()),
            ("hourly", hourly.to_string()),
            ("timezone", "auto".to_string()),
        ];
        query.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                provider,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                provider,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Request {
            provider,
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            provider,
            reason: e.to_string(),
        })
    }

    async fn fetch_forecast(&self, site: &Site) -> Result<ForecastResponse> {
        self.get_json(
            Provider::Forecast,
            &self.forecast_url,
            site,
            FORECAST_HOURLY,
            &[("wind_speed_unit", "ms")],
        )
        .await
    }

    async fn fetch_air_quality(&self, site: &Site) -> Result<AirQualityResponse> {
        self.get_json(
            Provider::AirQuality,
            &self.air_quality_url,
            site,
            AIR_QUALITY_HOURLY,
            &[],
        )
        .await
    }
}

#[async_trait]
impl ObservationSource for OpenMeteoClient {
    async fn fetch(&self, site: &Site) -> Result<HourlyReadings> {
        let (forecast, air) =
            tokio::try_join!(self.fetch_forecast(site), self.fetch_air_quality(site))?;
        Ok(merge(forecast, air))
    }
}
