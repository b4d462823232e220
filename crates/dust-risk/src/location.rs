//! Scored, tiered site record handed to the presentation layer

use crate::observation::Observation;
use crate::tier::RiskTier;
use dust_sites::{Region, Site};
use serde::{Deserialize, Serialize};

/// One site after scoring and tiering.
///
/// Serializes as `{id, region, lat, lon, group, wind, direction, pm10, dust,
/// rh, risk, score}` where `region` is the city's display name and `group`
/// the region it is ranked in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLocation {
    pub id: String,
    #[serde(rename = "region")]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub group: Region,
    pub wind: Option<f64>,
    pub direction: Option<f64>,
    pub pm10: Option<f64>,
    pub dust: Option<f64>,
    pub rh: Option<f64>,
    pub risk: RiskTier,
    pub score: f64,
}

impl ScoredLocation {
    pub fn new(site: &Site, obs: &Observation, score: f64, risk: RiskTier) -> Self {
        Self {
            id: site.id.clone(),
            name: site.name.clone(),
            lat: site.lat,
            lon: site.lon,
            group: site.region,
            wind: obs.wind,
            direction: obs.direction,
            pm10: obs.pm10,
            dust: obs.dust,
            rh: obs.rh,
            risk,
            score,
        }
    }

    pub fn observation(&self) -> Observation {
        Observation {
            wind: self.wind,
            direction: self.direction,
            pm10: self.pm10,
            dust: self.dust,
            rh: self.rh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_contract_keys() {
        let site = Site::new("cairo", "Cairo", 30.0444, 31.2357, Region::NorthAfrica);
        let obs = Observation {
            wind: Some(7.5),
            direction: Some(310.0),
            pm10: Some(95.0),
            dust: None,
            rh: Some(22.0),
        };
        let loc = ScoredLocation::new(&site, &obs, 1.41, RiskTier::High);
        let json = serde_json::to_value(&loc).unwrap();

        assert_eq!(json["id"], "cairo");
        assert_eq!(json["region"], "Cairo");
        assert_eq!(json["group"], "North Africa");
        assert_eq!(json["risk"], "High");
        assert_eq!(json["score"], 1.41);
        assert_eq!(json["direction"], 310.0);
        assert!(json["dust"].is_null());

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(loc.observation(), obs);
    }
}
