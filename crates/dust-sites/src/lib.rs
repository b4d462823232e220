//! Dust Sites Library
//!
//! Fixed catalog of cities monitored for dust storm risk, grouped into
//! regions. The catalog is loaded once at start and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod catalog;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiteError {
    #[error("Site not found: {0}")]
    NotFound(String),
    #[error("Duplicate site id: {0}")]
    DuplicateId(String),
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}

pub type Result<T> = std::result::Result<T, SiteError>;

/// Region a site is ranked and displayed within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Middle East")]
    MiddleEast,
    #[serde(rename = "North Africa")]
    NorthAfrica,
    #[serde(rename = "South Asia")]
    SouthAsia,
    #[serde(rename = "East Asia")]
    EastAsia,
    #[serde(rename = "Australia")]
    Australia,
    #[serde(rename = "US Southwest")]
    UsSouthwest,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::MiddleEast,
        Region::NorthAfrica,
        Region::SouthAsia,
        Region::EastAsia,
        Region::Australia,
        Region::UsSouthwest,
    ];

    /// Display name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MiddleEast => "Middle East",
            Self::NorthAfrica => "North Africa",
            Self::SouthAsia => "South Asia",
            Self::EastAsia => "East Asia",
            Self::Australia => "Australia",
            Self::UsSouthwest => "US Southwest",
        }
    }

    /// URL-friendly form, e.g. `middle-east`.
    pub fn slug(&self) -> String {
        self.as_str().to_ascii_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = SiteError;

    /// Accepts the display name in any case, or its slug.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Region::ALL
            .into_iter()
            .find(|r| r.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| SiteError::UnknownRegion(s.to_string()))
    }
}

/// Selection of regions for a view: one region, or every site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    Global,
    Only(Region),
}

impl RegionFilter {
    pub fn matches(&self, region: Region) -> bool {
        match self {
            Self::Global => true,
            Self::Only(r) => *r == region,
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("Global"),
            Self::Only(r) => r.fmt(f),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("global") {
            return Ok(Self::Global);
        }
        s.parse().map(Self::Only)
    }
}

/// A monitored city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub region: Region,
}

impl Site {
    pub fn new(id: &str, name: &str, lat: f64, lon: f64, region: Region) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lon,
            region,
        }
    }
}

/// Ordered, immutable set of sites with unique ids.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<Site>,
}

impl SiteRegistry {
    pub fn new(sites: Vec<Site>) -> Result<Self> {
        for (i, site) in sites.iter().enumerate() {
            if sites[..i].iter().any(|s| s.id == site.id) {
                return Err(SiteError::DuplicateId(site.id.clone()));
            }
        }
        Ok(Self { sites })
    }

    /// The built-in dust belt catalog.
    pub fn dust_belt() -> Self {
        Self {
            sites: catalog::dust_belt_sites(),
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Site> {
        self.sites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SiteError::NotFound(id.to_string()))
    }

    /// Registry order of a site.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.id == id)
    }

    pub fn in_region(&self, region: Region) -> impl Iterator<Item = &Site> {
        self.sites.iter().filter(move |s| s.region == region)
    }

    pub fn filtered(&self, filter: RegionFilter) -> impl Iterator<Item = &Site> {
        self.sites.iter().filter(move |s| filter.matches(s.region))
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::dust_belt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dust_belt_ids_unique() {
        let registry = SiteRegistry::dust_belt();
        assert_eq!(registry.len(), 36);

        // Re-validating the catalog must succeed
        let rebuilt = SiteRegistry::new(registry.sites().to_vec());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_every_region_populated() {
        let registry = SiteRegistry::dust_belt();
        for region in Region::ALL {
            assert!(
                registry.in_region(region).count() > 0,
                "no sites in {}",
                region
            );
        }
        assert_eq!(registry.in_region(Region::MiddleEast).count(), 11);
        assert_eq!(registry.in_region(Region::EastAsia).count(), 2);
    }

    #[test]
    fn test_lookup() {
        let registry = SiteRegistry::dust_belt();
        let dubai = registry.get("dubai").unwrap();
        assert_eq!(dubai.name, "Dubai");
        assert_eq!(dubai.region, Region::MiddleEast);
        assert_eq!(registry.position("dubai"), Some(0));

        assert_eq!(
            registry.get("atlantis"),
            Err(SiteError::NotFound("atlantis".to_string()))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let sites = vec![
            Site::new("a", "A", 0.0, 0.0, Region::Australia),
            Site::new("b", "B", 1.0, 1.0, Region::Australia),
            Site::new("a", "A again", 2.0, 2.0, Region::EastAsia),
        ];
        assert_eq!(
            SiteRegistry::new(sites).unwrap_err(),
            SiteError::DuplicateId("a".to_string())
        );
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("Middle East".parse::<Region>().unwrap(), Region::MiddleEast);
        assert_eq!("us-southwest".parse::<Region>().unwrap(), Region::UsSouthwest);
        assert_eq!("SOUTH_ASIA".parse::<Region>().unwrap(), Region::SouthAsia);
        assert!("Antarctica".parse::<Region>().is_err());

        assert_eq!(Region::NorthAfrica.slug(), "north-africa");
    }

    #[test]
    fn test_region_filter() {
        assert_eq!("global".parse::<RegionFilter>().unwrap(), RegionFilter::Global);
        let filter: RegionFilter = "Australia".parse().unwrap();
        assert!(filter.matches(Region::Australia));
        assert!(!filter.matches(Region::EastAsia));
        assert!(RegionFilter::Global.matches(Region::EastAsia));

        let registry = SiteRegistry::dust_belt();
        let ids: Vec<_> = registry.filtered(filter).map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "mildura", "brokenhill"]);
    }

    #[test]
    fn test_region_serializes_by_name() {
        let json = serde_json::to_string(&Region::UsSouthwest).unwrap();
        assert_eq!(json, "\"US Southwest\"");
    }
}
