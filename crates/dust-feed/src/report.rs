//! Cycle output
//!
//! A [`DustReport`] is the whole output contract of one cycle: the flat
//! location list and the per-site series map. A [`Snapshot`] is a report
//! once it has been published with its cycle number.

use chrono::{DateTime, Utc};
use dust_risk::{RiskTier, ScoredLocation, SeriesPoint};
use dust_sites::RegionFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DustReport {
    /// Scored sites in registry order
    pub locations: Vec<ScoredLocation>,
    /// Site id → trailing series, oldest first
    pub series: BTreeMap<String, Vec<SeriesPoint>>,
}

impl DustReport {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The report restricted to one region. Tiers are kept as computed.
    pub fn for_region(&self, filter: RegionFilter) -> DustReport {
        let locations: Vec<ScoredLocation> = self
            .locations
            .iter()
            .filter(|l| filter.matches(l.group))
            .cloned()
            .collect();
        let series = locations
            .iter()
            .filter_map(|l| self.series.get(&l.id).map(|s| (l.id.clone(), s.clone())))
            .collect();
        DustReport { locations, series }
    }

    /// High-tier sites inside the filter.
    pub fn alerts(&self, filter: RegionFilter) -> Vec<&ScoredLocation> {
        self.locations
            .iter()
            .filter(|l| filter.matches(l.group) && l.risk == RiskTier::High)
            .collect()
    }

    pub fn series_for(&self, id: &str) -> Option<&[SeriesPoint]> {
        self.series.get(id).map(Vec::as_slice)
    }

    pub fn location(&self, id: &str) -> Option<&ScoredLocation> {
        self.locations.iter().find(|l| l.id == id)
    }
}

/// A published cycle result. Never mutated after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Monotonic cycle number; a higher number always wins
    pub cycle: u64,
    pub updated_at: DateTime<Utc>,
    /// Sites fetched this cycle
    pub attempted: usize,
    /// Sites that produced a score
    pub succeeded: usize,
    #[serde(flatten)]
    pub report: DustReport,
}

impl Snapshot {
    pub fn new(cycle: u64, attempted: usize, report: DustReport) -> Self {
        Self {
            cycle,
            updated_at: Utc::now(),
            attempted,
            succeeded: report.locations.len(),
            report,
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dust_risk::Observation;
    use dust_sites::{Region, Site};

    fn report() -> DustReport {
        let (me, us) = (Region::MiddleEast, Region::UsSouthwest);
        let sites = [
            (Site::new("riyadh", "Riyadh", 24.7, 46.7, me), 2.8, RiskTier::High),
            (Site::new("doha", "Doha", 25.3, 51.5, me), 1.2, RiskTier::Medium),
            (Site::new("phoenix", "Phoenix", 33.4, -112.0, us), 2.1, RiskTier::High),
            (Site::new("tucson", "Tucson", 32.2, -110.9, us), 0.4, RiskTier::Low),
        ];
        let mut report = DustReport::default();
        for (site, score, tier) in sites {
            report.series.insert(
                site.id.clone(),
                vec![SeriesPoint {
                    t: "2025-04-01T00:00".to_string(),
                    score,
                }],
            );
            report
                .locations
                .push(ScoredLocation::new(&site, &Observation::default(), score, tier));
        }
        report
    }

    #[test]
    fn test_region_view() {
        let report = report();
        let view = report.for_region(RegionFilter::Only(Region::UsSouthwest));
        let ids: Vec<&str> = view.locations.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["phoenix", "tucson"]);
        assert_eq!(view.series.len(), 2);
        assert!(view.series.contains_key("tucson"));

        assert_eq!(report.for_region(RegionFilter::Global), report);
    }

    #[test]
    fn test_alerts() {
        let report = report();
        let global: Vec<&str> = report
            .alerts(RegionFilter::Global)
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(global, vec!["riyadh", "phoenix"]);

        let me = report.alerts(RegionFilter::Only(Region::MiddleEast));
        assert_eq!(me.len(), 1);
        assert!(report.alerts(RegionFilter::Only(Region::EastAsia)).is_empty());
    }

    #[test]
    fn test_lookup() {
        let report = report();
        assert_eq!(report.series_for("doha").unwrap().len(), 1);
        assert!(report.series_for("dubai").is_none());
        assert_eq!(report.location("tucson").unwrap().risk, RiskTier::Low);
    }

    #[test]
    fn test_empty_report_shape() {
        let json = serde_json::to_value(DustReport::default()).unwrap();
        assert_eq!(json, serde_json::json!({"locations": [], "series": {}}));
    }

    #[test]
    fn test_snapshot_flattens_report() {
        let snapshot = Snapshot::new(7, 36, report());
        assert_eq!(snapshot.succeeded, 4);
        assert_eq!(snapshot.failed(), 32);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cycle"], 7);
        assert_eq!(json["locations"].as_array().unwrap().len(), 4);
        assert!(json["series"]["phoenix"].is_array());
    }
}
