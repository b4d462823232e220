//! Cycle aggregator
//!
//! One cycle: fetch every registered site concurrently, score and window
//! each success, drop each failure, tier the survivors, then assemble the
//! report in registry order. A cycle never fails as a whole; if every site
//! fails the report is empty.

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::report::DustReport;
use crate::source::ObservationSource;
use dust_risk::{
    build_series, risk_score, round2, tier_locations, Observation, ScoredLocation, SeriesPoint,
    TierScope,
};
use dust_sites::{Site, SiteRegistry};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// A site that fetched and scored successfully, before tiering.
#[derive(Debug, Clone)]
pub struct ScoredReading {
    pub site: Site,
    pub observation: Observation,
    /// Current score, 2 decimals
    pub score: f64,
    pub series: Vec<SeriesPoint>,
}

/// Result of one site's fetch.
#[derive(Debug, Clone)]
pub enum SiteOutcome {
    Scored(ScoredReading),
    Failed { site_id: String, error: FetchError },
}

pub struct Aggregator {
    source: Arc<dyn ObservationSource>,
    registry: Arc<SiteRegistry>,
    horizon: usize,
    scope: TierScope,
}

impl Aggregator {
    pub fn new(
        source: Arc<dyn ObservationSource>,
        registry: Arc<SiteRegistry>,
        config: &FeedConfig,
    ) -> Self {
        Self {
            source,
            registry,
            horizon: config.horizon,
            scope: config.tier_scope,
        }
    }

    pub fn with_scope(mut self, scope: TierScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn scope(&self) -> TierScope {
        self.scope
    }

    /// Fetch and score a single site.
    pub async fn fetch_site(&self, site: &Site) -> SiteOutcome {
        match self.source.fetch(site).await {
            Ok(readings) => {
                let idx = readings.current_index();
                let observation = readings.observation_at(idx);
                SiteOutcome::Scored(ScoredReading {
                    site: site.clone(),
                    observation,
                    score: round2(risk_score(&observation)),
                    series: build_series(&readings, idx, self.horizon),
                })
            }
            Err(error) => SiteOutcome::Failed {
                site_id: site.id.clone(),
                error,
            },
        }
    }

    /// Run one full fetch → score → tier → assemble pass.
    pub async fn run_cycle(&self) -> DustReport {
        // join_all keeps registry order regardless of completion order
        let outcomes = join_all(self.registry.iter().map(|site| self.fetch_site(site))).await;

        let mut scored = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                SiteOutcome::Scored(reading) => scored.push(reading),
                SiteOutcome::Failed { site_id, error } => {
                    warn!("Site fetch failed for {}: {}", site_id, error);
                }
            }
        }

        info!(
            "Cycle fetched {}/{} sites ({} tiering)",
            scored.len(),
            self.registry.len(),
            self.scope
        );

        assemble(scored, self.scope)
    }
}

/// Tier scored readings and build the report. Input order is output order.
pub fn assemble(scored: Vec<ScoredReading>, scope: TierScope) -> DustReport {
    let entries: Vec<_> = scored.iter().map(|r| (r.site.region, r.score)).collect();
    let tiers = tier_locations(scope, &entries);

    let mut report = DustReport::default();
    for (reading, tier) in scored.into_iter().zip(tiers) {
        report.locations.push(ScoredLocation::new(
            &reading.site,
            &reading.observation,
            reading.score,
            tier,
        ));
        report.series.insert(reading.site.id, reading.series);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Provider, Result};
    use async_trait::async_trait;
    use dust_risk::{HourlyReadings, RiskTier};
    use dust_sites::Region;
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;

    /// Serves canned readings; fails the sites it is told to.
    struct FakeSource {
        readings: HashMap<String, HourlyReadings>,
        failing: HashSet<String>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                readings: HashMap::new(),
                failing: HashSet::new(),
            }
        }

        fn with(mut self, id: &str, pm10: f64, hours: usize) -> Self {
            self.readings.insert(id.to_string(), hourly(pm10, hours));
            self
        }

        fn failing(mut self, id: &str) -> Self {
            self.failing.insert(id.to_string());
            self
        }
    }

    #[async_trait]
    impl ObservationSource for FakeSource {
        async fn fetch(&self, site: &Site) -> Result<HourlyReadings> {
            // Reverse completion order relative to the registry
            let delay = 30u64.saturating_sub(site.lat as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.failing.contains(&site.id) {
                return Err(FetchError::Request {
                    provider: Provider::AirQuality,
                    reason: "connection reset".to_string(),
                });
            }
            Ok(self.readings.get(&site.id).cloned().unwrap_or_default())
        }
    }

    fn hourly(pm10: f64, hours: usize) -> HourlyReadings {
        HourlyReadings {
            time: (0..hours).map(|h| format!("2025-04-01T{:02}:00", h % 24)).collect(),
            wind: vec![Some(0.0); hours],
            direction: vec![Some(180.0); hours],
            rh: vec![Some(100.0); hours],
            pm10: vec![Some(pm10); hours],
            dust: vec![Some(0.0); hours],
        }
    }

    fn registry(ids: &[(&str, Region)]) -> Arc<SiteRegistry> {
        let sites = ids
            .iter()
            .enumerate()
            .map(|(i, (id, region))| Site::new(id, id, i as f64, 0.0, *region))
            .collect();
        Arc::new(SiteRegistry::new(sites).unwrap())
    }

    fn aggregator(source: FakeSource, registry: Arc<SiteRegistry>) -> Aggregator {
        Aggregator::new(Arc::new(source), registry, &FeedConfig::default())
    }

    #[tokio::test]
    async fn test_scores_tier_in_order() {
        // PM10 150 → 1.1, 75 → 0.55, 15 → 0.11
        let source = FakeSource::new()
            .with("a", 150.0, 24)
            .with("b", 75.0, 24)
            .with("c", 15.0, 24);
        let reg = registry(&[
            ("a", Region::MiddleEast),
            ("b", Region::MiddleEast),
            ("c", Region::MiddleEast),
        ]);

        let report = aggregator(source, reg).run_cycle().await;

        let got: Vec<(&str, f64, RiskTier)> = report
            .locations
            .iter()
            .map(|l| (l.id.as_str(), l.score, l.risk))
            .collect();
        assert_eq!(
            got,
            vec![
                ("a", 1.1, RiskTier::High),
                ("b", 0.55, RiskTier::Medium),
                ("c", 0.11, RiskTier::Low),
            ]
        );
        assert_eq!(report.series["a"].len(), 12);
        assert_eq!(report.locations[0].direction, Some(180.0));
    }

    #[tokio::test]
    async fn test_partial_failure_isolated() {
        let ids = [
            ("s1", Region::NorthAfrica),
            ("s2", Region::NorthAfrica),
            ("s3", Region::NorthAfrica),
            ("s4", Region::NorthAfrica),
            ("s5", Region::NorthAfrica),
        ];
        let mut source = FakeSource::new();
        for (i, (id, _)) in ids.iter().enumerate() {
            source = source.with(id, 20.0 * i as f64, 6);
        }
        let source = source.failing("s3");

        let report = aggregator(source, registry(&ids)).run_cycle().await;

        let got: Vec<&str> = report.locations.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(got, vec!["s1", "s2", "s4", "s5"]);
        assert_eq!(report.series.len(), 4);
        assert!(!report.series.contains_key("s3"));
        assert_eq!(report.series["s1"].len(), 6);
    }

    #[tokio::test]
    async fn test_total_failure_yields_empty_report() {
        let ids = [("x", Region::Australia), ("y", Region::Australia)];
        let source = FakeSource::new().failing("x").failing("y");

        let report = aggregator(source, registry(&ids)).run_cycle().await;
        assert_eq!(report, DustReport::default());
    }

    #[tokio::test]
    async fn test_empty_provider_payload_still_scores() {
        let ids = [("quiet", Region::EastAsia)];
        let report = aggregator(FakeSource::new(), registry(&ids)).run_cycle().await;

        let loc = &report.locations[0];
        assert_eq!(loc.score, 0.3);
        assert_eq!(loc.risk, RiskTier::High);
        assert_eq!(loc.wind, None);
        assert_eq!(report.series["quiet"], vec![SeriesPoint { t: "0".to_string(), score: 0.3 }]);
    }

    #[tokio::test]
    async fn test_scope_changes_tiers() {
        let ids = [
            ("me1", Region::MiddleEast),
            ("me2", Region::MiddleEast),
            ("me3", Region::MiddleEast),
            ("ea1", Region::EastAsia),
            ("ea2", Region::EastAsia),
        ];
        let build = || {
            FakeSource::new()
                .with("me1", 150.0, 3)
                .with("me2", 140.0, 3)
                .with("me3", 130.0, 3)
                .with("ea1", 20.0, 3)
                .with("ea2", 10.0, 3)
        };

        let global = aggregator(build(), registry(&ids));
        let regional = aggregator(build(), registry(&ids)).with_scope(TierScope::PerRegion);
        assert_eq!(global.scope(), TierScope::Global);
        assert_eq!(regional.scope(), TierScope::PerRegion);

        let global = global.run_cycle().await;
        let regional = regional.run_cycle().await;

        let tiers = |r: &DustReport| r.locations.iter().map(|l| l.risk).collect::<Vec<_>>();
        use dust_risk::RiskTier::*;
        assert_eq!(tiers(&global), vec![High, High, Medium, Medium, Low]);
        assert_eq!(tiers(&regional), vec![High, Medium, Low, High, Medium]);
    }

    #[test]
    fn test_assemble_empty() {
        let report = assemble(Vec::new(), TierScope::Global);
        assert!(report.is_empty());
        assert!(report.series.is_empty());
    }
}
