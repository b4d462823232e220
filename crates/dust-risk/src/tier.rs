//! Rank-based risk tiering
//!
//! Tiers are relative, not absolute: the top 30 % of a ranked set are High,
//! the next 40 % Medium, the rest Low. Each cut is at least one site.
//! Equal scores keep their input order, so the same input always tiers the
//! same way.

use dust_sites::Region;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HIGH_FRACTION: f64 = 0.3;
pub const MEDIUM_FRACTION: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Higher is more severe
    pub fn severity(&self) -> u8 {
        match self {
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of sites a ranking pass runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierScope {
    /// One ranking across every site
    #[default]
    Global,
    /// An independent ranking inside each region
    PerRegion,
}

impl FromStr for TierScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "region" | "per_region" | "per-region" => Ok(Self::PerRegion),
            other => Err(format!("unknown tier scope: {}", other)),
        }
    }
}

impl fmt::Display for TierScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::PerRegion => f.write_str("region"),
        }
    }
}

fn cut(n: usize, fraction: f64) -> usize {
    ((n as f64 * fraction).round() as usize).max(1)
}

/// Tier each score by its rank within `scores`. Output is index-aligned
/// with the input.
pub fn assign_tiers(scores: &[f64]) -> Vec<RiskTier> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }

    // Stable: ties stay in input order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let high_cut = cut(n, HIGH_FRACTION).min(n);
    let med_cut = cut(n, MEDIUM_FRACTION).min(n - high_cut);

    let mut tiers = vec![RiskTier::Low; n];
    for (rank, &i) in order.iter().enumerate() {
        tiers[i] = if rank < high_cut {
            RiskTier::High
        } else if rank < high_cut + med_cut {
            RiskTier::Medium
        } else {
            RiskTier::Low
        };
    }
    tiers
}

/// Tier `(region, score)` pairs under the given scope. Output is
/// index-aligned with the input.
pub fn tier_locations(scope: TierScope, entries: &[(Region, f64)]) -> Vec<RiskTier> {
    match scope {
        TierScope::Global => {
            let scores: Vec<f64> = entries.iter().map(|(_, s)| *s).collect();
            assign_tiers(&scores)
        }
        TierScope::PerRegion => {
            let mut tiers = vec![RiskTier::Low; entries.len()];
            for region in Region::ALL {
                let members: Vec<usize> = entries
                    .iter()
                    .enumerate()
                    .filter(|(_, (r, _))| *r == region)
                    .map(|(i, _)| i)
                    .collect();
                let scores: Vec<f64> = members.iter().map(|&i| entries[i].1).collect();
                for (&i, tier) in members.iter().zip(assign_tiers(&scores)) {
                    tiers[i] = tier;
                }
            }
            tiers
        }
    }
}
