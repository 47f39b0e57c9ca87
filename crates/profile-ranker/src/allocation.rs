//! Capital split across the top of a ranking

use analysis_core::{InvestorProfile, RiskTolerance};
use serde::{Deserialize, Serialize};

use crate::models::{AllocationSuggestion, RankedAsset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    pub max_assets: usize,
    /// Weights by rank position, largest first
    pub conservative_ladder: Vec<f64>,
    pub moderate_ladder: Vec<f64>,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            max_assets: 5,
            conservative_ladder: vec![0.40, 0.25, 0.20, 0.10, 0.05],
            moderate_ladder: vec![0.30, 0.25, 0.20, 0.15, 0.10],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AllocationPlanner {
    policy: AllocationPolicy,
}

impl AllocationPlanner {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Raw weights for `count` assets; aggressive profiles split evenly
    fn ladder(&self, tolerance: RiskTolerance, count: usize) -> Vec<f64> {
        match tolerance {
            RiskTolerance::Conservative => {
                self.policy.conservative_ladder.iter().take(count).copied().collect()
            }
            RiskTolerance::Moderate => {
                self.policy.moderate_ladder.iter().take(count).copied().collect()
            }
            RiskTolerance::Aggressive => vec![1.0; count],
        }
    }

    /// Split `total_capital` across the best-ranked assets
    pub fn suggest(
        &self,
        profile: &InvestorProfile,
        ranked: &[RankedAsset],
        total_capital: f64,
    ) -> Vec<AllocationSuggestion> {
        if ranked.is_empty() || !total_capital.is_finite() || total_capital <= 0.0 {
            return Vec::new();
        }

        let count = ranked.len().min(self.policy.max_assets);
        let weights = self.ladder(profile.risk_tolerance, count);
        let sum: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if sum <= 0.0 {
            return Vec::new();
        }

        ranked
            .iter()
            .zip(weights)
            .filter(|(_, w)| *w > 0.0)
            .map(|(asset, w)| {
                let weight = w / sum;
                AllocationSuggestion {
                    symbol: asset.symbol().to_string(),
                    weight,
                    amount: total_capital * weight,
                }
            })
            .collect()
    }
}
