//! Profile Ranking Data Models

use analysis_core::ScoredAsset;
use serde::{Deserialize, Serialize};

/// Compatibility rules and profile adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPolicy {
    /// High-risk assets pass a moderate profile only at or above this score
    pub moderate_high_risk_min_score: f64,
    /// The sector rule is enforced only for preference sets at least this large
    pub sector_rule_min_preferences: usize,
    /// Yield above which an income objective earns the bonus
    pub income_yield_above: f64,
    pub income_bonus: f64,
    /// Projected dividend growth above which a growth objective earns the bonus
    pub growth_estimate_above: f64,
    pub growth_bonus: f64,
    pub beginner_low_risk_bonus: f64,
    pub beginner_high_risk_penalty: f64,
    /// Adjusted scores are re-clamped to [0, score_cap]
    pub score_cap: f64,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            moderate_high_risk_min_score: 7.0,
            sector_rule_min_preferences: 3,
            income_yield_above: 0.08,
            income_bonus: 0.5,
            growth_estimate_above: 0.10,
            growth_bonus: 0.5,
            beginner_low_risk_bonus: 0.3,
            beginner_high_risk_penalty: 0.5,
            score_cap: 10.0,
        }
    }
}

/// Why an asset was excluded for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// Conservative profiles never hold high-risk assets
    ConservativeHighRisk,
    /// Moderate profiles hold high-risk assets only when the score clears the bar
    ModerateHighRiskBelowScore { score: f64, required: f64 },
    SectorNotPreferred { sector: String },
}

impl RejectionReason {
    pub fn message(&self) -> String {
        match self {
            RejectionReason::ConservativeHighRisk => {
                "High-risk asset is incompatible with a conservative profile".to_string()
            }
            RejectionReason::ModerateHighRiskBelowScore { score, required } => format!(
                "High-risk asset scores {:.1}, below the {:.1} a moderate profile requires",
                score, required
            ),
            RejectionReason::SectorNotPreferred { sector } => {
                if sector.is_empty() {
                    "Sector unknown and not among the preferred sectors".to_string()
                } else {
                    format!("Sector {} is not among the preferred sectors", sector)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub symbol: String,
    pub reasons: Vec<RejectionReason>,
}

/// Profile-driven bonus or penalty applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAdjustment {
    IncomeYield,
    DividendGrowth,
    BeginnerLowRisk,
    BeginnerHighRisk,
}

impl ScoreAdjustment {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreAdjustment::IncomeYield => "high yield suits an income objective",
            ScoreAdjustment::DividendGrowth => "dividend growth suits a growth objective",
            ScoreAdjustment::BeginnerLowRisk => "low risk suits a beginner",
            ScoreAdjustment::BeginnerHighRisk => "high risk is unsuitable for a beginner",
        }
    }
}

/// A scored asset that survived the compatibility filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAsset {
    pub asset: ScoredAsset,
    /// Bounded score plus profile adjustments, re-clamped
    pub adjusted_score: f64,
    pub adjustments: Vec<(ScoreAdjustment, f64)>,
}

impl RankedAsset {
    pub fn symbol(&self) -> &str {
        self.asset.symbol()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Best first, truncated to the requested limit
    pub ranked: Vec<RankedAsset>,
    /// Input order
    pub rejected: Vec<Rejection>,
    /// Assets that passed the filter before truncation
    pub total_passed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSuggestion {
    pub symbol: String,
    /// Fraction of total capital, all weights of a plan sum to 1
    pub weight: f64,
    pub amount: f64,
}
