use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Fundamental snapshot for one asset at one point in time.
///
/// Every numeric field defaults to 0 when the market-data provider has no
/// value for it; 0 is read as "unknown" by every downstream component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct MetricsRecord {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    /// Fraction of price paid out per year (0.06 = 6%)
    pub dividend_yield: f64,
    /// 0 when earnings are negative or not meaningful
    pub price_to_earnings: f64,
    pub price_to_book: f64,
    pub return_on_equity: f64,
    pub free_cash_flow: f64,
    pub payout_ratio: f64,
    pub debt_to_equity: f64,
    pub net_margin: f64,
    pub sector: String,
    /// Market-relative volatility, 0 = unknown
    pub beta: f64,
    /// Projected annual dividend growth, when an estimate exists
    pub dividend_growth_estimate: Option<f64>,
}

impl MetricsRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Discrete risk tier of a single asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Per-term contributions to the raw score, each already capped and weighted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoreBreakdown {
    pub yield_term: f64,
    pub earnings_multiple_term: f64,
    pub book_multiple_term: f64,
    pub profitability_term: f64,
    pub cash_generation_term: f64,
    pub payout_term: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.yield_term
            + self.earnings_multiple_term
            + self.book_multiple_term
            + self.profitability_term
            + self.cash_generation_term
            + self.payout_term
    }
}

/// Opportunity score of one asset. Recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoreResult {
    /// Display score in [0, 10]
    pub bounded_score: f64,
    /// Unbounded sum of the score terms
    pub raw_score: f64,
    /// Raw score exceeds the display scale
    pub is_exceptional: bool,
    pub risk_level: RiskLevel,
    pub breakdown: ScoreBreakdown,
}

/// Data-quality notice raised while normalizing a dividend yield.
/// Informational only, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum YieldAdvisory {
    /// Reported yield was negative, missing or not a number; treated as 0
    InvalidReported,
    /// Reported yield was above the plausibility cap and was clamped
    ClampedToCap { reported: f64, cap: f64 },
}

impl YieldAdvisory {
    pub fn message(&self) -> String {
        match self {
            YieldAdvisory::InvalidReported => {
                "Reported dividend yield was negative or unavailable and was set to 0".to_string()
            }
            YieldAdvisory::ClampedToCap { reported, cap } => format!(
                "Reported dividend yield of {:.1}% is above {:.0}% per year; this may be a data \
                 error or a non-recurring distribution. Check official filings before investing.",
                reported * 100.0,
                cap * 100.0
            ),
        }
    }
}

/// A normalized metrics record together with its score.
/// The unit consumed by ranking, explanation and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoredAsset {
    pub metrics: MetricsRecord,
    pub score: ScoreResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_advisory: Option<YieldAdvisory>,
}

impl ScoredAsset {
    pub fn symbol(&self) -> &str {
        &self.metrics.symbol
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.score.risk_level
    }

    pub fn bounded_score(&self) -> f64 {
        self.score.bounded_score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum InvestmentHorizon {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum InvestmentObjective {
    #[default]
    Income,
    Growth,
    Preservation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Investor profile supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct InvestorProfile {
    pub name: Option<String>,
    pub risk_tolerance: RiskTolerance,
    pub horizon: InvestmentHorizon,
    pub objective: InvestmentObjective,
    pub experience: ExperienceLevel,
    pub available_capital: f64,
    /// Empty, or containing "all", means no sector restriction
    pub preferred_sectors: BTreeSet<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvestorProfile {
    /// Sector preference set, or `None` when the profile does not restrict sectors
    pub fn sector_restriction(&self) -> Option<&BTreeSet<String>> {
        let unrestricted = self.preferred_sectors.is_empty()
            || self
                .preferred_sectors
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case("all"));
        if unrestricted {
            None
        } else {
            Some(&self.preferred_sectors)
        }
    }

    pub fn prefers_sector(&self, sector: &str) -> bool {
        match self.sector_restriction() {
            None => true,
            Some(sectors) => sectors
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(sector.trim())),
        }
    }

    /// Boundary check for caller-supplied profiles
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.available_capital.is_finite() || self.available_capital < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "available capital must be a non-negative amount, got {}",
                self.available_capital
            )));
        }
        Ok(())
    }
}
