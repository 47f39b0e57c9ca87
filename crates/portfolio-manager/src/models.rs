use analysis_core::{EngineError, MetricsRecord, RiskLevel};
use risk_manager::{PortfolioRiskTier, PortfolioTierThresholds};
use serde::{Deserialize, Serialize};

use crate::alerts::PortfolioAdvisory;

/// An asset paired with the capital the investor committed to it.
/// Never mutated in place; recomputation always takes a fresh list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub allocated_capital: f64,
    pub metrics: MetricsRecord,
}

impl PortfolioPosition {
    /// Checked constructor for caller-supplied allocations
    pub fn new(
        symbol: impl Into<String>,
        allocated_capital: f64,
        metrics: MetricsRecord,
    ) -> Result<Self, EngineError> {
        let symbol = symbol.into();
        if !allocated_capital.is_finite() || allocated_capital < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "allocated capital for {} must be a non-negative amount, got {}",
                symbol, allocated_capital
            )));
        }
        Ok(Self {
            symbol,
            allocated_capital,
            metrics,
        })
    }
}

/// Per-position result of an aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingBreakdown {
    pub symbol: String,
    pub sector: String,
    pub price: f64,
    pub dividend_yield: f64,
    pub allocated_capital: f64,
    pub shares_held: u64,
    pub invested_capital: f64,
    pub annual_income: f64,
    /// Share of total allocated capital
    pub weight: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_allocated: f64,
    pub total_invested: f64,
    pub total_annual_income: f64,
    pub monthly_income: f64,
    /// Annual income over allocated capital, 0 for an empty portfolio
    pub blended_yield: f64,
    pub distinct_sectors: usize,
    pub high_risk_share: f64,
    pub risk_tier: PortfolioRiskTier,
    pub holdings: Vec<HoldingBreakdown>,
    pub advisories: Vec<PortfolioAdvisory>,
}

impl PortfolioSummary {
    pub fn empty() -> Self {
        Self {
            total_allocated: 0.0,
            total_invested: 0.0,
            total_annual_income: 0.0,
            monthly_income: 0.0,
            blended_yield: 0.0,
            distinct_sectors: 0,
            high_risk_share: 0.0,
            risk_tier: PortfolioRiskTier::Low,
            holdings: Vec::new(),
            advisories: Vec::new(),
        }
    }
}

/// Concentration, diversification and compliance limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioPolicy {
    pub sector_concentration_above: f64,
    pub asset_concentration_above: f64,
    /// Fewer distinct sectors than this is a diversification warning
    pub min_distinct_sectors: usize,
    /// ...but only once the portfolio holds at least this many positions
    pub diversification_min_positions: usize,
    /// Fewer priced positions than this is a warning on its own
    pub min_positions: usize,
    pub high_risk_majority_above: f64,
    pub average_yield_above: f64,
    pub tiers: PortfolioTierThresholds,
}

impl Default for PortfolioPolicy {
    fn default() -> Self {
        Self {
            sector_concentration_above: 0.40,
            asset_concentration_above: 0.30,
            min_distinct_sectors: 3,
            diversification_min_positions: 3,
            min_positions: 5,
            high_risk_majority_above: 0.5,
            average_yield_above: 0.15,
            tiers: PortfolioTierThresholds::default(),
        }
    }
}
