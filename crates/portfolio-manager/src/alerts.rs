use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{HoldingBreakdown, PortfolioPolicy};
use analysis_core::RiskLevel;

/// Non-fatal warning about a portfolio. Carries its numbers so callers can
/// render it any way they like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortfolioAdvisory {
    UnpricedPosition { symbol: String },
    SectorConcentration { sector: String, share: f64, limit: f64 },
    AssetConcentration { symbol: String, share: f64, limit: f64 },
    LowDiversification { distinct_sectors: usize, positions: usize },
    FewPositions { positions: usize, min: usize },
    HighRiskMajority { share: f64, limit: f64 },
    ExcessiveAverageYield { average_yield: f64, limit: f64 },
}

impl PortfolioAdvisory {
    pub fn message(&self) -> String {
        match self {
            PortfolioAdvisory::UnpricedPosition { symbol } => format!(
                "{} has no current price; it contributes no shares or income",
                symbol
            ),
            PortfolioAdvisory::SectorConcentration { sector, share, limit } => format!(
                "Sector {} holds {:.1}% of the capital (limit {:.0}%)",
                sector,
                share * 100.0,
                limit * 100.0
            ),
            PortfolioAdvisory::AssetConcentration { symbol, share, limit } => format!(
                "{} holds {:.1}% of the capital (limit {:.0}%)",
                symbol,
                share * 100.0,
                limit * 100.0
            ),
            PortfolioAdvisory::LowDiversification {
                distinct_sectors,
                positions,
            } => format!(
                "{} positions spread over only {} sector(s); consider diversifying",
                positions, distinct_sectors
            ),
            PortfolioAdvisory::FewPositions { positions, min } => format!(
                "Only {} priced position(s); at least {} spread the risk better",
                positions, min
            ),
            PortfolioAdvisory::HighRiskMajority { share, limit } => format!(
                "{:.0}% of positions are high risk (above {:.0}%)",
                share * 100.0,
                limit * 100.0
            ),
            PortfolioAdvisory::ExcessiveAverageYield {
                average_yield,
                limit,
            } => format!(
                "Average dividend yield of {:.1}% is above {:.0}%; \
                 check that the payouts are recurring",
                average_yield * 100.0,
                limit * 100.0
            ),
        }
    }
}

/// Holdings that actually bought shares; the others carry no market exposure
pub fn priced_holdings(holdings: &[HoldingBreakdown]) -> Vec<&HoldingBreakdown> {
    holdings.iter().filter(|h| h.price > 0.0).collect()
}

/// Share of capital held in each sector, relative to the capital of `holdings`
pub fn sector_shares<'a>(holdings: &[&'a HoldingBreakdown]) -> BTreeMap<&'a str, f64> {
    let total: f64 = holdings.iter().map(|h| h.allocated_capital).sum();
    let mut shares: BTreeMap<&str, f64> = BTreeMap::new();
    if total <= 0.0 {
        return shares;
    }
    for &h in holdings {
        *shares.entry(h.sector.as_str()).or_insert(0.0) += h.allocated_capital / total;
    }
    shares
}

/// Evaluate every advisory rule over an aggregated portfolio.
///
/// Unpriced holdings only raise their own advisory; every other rule looks at
/// priced holdings, with `distinct_sectors` and `high_risk_share` computed
/// over the same set.
pub fn evaluate_advisories(
    holdings: &[HoldingBreakdown],
    distinct_sectors: usize,
    high_risk_share: f64,
    policy: &PortfolioPolicy,
) -> Vec<PortfolioAdvisory> {
    let mut advisories = Vec::new();
    if holdings.is_empty() {
        return advisories;
    }

    for h in holdings.iter().filter(|h| h.price <= 0.0) {
        advisories.push(PortfolioAdvisory::UnpricedPosition {
            symbol: h.symbol.clone(),
        });
    }

    let priced = priced_holdings(holdings);
    if priced.is_empty() {
        return advisories;
    }
    let priced_capital: f64 = priced.iter().map(|h| h.allocated_capital).sum();

    for (sector, share) in sector_shares(&priced) {
        if share > policy.sector_concentration_above {
            advisories.push(PortfolioAdvisory::SectorConcentration {
                sector: sector.to_string(),
                share,
                limit: policy.sector_concentration_above,
            });
        }
    }

    if priced_capital > 0.0 {
        for h in &priced {
            let share = h.allocated_capital / priced_capital;
            if share > policy.asset_concentration_above {
                advisories.push(PortfolioAdvisory::AssetConcentration {
                    symbol: h.symbol.clone(),
                    share,
                    limit: policy.asset_concentration_above,
                });
            }
        }
    }

    if distinct_sectors < policy.min_distinct_sectors
        && priced.len() >= policy.diversification_min_positions
    {
        advisories.push(PortfolioAdvisory::LowDiversification {
            distinct_sectors,
            positions: priced.len(),
        });
    }

    if priced.len() < policy.min_positions {
        advisories.push(PortfolioAdvisory::FewPositions {
            positions: priced.len(),
            min: policy.min_positions,
        });
    }

    if high_risk_share > policy.high_risk_majority_above {
        advisories.push(PortfolioAdvisory::HighRiskMajority {
            share: high_risk_share,
            limit: policy.high_risk_majority_above,
        });
    }

    let average_yield =
        priced.iter().map(|h| h.dividend_yield).sum::<f64>() / priced.len() as f64;
    if average_yield > policy.average_yield_above {
        advisories.push(PortfolioAdvisory::ExcessiveAverageYield {
            average_yield,
            limit: policy.average_yield_above,
        });
    }

    for advisory in &advisories {
        tracing::debug!(advisory = %advisory.message(), "portfolio advisory");
    }

    advisories
}

/// Fraction of `holdings` classified high risk
pub fn high_risk_share(holdings: &[&HoldingBreakdown]) -> f64 {
    if holdings.is_empty() {
        return 0.0;
    }
    let high = holdings
        .iter()
        .filter(|h| h.risk_level == RiskLevel::High)
        .count();
    high as f64 / holdings.len() as f64
}
