use std::collections::BTreeSet;

use risk_manager::{PortfolioRiskTier, RiskClassifier};

use crate::alerts::{evaluate_advisories, high_risk_share, priced_holdings};
use crate::models::{HoldingBreakdown, PortfolioPolicy, PortfolioPosition, PortfolioSummary};

pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Turns a list of allocations into income, diversification and risk figures
#[derive(Debug, Clone, Default)]
pub struct PortfolioAggregator {
    classifier: RiskClassifier,
    policy: PortfolioPolicy,
}

impl PortfolioAggregator {
    pub fn new(classifier: RiskClassifier, policy: PortfolioPolicy) -> Self {
        Self { classifier, policy }
    }

    pub fn policy(&self) -> &PortfolioPolicy {
        &self.policy
    }

    fn holding(&self, position: &PortfolioPosition, total_allocated: f64) -> HoldingBreakdown {
        let metrics = &position.metrics;
        let capital = position.allocated_capital.max(0.0);

        // whole shares only; unpriced positions hold nothing
        let shares_held = if metrics.price > 0.0 {
            (capital / metrics.price).floor() as u64
        } else {
            0
        };
        let invested_capital = shares_held as f64 * metrics.price.max(0.0);
        let annual_income = invested_capital * metrics.dividend_yield;

        let sector = match metrics.sector.trim() {
            "" => UNKNOWN_SECTOR.to_string(),
            s => s.to_string(),
        };

        HoldingBreakdown {
            symbol: position.symbol.clone(),
            sector,
            price: metrics.price,
            dividend_yield: metrics.dividend_yield,
            allocated_capital: capital,
            shares_held,
            invested_capital,
            annual_income,
            weight: if total_allocated > 0.0 {
                capital / total_allocated
            } else {
                0.0
            },
            risk_level: self.classifier.classify(metrics),
        }
    }

    pub fn aggregate(&self, positions: &[PortfolioPosition]) -> PortfolioSummary {
        if positions.is_empty() {
            return PortfolioSummary::empty();
        }

        let total_allocated: f64 = positions.iter().map(|p| p.allocated_capital.max(0.0)).sum();
        let holdings: Vec<HoldingBreakdown> = positions
            .iter()
            .map(|p| self.holding(p, total_allocated))
            .collect();

        let total_invested: f64 = holdings.iter().map(|h| h.invested_capital).sum();
        let total_annual_income: f64 = holdings.iter().map(|h| h.annual_income).sum();
        let blended_yield = if total_allocated > 0.0 {
            total_annual_income / total_allocated
        } else {
            0.0
        };
        // unpriced positions hold no shares, so they carry no sector or risk exposure
        let priced = priced_holdings(&holdings);
        let distinct_sectors = priced
            .iter()
            .map(|h| h.sector.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let high_risk_share = high_risk_share(&priced);
        let risk_tier =
            PortfolioRiskTier::from_high_risk_share(high_risk_share, &self.policy.tiers);
        let advisories =
            evaluate_advisories(&holdings, distinct_sectors, high_risk_share, &self.policy);

        tracing::debug!(
            positions = holdings.len(),
            total_allocated,
            total_annual_income,
            advisories = advisories.len(),
            "aggregated portfolio"
        );

        PortfolioSummary {
            total_allocated,
            total_invested,
            total_annual_income,
            monthly_income: total_annual_income / 12.0,
            blended_yield,
            distinct_sectors,
            high_risk_share,
            risk_tier,
            holdings,
            advisories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::PortfolioAdvisory;
    use analysis_core::{MetricsRecord, RiskLevel};

    fn position(
        symbol: &str,
        capital: f64,
        price: f64,
        dy: f64,
        sector: &str,
    ) -> PortfolioPosition {
        PortfolioPosition {
            symbol: symbol.to_string(),
            allocated_capital: capital,
            metrics: MetricsRecord {
                symbol: symbol.to_string(),
                price,
                dividend_yield: dy,
                sector: sector.to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_single_holding_example() {
        let aggregator = PortfolioAggregator::default();
        let summary =
            aggregator.aggregate(&[position("TAEE11.SA", 1000.0, 50.0, 0.06, "Utilities")]);
        let h = &summary.holdings[0];
        assert_eq!(h.shares_held, 20);
        assert!((h.invested_capital - 1000.0).abs() < 1e-9);
        assert!((h.annual_income - 60.0).abs() < 1e-9);
        assert!((summary.blended_yield - 0.06).abs() < 1e-12);
        assert!((summary.monthly_income - 5.0).abs() < 1e-9);
        assert_eq!(summary.distinct_sectors, 1);
    }

    #[test]
    fn test_empty_portfolio_is_all_zero() {
        let summary = PortfolioAggregator::default().aggregate(&[]);
        assert_eq!(summary.total_allocated, 0.0);
        assert_eq!(summary.total_annual_income, 0.0);
        assert_eq!(summary.blended_yield, 0.0);
        assert_eq!(summary.distinct_sectors, 0);
        assert_eq!(summary.high_risk_share, 0.0);
        assert_eq!(summary.risk_tier, PortfolioRiskTier::Low);
        assert!(summary.advisories.is_empty());
        assert!(summary.holdings.is_empty());
    }

    #[test]
    fn test_whole_shares_and_leftover_capital() {
        let aggregator = PortfolioAggregator::default();
        let summary = aggregator.aggregate(&[position("X", 1000.0, 30.0, 0.10, "Energy")]);
        assert_eq!(summary.holdings[0].shares_held, 33);
        assert!((summary.total_invested - 990.0).abs() < 1e-9);
        assert!((summary.total_annual_income - 99.0).abs() < 1e-9);
        // blended over allocated, not invested
        assert!((summary.blended_yield - 0.099).abs() < 1e-12);
    }

    #[test]
    fn test_unpriced_position() {
        let summary = PortfolioAggregator::default().aggregate(&[
            position("A", 500.0, 0.0, 0.08, "Energy"),
            position("B", 500.0, 25.0, 0.08, "Utilities"),
        ]);
        assert_eq!(summary.holdings[0].shares_held, 0);
        assert_eq!(summary.holdings[0].annual_income, 0.0);
        assert!((summary.total_annual_income - 40.0).abs() < 1e-9);
        assert_eq!(
            summary.advisories[0],
            PortfolioAdvisory::UnpricedPosition {
                symbol: "A".to_string()
            }
        );
    }

    #[test]
    fn test_zero_capital_is_guarded() {
        let summary = PortfolioAggregator::default().aggregate(&[
            position("A", 0.0, 10.0, 0.08, "Energy"),
            position("B", 0.0, 10.0, 0.08, "Utilities"),
        ]);
        assert_eq!(summary.total_allocated, 0.0);
        assert_eq!(summary.blended_yield, 0.0);
        assert!(summary.holdings.iter().all(|h| h.weight == 0.0));
    }

    #[test]
    fn test_risk_tier_from_holdings() {
        let mut risky = position("A", 1000.0, 10.0, 0.05, "Energy");
        risky.metrics.debt_to_equity = 2.0;
        risky.metrics.price_to_earnings = 30.0;
        let summary = PortfolioAggregator::default().aggregate(&[
            risky,
            position("B", 1000.0, 10.0, 0.05, "Utilities"),
            position("C", 1000.0, 10.0, 0.05, "Financial Services"),
        ]);
        assert_eq!(summary.holdings[0].risk_level, RiskLevel::High);
        assert!((summary.high_risk_share - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.risk_tier, PortfolioRiskTier::Moderate);
        assert_eq!(summary.distinct_sectors, 3);
        // three equal positions are each above the 30% single-asset limit
        assert_eq!(
            summary
                .advisories
                .iter()
                .filter(|a| matches!(a, PortfolioAdvisory::AssetConcentration { .. }))
                .count(),
            3
        );
        assert!(summary.advisories.contains(&PortfolioAdvisory::FewPositions {
            positions: 3,
            min: 5
        }));
        assert_eq!(summary.advisories.len(), 4);
    }

    #[test]
    fn test_unpriced_positions_carry_no_exposure() {
        let mut levered_a = position("TAEE11.SA", 1000.0, 0.0, 0.08, "Utilities");
        levered_a.metrics.debt_to_equity = 2.0;
        levered_a.metrics.price_to_earnings = 30.0;
        let mut levered_b = position("ITUB4.SA", 1000.0, 0.0, 0.08, "Financial Services");
        levered_b.metrics.debt_to_equity = 2.0;
        levered_b.metrics.price_to_earnings = 30.0;

        let summary = PortfolioAggregator::default().aggregate(&[
            position("PETR4.SA", 1000.0, 10.0, 0.08, "Energy"),
            position("PRIO3.SA", 1000.0, 10.0, 0.08, "Energy"),
            position("RECV3.SA", 1000.0, 10.0, 0.08, "Energy"),
            levered_a,
            levered_b,
        ]);

        assert_eq!(summary.total_allocated, 5000.0);
        assert_eq!(summary.total_invested, 3000.0);
        assert_eq!(summary.distinct_sectors, 1);
        assert_eq!(summary.high_risk_share, 0.0);
        assert_eq!(summary.risk_tier, PortfolioRiskTier::Low);
        assert!(summary.advisories.contains(&PortfolioAdvisory::LowDiversification {
            distinct_sectors: 1,
            positions: 3,
        }));
        assert_eq!(
            summary
                .advisories
                .iter()
                .filter(|a| matches!(a, PortfolioAdvisory::UnpricedPosition { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_blank_sector_is_grouped_as_unknown() {
        let summary = PortfolioAggregator::default().aggregate(&[
            position("A", 100.0, 10.0, 0.05, ""),
            position("B", 100.0, 10.0, 0.05, "  "),
        ]);
        assert_eq!(summary.distinct_sectors, 1);
        assert_eq!(summary.holdings[1].sector, UNKNOWN_SECTOR);
    }
}
