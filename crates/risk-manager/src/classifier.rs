//! Single-asset risk classification
//!
//! Accumulates points from leverage, valuation, yield and volatility signals
//! and maps the total to a discrete tier.

use analysis_core::{MetricsRecord, RiskLevel};

use crate::models::{RiskAssessment, RiskPolicy, RiskSignal};

#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    policy: RiskPolicy,
}

impl RiskClassifier {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    pub fn classify(&self, metrics: &MetricsRecord) -> RiskLevel {
        self.assess(metrics).level
    }

    /// Classify and report every signal that contributed points
    pub fn assess(&self, metrics: &MetricsRecord) -> RiskAssessment {
        let p = &self.policy;
        let mut signals: Vec<(RiskSignal, i32)> = Vec::new();

        if metrics.debt_to_equity > p.leverage_high {
            signals.push((RiskSignal::HighLeverage, p.leverage_high_points));
        } else if metrics.debt_to_equity > p.leverage_elevated {
            signals.push((RiskSignal::ElevatedLeverage, p.leverage_elevated_points));
        }

        if metrics.price_to_earnings > p.valuation_high {
            signals.push((RiskSignal::HighValuation, p.valuation_high_points));
        } else if metrics.price_to_earnings > p.valuation_elevated {
            signals.push((RiskSignal::ElevatedValuation, p.valuation_elevated_points));
        }

        if metrics.dividend_yield > p.abnormal_yield {
            signals.push((RiskSignal::AbnormalYield, p.abnormal_yield_points));
        }

        // beta of 0 means the provider had no value
        if metrics.beta > p.beta_high {
            signals.push((RiskSignal::HighVolatility, p.beta_high_points));
        } else if metrics.beta > 0.0 && metrics.beta < p.beta_low {
            signals.push((RiskSignal::LowVolatility, -p.beta_low_bonus));
        }

        signals.retain(|(_, pts)| *pts != 0);
        let points: i32 = signals.iter().map(|(_, pts)| pts).sum();
        let level = p.level_for_points(points);

        tracing::debug!(
            symbol = %metrics.symbol,
            points,
            risk = level.as_str(),
            "classified risk"
        );

        RiskAssessment {
            points,
            level,
            signals,
        }
    }
}
