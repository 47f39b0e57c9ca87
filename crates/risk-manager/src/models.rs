use analysis_core::RiskLevel;
use serde::{Deserialize, Serialize};

/// Point weights and cut-points for single-asset risk classification.
///
/// Several tunings of this policy circulate; the default is the one with the
/// volatility (beta) term. Use [`RiskPolicy::fundamentals_only`] for the
/// variant that scores leverage, valuation and yield alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Debt/equity above this adds `leverage_high_points`
    pub leverage_high: f64,
    pub leverage_high_points: i32,
    /// Debt/equity above this (but not above `leverage_high`) adds `leverage_elevated_points`
    pub leverage_elevated: f64,
    pub leverage_elevated_points: i32,
    /// P/E above this adds `valuation_high_points`
    pub valuation_high: f64,
    pub valuation_high_points: i32,
    pub valuation_elevated: f64,
    pub valuation_elevated_points: i32,
    /// Yields above this are themselves a warning sign
    pub abnormal_yield: f64,
    pub abnormal_yield_points: i32,
    pub beta_high: f64,
    pub beta_high_points: i32,
    pub beta_low: f64,
    /// Points removed for low-volatility assets
    pub beta_low_bonus: i32,
    /// Minimum total points for `High`
    pub high_min_points: i32,
    /// Minimum total points for `Medium`
    pub medium_min_points: i32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            leverage_high: 1.0,
            leverage_high_points: 2,
            leverage_elevated: 0.5,
            leverage_elevated_points: 1,
            valuation_high: 25.0,
            valuation_high_points: 2,
            valuation_elevated: 15.0,
            valuation_elevated_points: 1,
            abnormal_yield: 0.12,
            abnormal_yield_points: 1,
            beta_high: 1.2,
            beta_high_points: 1,
            beta_low: 0.8,
            beta_low_bonus: 1,
            high_min_points: 4,
            medium_min_points: 2,
        }
    }
}

impl RiskPolicy {
    /// Leverage, valuation and yield only; beta never contributes
    pub fn fundamentals_only() -> Self {
        Self {
            beta_high_points: 0,
            beta_low_bonus: 0,
            ..Self::default()
        }
    }

    pub fn level_for_points(&self, points: i32) -> RiskLevel {
        if points >= self.high_min_points {
            RiskLevel::High
        } else if points >= self.medium_min_points {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Individual signal that moved the risk point total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSignal {
    HighLeverage,
    ElevatedLeverage,
    HighValuation,
    ElevatedValuation,
    AbnormalYield,
    HighVolatility,
    LowVolatility,
}

impl RiskSignal {
    pub fn label(&self) -> &'static str {
        match self {
            RiskSignal::HighLeverage => "High leverage",
            RiskSignal::ElevatedLeverage => "Elevated leverage",
            RiskSignal::HighValuation => "High earnings multiple",
            RiskSignal::ElevatedValuation => "Elevated earnings multiple",
            RiskSignal::AbnormalYield => "Abnormally high dividend yield",
            RiskSignal::HighVolatility => "Above-market volatility",
            RiskSignal::LowVolatility => "Below-market volatility",
        }
    }
}

/// Full classification result: points, tier and the signals behind them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub points: i32,
    pub level: RiskLevel,
    pub signals: Vec<(RiskSignal, i32)>,
}

impl RiskAssessment {
    pub fn has_signal(&self, signal: RiskSignal) -> bool {
        self.signals.iter().any(|(s, _)| *s == signal)
    }
}

/// Cut-points mapping the share of high-risk positions to a portfolio tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioTierThresholds {
    pub very_high_above: f64,
    pub high_above: f64,
    pub moderate_above: f64,
}

impl Default for PortfolioTierThresholds {
    fn default() -> Self {
        Self {
            very_high_above: 0.7,
            high_above: 0.4,
            moderate_above: 0.2,
        }
    }
}

/// Overall risk tier of a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioRiskTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PortfolioRiskTier {
    pub fn from_high_risk_share(share: f64, thresholds: &PortfolioTierThresholds) -> Self {
        match share {
            s if s > thresholds.very_high_above => PortfolioRiskTier::VeryHigh,
            s if s > thresholds.high_above => PortfolioRiskTier::High,
            s if s > thresholds.moderate_above => PortfolioRiskTier::Moderate,
            _ => PortfolioRiskTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioRiskTier::Low => "low",
            PortfolioRiskTier::Moderate => "moderate",
            PortfolioRiskTier::High => "high",
            PortfolioRiskTier::VeryHigh => "very high",
        }
    }
}
