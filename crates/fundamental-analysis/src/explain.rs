//! Plain-text narration of a score.
//!
//! Reuses the scoring anchors and risk cut-points; never changes the score
//! or the risk level it describes.

use analysis_core::{MetricsRecord, RiskLevel, ScoreResult, ScoredAsset, YieldAdvisory};
use risk_manager::RiskPolicy;
use serde::{Deserialize, Serialize};

use crate::ScoringWeights;

/// Cut-points used only for narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeThresholds {
    /// Yield below this is called out as weak
    pub low_yield_below: f64,
    pub strong_roe_above: f64,
    pub weak_roe_below: f64,
    pub strong_opportunity_min: f64,
    pub good_fit_min: f64,
    pub caution_min: f64,
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        Self {
            low_yield_below: 0.05,
            strong_roe_above: 0.15,
            weak_roe_below: 0.10,
            strong_opportunity_min: 8.0,
            good_fit_min: 6.0,
            caution_min: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongOpportunity,
    GoodFit,
    ProceedWithCaution,
    NotRecommended,
}

impl Recommendation {
    pub fn from_score(score: f64, thresholds: &NarrativeThresholds) -> Self {
        if score >= thresholds.strong_opportunity_min {
            Recommendation::StrongOpportunity
        } else if score >= thresholds.good_fit_min {
            Recommendation::GoodFit
        } else if score >= thresholds.caution_min {
            Recommendation::ProceedWithCaution
        } else {
            Recommendation::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongOpportunity => "strong opportunity",
            Recommendation::GoodFit => "good fit for diversification",
            Recommendation::ProceedWithCaution => "proceed with caution",
            Recommendation::NotRecommended => "not recommended now",
        }
    }
}

/// Narrative for one scored asset. Factor lists keep evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub symbol: String,
    pub recommendation: Recommendation,
    pub label: String,
    pub summary: String,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
    pub neutral_factors: Vec<String>,
    pub risk_caveats: Vec<String>,
    pub bounded_score: f64,
    pub risk_level: RiskLevel,
}

#[derive(Default)]
struct Factors {
    positive: Vec<String>,
    negative: Vec<String>,
    neutral: Vec<String>,
    caveats: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Explainer {
    weights: ScoringWeights,
    risk: RiskPolicy,
    thresholds: NarrativeThresholds,
}

impl Explainer {
    pub fn new(weights: ScoringWeights, risk: RiskPolicy, thresholds: NarrativeThresholds) -> Self {
        Self {
            weights,
            risk,
            thresholds,
        }
    }

    pub fn explain_asset(&self, asset: &ScoredAsset) -> Explanation {
        self.explain(&asset.metrics, &asset.score, asset.yield_advisory.as_ref())
    }

    pub fn explain(
        &self,
        metrics: &MetricsRecord,
        score: &ScoreResult,
        advisory: Option<&YieldAdvisory>,
    ) -> Explanation {
        let mut f = Factors::default();

        self.yield_factor(metrics, &mut f);
        self.valuation_factors(metrics, &mut f);
        self.profitability_factors(metrics, &mut f);
        self.payout_factor(metrics, &mut f);
        self.risk_caveats(metrics, score, &mut f);

        if score.is_exceptional {
            f.positive.push(format!(
                "Exceptional opportunity: fundamentals score {:.1}, beyond the {:.0}-point scale",
                score.raw_score, self.weights.score_cap
            ));
        }

        if let Some(advisory) = advisory {
            f.caveats.push(advisory.message());
        }

        let recommendation = Recommendation::from_score(score.bounded_score, &self.thresholds);

        Explanation {
            symbol: metrics.symbol.clone(),
            recommendation,
            label: recommendation.label().to_string(),
            summary: Self::summary(metrics, score, recommendation),
            positive_factors: f.positive,
            negative_factors: f.negative,
            neutral_factors: f.neutral,
            risk_caveats: f.caveats,
            bounded_score: score.bounded_score,
            risk_level: score.risk_level,
        }
    }

    fn yield_factor(&self, m: &MetricsRecord, f: &mut Factors) {
        let pct = m.dividend_yield * 100.0;
        if m.dividend_yield > self.weights.yield_anchor {
            f.positive.push(format!("Attractive dividend yield of {:.1}%", pct));
        } else if m.dividend_yield < self.thresholds.low_yield_below {
            f.negative.push(format!("Low dividend yield of {:.1}%", pct));
        } else {
            f.neutral.push(format!("Moderate dividend yield of {:.1}%", pct));
        }
    }

    fn valuation_factors(&self, m: &MetricsRecord, f: &mut Factors) {
        let pe = m.price_to_earnings;
        if pe <= 0.0 {
            f.neutral.push("P/E not meaningful (negative or unavailable earnings)".to_string());
        } else if pe < self.weights.earnings_multiple_anchor {
            f.positive.push(format!("Attractive P/E of {:.1}", pe));
        } else if pe > self.risk.valuation_high {
            f.negative.push(format!("High P/E of {:.1}", pe));
        } else {
            f.neutral.push(format!("Fair P/E of {:.1}", pe));
        }

        let pb = m.price_to_book;
        if pb > 0.0 && pb <= self.weights.book_multiple_anchor {
            f.positive.push(format!("Trading at {:.2}x book value", pb));
        } else if pb > self.weights.book_multiple_anchor {
            f.neutral.push(format!("Price/book of {:.2}", pb));
        }
    }

    fn profitability_factors(&self, m: &MetricsRecord, f: &mut Factors) {
        let roe = m.return_on_equity;
        if roe > self.thresholds.strong_roe_above {
            f.positive.push(format!("Strong return on equity of {:.1}%", roe * 100.0));
        } else if roe < self.thresholds.weak_roe_below {
            f.negative.push(format!("Weak return on equity of {:.1}%", roe * 100.0));
        } else {
            f.neutral.push(format!("Return on equity of {:.1}%", roe * 100.0));
        }

        let fcf = m.free_cash_flow;
        if fcf >= self.weights.cash_flow_anchor {
            f.positive.push(format!(
                "Robust free cash flow of {:.1} billion",
                fcf / 1e9
            ));
        } else if fcf > 0.0 {
            f.neutral.push(format!("Positive free cash flow of {:.0}", fcf));
        } else if fcf < 0.0 {
            f.negative.push("Negative free cash flow".to_string());
        } else {
            f.neutral.push("Free cash flow not available".to_string());
        }
    }

    fn payout_factor(&self, m: &MetricsRecord, f: &mut Factors) {
        let payout = m.payout_ratio;
        if payout >= self.weights.payout_band_low && payout <= self.weights.payout_band_high {
            f.positive.push(format!("Sustainable payout ratio of {:.0}%", payout * 100.0));
        } else if payout > 0.0 {
            f.caveats.push(format!(
                "Payout ratio of {:.0}% is outside the {:.0}-{:.0}% comfort band",
                payout * 100.0,
                self.weights.payout_band_low * 100.0,
                self.weights.payout_band_high * 100.0
            ));
        }
    }

    fn risk_caveats(&self, m: &MetricsRecord, score: &ScoreResult, f: &mut Factors) {
        match score.risk_level {
            RiskLevel::Low => f.positive.push("Low overall risk profile".to_string()),
            RiskLevel::Medium => {}
            RiskLevel::High => f
                .caveats
                .push("High overall risk: size this position carefully".to_string()),
        }

        if m.debt_to_equity > self.risk.leverage_high {
            f.caveats.push(format!(
                "High leverage: debt/equity of {:.2}",
                m.debt_to_equity
            ));
        }
        if m.dividend_yield > self.risk.abnormal_yield {
            f.caveats.push(format!(
                "Unusually high yield of {:.1}% may not be sustainable",
                m.dividend_yield * 100.0
            ));
        }
        if m.beta > self.risk.beta_high {
            f.caveats.push(format!("Above-market volatility (beta {:.2})", m.beta));
        }
    }

    fn summary(m: &MetricsRecord, score: &ScoreResult, recommendation: Recommendation) -> String {
        let name = m.display_name();
        match recommendation {
            Recommendation::StrongOpportunity => format!(
                "{} scores {:.1}/10 with {} risk: solid fundamentals for an income portfolio.",
                name,
                score.bounded_score,
                score.risk_level.as_str()
            ),
            Recommendation::GoodFit => format!(
                "{} scores {:.1}/10 with {} risk: a reasonable addition to a diversified portfolio.",
                name,
                score.bounded_score,
                score.risk_level.as_str()
            ),
            Recommendation::ProceedWithCaution => format!(
                "{} scores {:.1}/10 with {} risk: review the caveats before investing.",
                name,
                score.bounded_score,
                score.risk_level.as_str()
            ),
            Recommendation::NotRecommended => format!(
                "{} scores {:.1}/10 with {} risk: fundamentals are weak at current prices.",
                name,
                score.bounded_score,
                score.risk_level.as_str()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScoreEngine, YieldPolicy};

    fn strong_record() -> MetricsRecord {
        MetricsRecord {
            symbol: "ITSA4.SA".to_string(),
            name: Some("Itausa".to_string()),
            price: 10.0,
            dividend_yield: 0.10,
            price_to_earnings: 10.0,
            price_to_book: 0.8,
            return_on_equity: 0.18,
            free_cash_flow: 2e9,
            payout_ratio: 0.45,
            ..Default::default()
        }
    }

    #[test]
    fn test_strong_asset_narrative() {
        let record = strong_record();
        let score = ScoreEngine::default().compute(&record);
        let explanation = Explainer::default().explain(&record, &score, None);

        assert_eq!(explanation.recommendation, Recommendation::StrongOpportunity);
        assert_eq!(explanation.label, "strong opportunity");
        assert!(explanation.negative_factors.is_empty());
        assert!(explanation
            .positive_factors
            .iter()
            .any(|s| s.contains("Exceptional opportunity")));
        assert!(explanation.positive_factors[0].contains("10.0%"));
        assert!(explanation.summary.starts_with("Itausa"));
        assert_eq!(explanation.bounded_score, score.bounded_score);
        assert_eq!(explanation.risk_level, score.risk_level);
    }

    #[test]
    fn test_weak_asset_narrative() {
        let record = MetricsRecord {
            symbol: "WEAK".to_string(),
            dividend_yield: 0.02,
            price_to_earnings: 40.0,
            return_on_equity: 0.05,
            free_cash_flow: -1e8,
            payout_ratio: 0.9,
            debt_to_equity: 1.8,
            beta: 1.5,
            ..Default::default()
        };
        let score = ScoreEngine::default().compute(&record);
        let explanation = Explainer::default().explain(&record, &score, None);

        assert_eq!(explanation.recommendation, Recommendation::NotRecommended);
        assert_eq!(explanation.negative_factors.len(), 4);
        assert!(explanation.risk_caveats.iter().any(|s| s.contains("Payout ratio of 90%")));
        assert!(explanation.risk_caveats.iter().any(|s| s.contains("leverage")));
        assert!(explanation.risk_caveats.iter().any(|s| s.contains("beta 1.50")));
        assert!(explanation.risk_caveats.iter().any(|s| s.starts_with("High overall risk")));
    }

    #[test]
    fn test_label_thresholds() {
        let t = NarrativeThresholds::default();
        assert_eq!(Recommendation::from_score(8.0, &t), Recommendation::StrongOpportunity);
        assert_eq!(Recommendation::from_score(7.99, &t), Recommendation::GoodFit);
        assert_eq!(Recommendation::from_score(6.0, &t), Recommendation::GoodFit);
        assert_eq!(Recommendation::from_score(4.0, &t), Recommendation::ProceedWithCaution);
        assert_eq!(Recommendation::from_score(3.9, &t), Recommendation::NotRecommended);
        assert_eq!(Recommendation::NotRecommended.label(), "not recommended now");
    }

    #[test]
    fn test_yield_advisory_becomes_caveat() {
        let engine = ScoreEngine::default();
        let asset = engine.score_asset(
            MetricsRecord {
                dividend_yield: 45.0,
                ..MetricsRecord::new("ODD")
            },
            &YieldPolicy::default(),
        );
        let explanation = Explainer::default().explain_asset(&asset);
        assert!(explanation
            .risk_caveats
            .iter()
            .any(|s| s.contains("45.0%") && s.contains("30%")));
    }

    #[test]
    fn test_unknown_earnings_are_neutral() {
        let record = MetricsRecord::new("NOPE");
        let score = ScoreEngine::default().compute(&record);
        let explanation = Explainer::default().explain(&record, &score, None);
        assert!(explanation
            .neutral_factors
            .iter()
            .any(|s| s.starts_with("P/E not meaningful")));
        assert!(explanation
            .neutral_factors
            .iter()
            .any(|s| s == "Free cash flow not available"));
    }
}
