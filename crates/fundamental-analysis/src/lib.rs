pub mod explain;
pub mod validation;

pub use explain::{Explainer, Explanation, NarrativeThresholds, Recommendation};
pub use validation::{normalize_dividend_yield, normalize_metrics, NormalizedYield, YieldPolicy};

use analysis_core::{MetricsRecord, ScoreBreakdown, ScoreResult, ScoredAsset};
use risk_manager::RiskClassifier;
use serde::{Deserialize, Serialize};

/// Anchors, weights and caps of the opportunity score.
///
/// Each term is `min(metric / anchor, 1) * weight` (or `min(anchor / multiple, 1) * weight`
/// for the valuation multiples), so no single factor can exceed its budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Yield considered excellent
    pub yield_anchor: f64,
    pub yield_weight: f64,
    /// P/E at or below which the earnings-multiple term is full
    pub earnings_multiple_anchor: f64,
    pub earnings_multiple_weight: f64,
    /// P/B at or below which the book-multiple term is full
    pub book_multiple_anchor: f64,
    pub book_multiple_weight: f64,
    pub roe_anchor: f64,
    pub roe_weight: f64,
    /// Free cash flow (absolute currency units) that earns the full term
    pub cash_flow_anchor: f64,
    pub cash_flow_weight: f64,
    pub payout_band_low: f64,
    pub payout_band_high: f64,
    pub payout_in_band: f64,
    pub payout_out_of_band: f64,
    /// Top of the display scale
    pub score_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            yield_anchor: 0.08,
            yield_weight: 4.0,
            earnings_multiple_anchor: 15.0,
            earnings_multiple_weight: 1.5,
            book_multiple_anchor: 2.0,
            book_multiple_weight: 1.5,
            roe_anchor: 0.20,
            roe_weight: 3.0,
            cash_flow_anchor: 1e9,
            cash_flow_weight: 0.5,
            payout_band_low: 0.3,
            payout_band_high: 0.6,
            payout_in_band: 1.0,
            payout_out_of_band: 0.5,
            score_cap: 10.0,
        }
    }
}

impl ScoringWeights {
    /// Largest raw score these weights can produce, every term at its cap
    pub fn max_raw_score(&self) -> f64 {
        self.yield_weight
            + self.earnings_multiple_weight
            + self.book_multiple_weight
            + self.roe_weight
            + self.cash_flow_weight
            + self.payout_in_band.max(self.payout_out_of_band)
    }
}

/// Weighted-sum opportunity scorer. Pure: no caching, no I/O.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    weights: ScoringWeights,
    classifier: RiskClassifier,
}

impl ScoreEngine {
    pub fn new(weights: ScoringWeights, classifier: RiskClassifier) -> Self {
        Self {
            weights,
            classifier,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Capped ratio of `value` to `anchor`, 0 unless `value` is positive
    fn capped_ratio(value: f64, anchor: f64) -> f64 {
        if value > 0.0 && anchor > 0.0 {
            (value / anchor).min(1.0)
        } else {
            0.0
        }
    }

    /// Capped inverse ratio for valuation multiples: cheaper is better
    fn capped_inverse_ratio(multiple: f64, anchor: f64) -> f64 {
        if multiple > 0.0 {
            (anchor / multiple).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn breakdown(&self, metrics: &MetricsRecord) -> ScoreBreakdown {
        let w = &self.weights;

        let payout_term = if metrics.payout_ratio >= w.payout_band_low
            && metrics.payout_ratio <= w.payout_band_high
        {
            w.payout_in_band
        } else if metrics.payout_ratio > 0.0 {
            w.payout_out_of_band
        } else {
            0.0
        };

        ScoreBreakdown {
            yield_term: Self::capped_ratio(metrics.dividend_yield, w.yield_anchor) * w.yield_weight,
            earnings_multiple_term: Self::capped_inverse_ratio(
                metrics.price_to_earnings,
                w.earnings_multiple_anchor,
            ) * w.earnings_multiple_weight,
            book_multiple_term: Self::capped_inverse_ratio(
                metrics.price_to_book,
                w.book_multiple_anchor,
            ) * w.book_multiple_weight,
            profitability_term: Self::capped_ratio(metrics.return_on_equity, w.roe_anchor)
                * w.roe_weight,
            cash_generation_term: Self::capped_ratio(metrics.free_cash_flow, w.cash_flow_anchor)
                * w.cash_flow_weight,
            payout_term,
        }
    }

    /// Score one (already normalized) record
    pub fn compute(&self, metrics: &MetricsRecord) -> ScoreResult {
        let breakdown = self.breakdown(metrics);
        let raw_score = breakdown.total().max(0.0);
        let bounded_score = raw_score.min(self.weights.score_cap);
        let risk_level = self.classifier.classify(metrics);

        tracing::debug!(
            symbol = %metrics.symbol,
            raw_score,
            bounded_score,
            risk = risk_level.as_str(),
            "scored asset"
        );

        ScoreResult {
            bounded_score,
            raw_score,
            is_exceptional: raw_score > self.weights.score_cap,
            risk_level,
            breakdown,
        }
    }

    /// Normalize a provider record and score it
    pub fn score_asset(&self, record: MetricsRecord, yield_policy: &YieldPolicy) -> ScoredAsset {
        let (metrics, yield_advisory) = normalize_metrics(record, yield_policy);
        let score = self.compute(&metrics);
        ScoredAsset {
            metrics,
            score,
            yield_advisory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::RiskLevel;
    use proptest::prelude::*;

    fn strong_record() -> MetricsRecord {
        MetricsRecord {
            symbol: "ITSA4.SA".to_string(),
            price: 10.0,
            dividend_yield: 0.10,
            price_to_earnings: 10.0,
            price_to_book: 0.8,
            return_on_equity: 0.18,
            free_cash_flow: 2e9,
            payout_ratio: 0.45,
            sector: "Financial Services".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exceptional_opportunity_example() {
        let engine = ScoreEngine::default();
        let result = engine.compute(&strong_record());

        assert!((result.breakdown.yield_term - 4.0).abs() < 1e-9);
        assert!((result.breakdown.earnings_multiple_term - 1.5).abs() < 1e-9);
        assert!((result.breakdown.book_multiple_term - 1.5).abs() < 1e-9);
        assert!((result.breakdown.profitability_term - 2.7).abs() < 1e-9);
        assert!((result.breakdown.cash_generation_term - 0.5).abs() < 1e-9);
        assert!((result.breakdown.payout_term - 1.0).abs() < 1e-9);
        assert!((result.raw_score - 11.2).abs() < 1e-9);
        assert_eq!(result.bounded_score, 10.0);
        assert!(result.is_exceptional);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_every_term_at_cap() {
        let engine = ScoreEngine::default();
        let record = MetricsRecord {
            dividend_yield: 0.12,
            price_to_earnings: 5.0,
            price_to_book: 0.5,
            return_on_equity: 0.40,
            free_cash_flow: 5e9,
            payout_ratio: 0.5,
            ..MetricsRecord::new("MAX")
        };
        let result = engine.compute(&record);
        assert_eq!(ScoringWeights::default().max_raw_score(), 11.5);
        assert!((result.raw_score - 11.5).abs() < 1e-9);
        assert_eq!(result.bounded_score, 10.0);
        assert!(result.is_exceptional);
    }

    #[test]
    fn test_missing_inputs_zero_their_terms() {
        let engine = ScoreEngine::default();
        let result = engine.compute(&MetricsRecord::new("EMPTY"));
        assert_eq!(result.raw_score, 0.0);
        assert_eq!(result.bounded_score, 0.0);
        assert!(!result.is_exceptional);
    }

    #[test]
    fn test_partial_terms() {
        let engine = ScoreEngine::default();
        let record = MetricsRecord {
            symbol: "PART".to_string(),
            dividend_yield: 0.04,
            price_to_earnings: 30.0,
            price_to_book: 4.0,
            return_on_equity: -0.05,
            free_cash_flow: 5e8,
            payout_ratio: 0.9,
            ..Default::default()
        };
        let b = engine.breakdown(&record);
        assert!((b.yield_term - 2.0).abs() < 1e-9);
        assert!((b.earnings_multiple_term - 0.75).abs() < 1e-9);
        assert!((b.book_multiple_term - 0.75).abs() < 1e-9);
        assert_eq!(b.profitability_term, 0.0);
        assert!((b.cash_generation_term - 0.25).abs() < 1e-9);
        assert_eq!(b.payout_term, 0.5);
    }

    #[test]
    fn test_payout_band_is_inclusive() {
        let engine = ScoreEngine::default();
        for payout in [0.3, 0.6] {
            let record = MetricsRecord {
                payout_ratio: payout,
                ..MetricsRecord::new("BAND")
            };
            assert_eq!(engine.breakdown(&record).payout_term, 1.0);
        }
    }

    #[test]
    fn test_score_asset_normalizes_first() {
        let engine = ScoreEngine::default();
        let record = MetricsRecord {
            dividend_yield: 35.0,
            ..MetricsRecord::new("HIGH")
        };
        let asset = engine.score_asset(record, &YieldPolicy::default());
        assert_eq!(asset.metrics.dividend_yield, 0.30);
        assert!(asset.yield_advisory.is_some());
        assert!((asset.score.breakdown.yield_term - 4.0).abs() < 1e-9);
        // abnormal yield alone is one point
        assert_eq!(asset.score.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_custom_weights_from_json() {
        let weights: ScoringWeights =
            serde_json::from_str(r#"{"yield_anchor": 0.06, "score_cap": 12.0}"#).unwrap();
        assert_eq!(weights.yield_anchor, 0.06);
        assert_eq!(weights.roe_weight, 3.0);
        let engine = ScoreEngine::new(weights, RiskClassifier::default());
        let result = engine.compute(&strong_record());
        assert!(!result.is_exceptional);
        assert!((result.bounded_score - 11.2).abs() < 1e-9);
    }

    fn arb_record() -> impl Strategy<Value = MetricsRecord> {
        (
            -0.1f64..0.35,
            -20.0f64..80.0,
            -2.0f64..10.0,
            -0.5f64..0.8,
            -5e9f64..5e9,
            -0.5f64..1.5,
        )
            .prop_map(|(dy, pe, pb, roe, fcf, payout)| MetricsRecord {
                symbol: "PROP".to_string(),
                dividend_yield: dy,
                price_to_earnings: pe,
                price_to_book: pb,
                return_on_equity: roe,
                free_cash_flow: fcf,
                payout_ratio: payout,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn score_stays_within_bounds(record in arb_record()) {
            let result = ScoreEngine::default().compute(&record);
            prop_assert!(result.raw_score >= 0.0);
            prop_assert!(result.bounded_score >= 0.0 && result.bounded_score <= 10.0);
            prop_assert!(result.raw_score <= ScoringWeights::default().max_raw_score() + 1e-9);
        }

        #[test]
        fn exceptional_iff_raw_above_ten(record in arb_record()) {
            let result = ScoreEngine::default().compute(&record);
            prop_assert_eq!(result.is_exceptional, result.raw_score > 10.0);
        }
    }
}
