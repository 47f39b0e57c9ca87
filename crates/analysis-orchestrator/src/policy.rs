use analysis_core::EngineError;
use fundamental_analysis::{NarrativeThresholds, ScoringWeights, YieldPolicy};
use portfolio_manager::PortfolioPolicy;
use profile_ranker::{AllocationPolicy, FilterPolicy};
use risk_manager::RiskPolicy;
use serde::{Deserialize, Serialize};

/// Every tunable cap, weight and cut-point of the engine in one document.
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicy {
    #[serde(rename = "yield")]
    pub yield_policy: YieldPolicy,
    pub scoring: ScoringWeights,
    pub risk: RiskPolicy,
    pub narrative: NarrativeThresholds,
    pub filter: FilterPolicy,
    pub allocation: AllocationPolicy,
    pub portfolio: PortfolioPolicy,
}

impl EnginePolicy {
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw)
            .map_err(|e| EngineError::Config(format!("invalid engine policy: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EnginePolicy::from_json("{}").unwrap(), EnginePolicy::default());
    }

    #[test]
    fn test_partial_sections() {
        let policy = EnginePolicy::from_json(
            r#"{"yield": {"cap": 0.25}, "risk": {"beta_high_points": 0, "beta_low_bonus": 0}}"#,
        )
        .unwrap();
        assert_eq!(policy.yield_policy.cap, 0.25);
        assert_eq!(policy.yield_policy.percent_above, 1.0);
        assert_eq!(policy.risk, RiskPolicy::fundamentals_only());
        assert_eq!(policy.scoring, ScoringWeights::default());
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        assert!(matches!(
            EnginePolicy::from_json(r#"{"scoring": {"yield_weight": "four"}}"#),
            Err(EngineError::Config(_))
        ));
    }
}
