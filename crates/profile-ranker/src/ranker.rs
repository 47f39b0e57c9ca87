//! Profile Ranking Module
//!
//! Filters scored assets for an investor profile, applies profile bonuses and
//! penalties, then ranks by adjusted score.

use analysis_core::{
    ExperienceLevel, InvestmentObjective, InvestorProfile, RiskLevel, RiskTolerance, ScoredAsset,
};

use crate::models::{
    FilterOutcome, FilterPolicy, RankedAsset, Rejection, RejectionReason, ScoreAdjustment,
};

#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    policy: FilterPolicy,
}

impl ProfileFilter {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Every rule the asset breaks for this profile. Empty means compatible.
    pub fn compatibility(
        &self,
        profile: &InvestorProfile,
        asset: &ScoredAsset,
    ) -> Vec<RejectionReason> {
        let mut reasons = Vec::new();
        let high_risk = asset.risk_level() == RiskLevel::High;

        match profile.risk_tolerance {
            RiskTolerance::Conservative if high_risk => {
                reasons.push(RejectionReason::ConservativeHighRisk);
            }
            RiskTolerance::Moderate
                if high_risk
                    && asset.bounded_score() < self.policy.moderate_high_risk_min_score =>
            {
                reasons.push(RejectionReason::ModerateHighRiskBelowScore {
                    score: asset.bounded_score(),
                    required: self.policy.moderate_high_risk_min_score,
                });
            }
            _ => {}
        }

        // narrow preference sets are not enforced
        if let Some(sectors) = profile.sector_restriction() {
            if sectors.len() >= self.policy.sector_rule_min_preferences
                && !profile.prefers_sector(&asset.metrics.sector)
            {
                reasons.push(RejectionReason::SectorNotPreferred {
                    sector: asset.metrics.sector.clone(),
                });
            }
        }

        reasons
    }

    /// Apply the profile bonuses and penalties to a compatible asset
    pub fn adjust(&self, profile: &InvestorProfile, asset: &ScoredAsset) -> RankedAsset {
        let p = &self.policy;
        let mut adjustments = Vec::new();

        match profile.objective {
            InvestmentObjective::Income if asset.metrics.dividend_yield > p.income_yield_above => {
                adjustments.push((ScoreAdjustment::IncomeYield, p.income_bonus));
            }
            InvestmentObjective::Growth
                if asset
                    .metrics
                    .dividend_growth_estimate
                    .is_some_and(|g| g > p.growth_estimate_above) =>
            {
                adjustments.push((ScoreAdjustment::DividendGrowth, p.growth_bonus));
            }
            _ => {}
        }

        if profile.experience == ExperienceLevel::Beginner {
            match asset.risk_level() {
                RiskLevel::Low => {
                    adjustments.push((ScoreAdjustment::BeginnerLowRisk, p.beginner_low_risk_bonus))
                }
                RiskLevel::High => adjustments.push((
                    ScoreAdjustment::BeginnerHighRisk,
                    -p.beginner_high_risk_penalty,
                )),
                RiskLevel::Medium => {}
            }
        }

        let delta: f64 = adjustments.iter().map(|(_, d)| d).sum();
        let adjusted_score = (asset.bounded_score() + delta).clamp(0.0, p.score_cap);

        RankedAsset {
            asset: asset.clone(),
            adjusted_score,
            adjustments,
        }
    }

    /// Filter, adjust and rank, keeping the rejections
    pub fn screen(
        &self,
        profile: &InvestorProfile,
        assets: &[ScoredAsset],
        limit: usize,
    ) -> FilterOutcome {
        let mut ranked = Vec::new();
        let mut rejected = Vec::new();

        for asset in assets {
            let reasons = self.compatibility(profile, asset);
            if reasons.is_empty() {
                ranked.push(self.adjust(profile, asset));
            } else {
                tracing::debug!(
                    symbol = %asset.symbol(),
                    reasons = reasons.len(),
                    "asset rejected for profile"
                );
                rejected.push(Rejection {
                    symbol: asset.symbol().to_string(),
                    reasons,
                });
            }
        }

        let total_passed = ranked.len();
        sort_and_truncate(&mut ranked, limit);

        FilterOutcome {
            ranked,
            rejected,
            total_passed,
        }
    }

    /// Compatible assets for the profile, best first, at most `limit`
    pub fn select_and_rank(
        &self,
        profile: &InvestorProfile,
        assets: &[ScoredAsset],
        limit: usize,
    ) -> Vec<RankedAsset> {
        self.screen(profile, assets, limit).ranked
    }

    /// Rank by bounded score alone, for callers with no profile
    pub fn rank_without_profile(&self, assets: &[ScoredAsset], limit: usize) -> Vec<RankedAsset> {
        let mut ranked: Vec<RankedAsset> = assets
            .iter()
            .map(|asset| RankedAsset {
                asset: asset.clone(),
                adjusted_score: asset.bounded_score(),
                adjustments: Vec::new(),
            })
            .collect();
        sort_and_truncate(&mut ranked, limit);
        ranked
    }
}

/// Descending by adjusted score; `sort_by` is stable so ties keep input order
fn sort_and_truncate(ranked: &mut Vec<RankedAsset>, limit: usize) {
    ranked.sort_by(|a, b| b.adjusted_score.total_cmp(&a.adjusted_score));
    ranked.truncate(limit);
}
