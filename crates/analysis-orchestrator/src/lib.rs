use std::sync::Arc;

use analysis_core::{EngineError, MetricsProvider, MetricsRecord, ScoredAsset};
use chrono::{DateTime, Utc};
use fundamental_analysis::{Explainer, Explanation, ScoreEngine, YieldPolicy};
use portfolio_manager::{PortfolioAggregator, PortfolioPosition, PortfolioSummary};
use profile_ranker::{AllocationPlanner, ProfileFilter};
use risk_manager::RiskClassifier;
use serde::{Deserialize, Serialize};

pub mod cache;
pub mod policy;
pub mod screener;

pub use cache::WindowedCache;
pub use policy::EnginePolicy;
pub use screener::{ScreenerResult, StockScreener, StockUniverse};

/// Default freshness window of the score cache
pub const CACHE_TTL_SECS: u64 = 300;

/// Everything the engine derives for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAnalysis {
    pub scored: ScoredAsset,
    pub explanation: Explanation,
    pub analyzed_at: DateTime<Utc>,
}

pub struct AnalysisOrchestrator {
    provider: Arc<dyn MetricsProvider>,
    yield_policy: YieldPolicy,
    score_engine: ScoreEngine,
    explainer: Explainer,
    filter: ProfileFilter,
    planner: AllocationPlanner,
    aggregator: PortfolioAggregator,
    /// Analyses per (symbol, freshness window)
    analysis_cache: WindowedCache<AssetAnalysis>,
}

impl AnalysisOrchestrator {
    pub fn new(
        provider: Arc<dyn MetricsProvider>,
        policy: EnginePolicy,
        cache_ttl_secs: u64,
    ) -> Self {
        let EnginePolicy {
            yield_policy,
            scoring,
            risk,
            narrative,
            filter,
            allocation,
            portfolio,
        } = policy;

        let classifier = RiskClassifier::new(risk.clone());

        Self {
            provider,
            yield_policy,
            score_engine: ScoreEngine::new(scoring.clone(), classifier.clone()),
            explainer: Explainer::new(scoring, risk, narrative),
            filter: ProfileFilter::new(filter),
            planner: AllocationPlanner::new(allocation),
            aggregator: PortfolioAggregator::new(classifier, portfolio),
            analysis_cache: WindowedCache::new(cache_ttl_secs),
        }
    }

    /// Orchestrator with default policy and cache window
    pub fn with_defaults(provider: Arc<dyn MetricsProvider>) -> Self {
        Self::new(provider, EnginePolicy::default(), CACHE_TTL_SECS)
    }

    pub fn filter(&self) -> &ProfileFilter {
        &self.filter
    }

    pub fn planner(&self) -> &AllocationPlanner {
        &self.planner
    }

    pub fn aggregator(&self) -> &PortfolioAggregator {
        &self.aggregator
    }

    pub fn cache(&self) -> &WindowedCache<AssetAnalysis> {
        &self.analysis_cache
    }

    /// Provider-free pipeline: normalize, score, classify, explain
    pub fn analyze_record(&self, record: MetricsRecord) -> AssetAnalysis {
        let scored = self.score_engine.score_asset(record, &self.yield_policy);
        let explanation = self.explainer.explain_asset(&scored);
        AssetAnalysis {
            scored,
            explanation,
            analyzed_at: Utc::now(),
        }
    }

    /// Fetch metrics for `symbol` and analyze them, reusing an analysis from
    /// the current freshness window when there is one
    pub async fn analyze(&self, symbol: &str) -> Result<AssetAnalysis, EngineError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(EngineError::InvalidInput("symbol must not be empty".to_string()));
        }

        let now = Utc::now();
        if let Some(cached) = self.analysis_cache.get(symbol, now) {
            return Ok(cached);
        }

        tracing::debug!(symbol, "cache miss, fetching metrics");
        let record = self.provider.fetch_metrics(symbol).await.map_err(|e| {
            tracing::warn!(symbol, error = %e, "metrics fetch failed");
            e
        })?;

        let analysis = self.analyze_record(record);
        let purged = self.analysis_cache.purge_expired(now);
        if purged > 0 {
            tracing::debug!(purged, "dropped analyses from past windows");
        }
        self.analysis_cache.insert(symbol, now, analysis.clone());
        Ok(analysis)
    }

    /// Fetch and aggregate a list of `(symbol, capital)` allocations
    pub async fn evaluate_portfolio(
        &self,
        allocations: &[(String, f64)],
    ) -> Result<PortfolioSummary, EngineError> {
        let mut positions = Vec::with_capacity(allocations.len());
        for (symbol, capital) in allocations {
            let analysis = self.analyze(symbol).await?;
            positions.push(PortfolioPosition::new(
                symbol.trim(),
                *capital,
                analysis.scored.metrics,
            )?);
        }

        let summary = self.aggregator.aggregate(&positions);
        tracing::info!(
            positions = positions.len(),
            total_allocated = summary.total_allocated,
            monthly_income = summary.monthly_income,
            risk_tier = summary.risk_tier.as_str(),
            "portfolio evaluated"
        );
        Ok(summary)
    }
}
