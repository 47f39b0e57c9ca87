use std::path::Path;
use std::sync::Arc;

use analysis_core::{InvestorProfile, ProfileRepository};
use analysis_orchestrator::{
    AnalysisOrchestrator, AssetAnalysis, EnginePolicy, ScreenerResult, StockScreener,
    StockUniverse,
};
use anyhow::{Context, Result};
use portfolio_manager::PortfolioSummary;
use profile_ranker::AllocationSuggestion;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::provider::FileMetricsProvider;
use crate::repository::JsonProfileRepository;

/// One line of a portfolio file
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioEntry {
    pub symbol: String,
    pub capital: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationPlan {
    pub total_capital: f64,
    pub suggestions: Vec<AllocationSuggestion>,
    pub screen: ScreenerResult,
}

/// Wired collaborators for one CLI invocation
pub struct App {
    config: AgentConfig,
    orchestrator: Arc<AnalysisOrchestrator>,
    profiles: JsonProfileRepository,
    universe: StockUniverse,
}

impl App {
    pub async fn bootstrap(config: AgentConfig) -> Result<Self> {
        let policy = match &config.policy_path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read policy file {}", path.display()))?;
                EnginePolicy::from_json(&raw)?
            }
            None => EnginePolicy::default(),
        };

        let provider = FileMetricsProvider::load(&config.metrics_path)
            .await
            .with_context(|| {
                format!("failed to load metrics snapshot {}", config.metrics_path.display())
            })?;
        let universe = StockUniverse::Custom(provider.symbols().to_vec());

        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            Arc::new(provider),
            policy,
            config.cache_ttl_seconds,
        ));
        let profiles = JsonProfileRepository::new(config.profile_path.clone());

        Ok(Self {
            config,
            orchestrator,
            profiles,
            universe,
        })
    }

    async fn profile(&self) -> Result<Option<InvestorProfile>> {
        let profile = self.profiles.load().await.with_context(|| {
            format!("failed to load profile {}", self.config.profile_path.display())
        })?;
        if profile.is_none() {
            tracing::info!(
                path = %self.config.profile_path.display(),
                "no investor profile saved, ranking by score alone"
            );
        }
        Ok(profile)
    }

    async fn screen(&self, profile: Option<&InvestorProfile>, limit: usize) -> ScreenerResult {
        let screener =
            StockScreener::new(Arc::clone(&self.orchestrator), self.config.screen_concurrency);
        screener.screen(&self.universe, profile, limit).await
    }

    pub async fn rank(&self, limit: Option<usize>) -> Result<ScreenerResult> {
        let profile = self.profile().await?;
        let limit = limit.unwrap_or(self.config.ranking_limit);
        Ok(self.screen(profile.as_ref(), limit).await)
    }

    pub async fn explain(&self, symbol: &str) -> Result<AssetAnalysis> {
        self.orchestrator
            .analyze(symbol)
            .await
            .with_context(|| format!("failed to analyze {}", symbol))
    }

    pub async fn portfolio(&self, file: &Path) -> Result<PortfolioSummary> {
        let raw = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read portfolio file {}", file.display()))?;
        let entries: Vec<PortfolioEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid portfolio file {}", file.display()))?;

        let allocations: Vec<(String, f64)> = entries
            .into_iter()
            .map(|entry| (entry.symbol, entry.capital))
            .collect();
        Ok(self.orchestrator.evaluate_portfolio(&allocations).await?)
    }

    pub async fn plan(&self) -> Result<AllocationPlan> {
        let profile = self.profile().await?.with_context(|| {
            format!(
                "an investor profile is required to plan an allocation ({})",
                self.config.profile_path.display()
            )
        })?;

        let screen = self.screen(Some(&profile), self.config.ranking_limit).await;
        let suggestions = self
            .orchestrator
            .planner()
            .suggest(&profile, &screen.ranked, profile.available_capital);

        Ok(AllocationPlan {
            total_capital: profile.available_capital,
            suggestions,
            screen,
        })
    }
}
