use super::AnalysisOrchestrator;
use analysis_core::{EngineError, InvestorProfile, ScoredAsset};
use profile_ranker::{RankedAsset, Rejection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenFailure {
    pub symbol: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerResult {
    pub ranked: Vec<RankedAsset>,
    pub rejected: Vec<Rejection>,
    pub failures: Vec<ScreenFailure>,
    /// Symbols attempted
    pub total_analyzed: usize,
    pub total_failed: usize,
    pub total_passed_filters: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub enum StockUniverse {
    Custom(Vec<String>),
    /// Dividend-paying Ibovespa constituents
    BrazilianBlueChips,
}

impl StockUniverse {
    /// Symbols in universe order, duplicates removed
    pub fn get_symbols(&self) -> Vec<String> {
        let symbols: Vec<String> = match self {
            StockUniverse::Custom(symbols) => symbols.clone(),
            StockUniverse::BrazilianBlueChips => [
                "ABEV3.SA", "B3SA3.SA", "BBAS3.SA", "BBDC4.SA", "BBSE3.SA", "BRAP4.SA",
                "BRFS3.SA", "BRKM5.SA", "CCRO3.SA", "CIEL3.SA", "CMIG4.SA", "CPLE6.SA",
                "CSAN3.SA", "CSNA3.SA", "CYRE3.SA", "ECOR3.SA", "EGIE3.SA", "ELET3.SA",
                "EMBR3.SA", "ENBR3.SA", "EQTL3.SA", "GGBR4.SA", "GOAU4.SA", "HAPV3.SA",
                "HYPE3.SA", "ITSA4.SA", "ITUB4.SA", "JBSS3.SA", "LREN3.SA", "MGLU3.SA",
                "MRFG3.SA", "MRVE3.SA", "MULT3.SA", "NTCO3.SA", "PCAR3.SA", "PETR3.SA",
                "PETR4.SA", "PRIO3.SA", "RADL3.SA", "RAIL3.SA", "RENT3.SA", "SANB11.SA",
                "SBSP3.SA", "SUZB3.SA", "TAEE11.SA", "UGPA3.SA", "USIM5.SA", "VALE3.SA",
                "VIVT3.SA", "WEGE3.SA", "YDUQ3.SA",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        };

        let mut seen = HashSet::new();
        symbols
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_uppercase()))
            .collect()
    }
}

pub struct StockScreener {
    orchestrator: Arc<AnalysisOrchestrator>,
    concurrency: usize,
}

impl StockScreener {
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>, concurrency: usize) -> Self {
        Self {
            orchestrator,
            concurrency: concurrency.max(1),
        }
    }

    /// Analyze the universe concurrently and rank it for `profile`.
    /// Ranking is by bounded score alone when there is no profile.
    pub async fn screen(
        &self,
        universe: &StockUniverse,
        profile: Option<&InvestorProfile>,
        limit: usize,
    ) -> ScreenerResult {
        let symbols = universe.get_symbols();
        let total_analyzed = symbols.len();

        tracing::info!(
            symbols = total_analyzed,
            concurrency = self.concurrency,
            "starting stock screen"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, symbol) in symbols.iter().cloned().enumerate() {
            let orchestrator = Arc::clone(&self.orchestrator);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => orchestrator.analyze(&symbol).await,
                    Err(_) => Err(EngineError::Provider("screen cancelled".to_string())),
                };
                (index, result)
            });
        }

        // slots keep universe order whatever the completion order
        let mut slots: Vec<Option<ScoredAsset>> = vec![None; total_analyzed];
        let mut errors: Vec<Option<String>> = vec![None; total_analyzed];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(analysis))) => {
                    slots[index] = Some(analysis.scored);
                }
                Ok((index, Err(e))) => {
                    tracing::warn!(symbol = %symbols[index], error = %e, "failed to analyze");
                    errors[index] = Some(e.to_string());
                }
                Err(e) => {
                    // the index is lost with the task; filled in below
                    tracing::error!(error = %e, "screen task failed");
                }
            }
        }

        let failures: Vec<ScreenFailure> = slots
            .iter()
            .zip(errors)
            .enumerate()
            .filter(|(_, (slot, _))| slot.is_none())
            .map(|(index, (_, error))| ScreenFailure {
                symbol: symbols[index].clone(),
                error: error.unwrap_or_else(|| "analysis task did not complete".to_string()),
            })
            .collect();

        let scored: Vec<ScoredAsset> = slots.into_iter().flatten().collect();
        let total_failed = failures.len();

        let filter = self.orchestrator.filter();
        let (ranked, rejected, total_passed_filters) = match profile {
            Some(profile) => {
                let outcome = filter.screen(profile, &scored, limit);
                (outcome.ranked, outcome.rejected, outcome.total_passed)
            }
            None => (filter.rank_without_profile(&scored, limit), Vec::new(), scored.len()),
        };

        tracing::info!(
            passed = total_passed_filters,
            analyzed = total_analyzed,
            failed = total_failed,
            returned = ranked.len(),
            "screen complete"
        );

        ScreenerResult {
            ranked,
            rejected,
            failures,
            total_analyzed,
            total_failed,
            total_passed_filters,
            timestamp: chrono::Utc::now(),
        }
    }
}
