use async_trait::async_trait;

use crate::{EngineError, InvestorProfile, MetricsRecord};

/// Source of fundamental snapshots (market-data client, file snapshot, test fake)
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn fetch_metrics(&self, symbol: &str) -> Result<MetricsRecord, EngineError>;
}

/// Persistence for the investor profile; the on-disk format is the implementor's concern
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn load(&self) -> Result<Option<InvestorProfile>, EngineError>;
    async fn save(&self, profile: &InvestorProfile) -> Result<(), EngineError>;
}
