use std::collections::HashMap;
use std::path::Path;

use analysis_core::{EngineError, MetricsProvider, MetricsRecord};
use async_trait::async_trait;

/// Market data served from a JSON snapshot: an array of metrics records
pub struct FileMetricsProvider {
    /// Keyed by uppercase symbol
    records: HashMap<String, MetricsRecord>,
    /// Snapshot order, for screening the whole file
    symbols: Vec<String>,
}

impl FileMetricsProvider {
    pub async fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            EngineError::Provider(format!("failed to read {}: {}", path.display(), e))
        })?;
        let records: Vec<MetricsRecord> = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.display(), records = records.len(), "metrics snapshot loaded");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<MetricsRecord>) -> Self {
        let mut map = HashMap::with_capacity(records.len());
        let mut symbols = Vec::with_capacity(records.len());
        for record in records {
            let key = record.symbol.trim().to_uppercase();
            if key.is_empty() {
                tracing::warn!("skipping metrics record without a symbol");
                continue;
            }
            if map.insert(key, record.clone()).is_none() {
                symbols.push(record.symbol);
            }
        }
        Self {
            records: map,
            symbols,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

#[async_trait]
impl MetricsProvider for FileMetricsProvider {
    async fn fetch_metrics(&self, symbol: &str) -> Result<MetricsRecord, EngineError> {
        self.records
            .get(&symbol.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| {
                EngineError::DataUnavailable(format!("no metrics for {} in snapshot", symbol))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_and_lookup_case_insensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(
            &path,
            r#"[{"symbol": "TAEE11.SA", "price": 35.2, "dividend_yield": 0.09},
                {"symbol": "WEGE3.SA", "price": 40.0}]"#,
        )
        .unwrap();

        let provider = FileMetricsProvider::load(&path).await.unwrap();
        assert_eq!(provider.symbols(), ["TAEE11.SA", "WEGE3.SA"]);
        let record = provider.fetch_metrics("taee11.sa").await.unwrap();
        assert_eq!(record.price, 35.2);
        assert_eq!(record.return_on_equity, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_data_unavailable() {
        let provider = FileMetricsProvider::from_records(vec![MetricsRecord::new("ITSA4.SA")]);
        assert!(matches!(
            provider.fetch_metrics("PETR4.SA").await,
            Err(EngineError::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicates_and_blank_symbols() {
        let provider = FileMetricsProvider::from_records(vec![
            MetricsRecord::new("ITSA4.SA"),
            MetricsRecord::new(""),
            MetricsRecord::new("itsa4.sa"),
        ]);
        assert_eq!(provider.symbols(), ["ITSA4.SA"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_provider_error() {
        let dir = tempdir().unwrap();
        let result = FileMetricsProvider::load(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(EngineError::Provider(_))));
    }
}
