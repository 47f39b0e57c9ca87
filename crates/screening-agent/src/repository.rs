use std::path::PathBuf;

use analysis_core::{EngineError, InvestorProfile, ProfileRepository};
use async_trait::async_trait;

/// Investor profile persisted as a single JSON document
pub struct JsonProfileRepository {
    path: PathBuf,
}

impl JsonProfileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProfileRepository for JsonProfileRepository {
    async fn load(&self) -> Result<Option<InvestorProfile>, EngineError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EngineError::Repository(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let profile: InvestorProfile = serde_json::from_str(&raw)?;
        profile.validate()?;
        Ok(Some(profile))
    }

    async fn save(&self, profile: &InvestorProfile) -> Result<(), EngineError> {
        profile.validate()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                EngineError::Repository(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let raw = serde_json::to_string_pretty(profile)?;
        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            EngineError::Repository(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), "profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::RiskTolerance;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let repo = JsonProfileRepository::new(dir.path().join("profile.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let repo = JsonProfileRepository::new(dir.path().join("nested/deeper/profile.json"));
        let profile = InvestorProfile {
            name: Some("Ana".to_string()),
            risk_tolerance: RiskTolerance::Conservative,
            available_capital: 25_000.0,
            preferred_sectors: ["Utilities".to_string()].into_iter().collect(),
            ..Default::default()
        };
        repo.save(&profile).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{not json").unwrap();
        let repo = JsonProfileRepository::new(path);
        assert!(matches!(repo.load().await, Err(EngineError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_negative_capital_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, r#"{"available_capital": -10.0}"#).unwrap();
        let repo = JsonProfileRepository::new(path);
        assert!(matches!(repo.load().await, Err(EngineError::InvalidInput(_))));
    }
}
