use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    // Data files
    pub profile_path: PathBuf,             // data/profile.json
    pub metrics_path: PathBuf,             // data/metrics.json
    pub policy_path: Option<PathBuf>,      // defaults when unset

    // Engine
    pub cache_ttl_seconds: u64,            // 300 (5 minutes)
    pub ranking_limit: usize,              // 10
    pub screen_concurrency: usize,         // 8
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            profile_path: lookup("PROFILE_PATH")
                .unwrap_or_else(|| "data/profile.json".to_string())
                .into(),
            metrics_path: lookup("METRICS_PATH")
                .unwrap_or_else(|| "data/metrics.json".to_string())
                .into(),
            policy_path: lookup("POLICY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            cache_ttl_seconds: lookup("CACHE_TTL_SECONDS")
                .unwrap_or_else(|| "300".to_string())
                .parse()
                .context("CACHE_TTL_SECONDS must be a whole number of seconds")?,
            ranking_limit: lookup("RANKING_LIMIT")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("RANKING_LIMIT must be a whole number")?,
            screen_concurrency: lookup("SCREEN_CONCURRENCY")
                .unwrap_or_else(|| "8".to_string())
                .parse()
                .context("SCREEN_CONCURRENCY must be a whole number")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_seconds == 0 {
            bail!("CACHE_TTL_SECONDS must be greater than zero");
        }
        if self.ranking_limit == 0 {
            bail!("RANKING_LIMIT must be greater than zero");
        }
        if self.screen_concurrency == 0 {
            bail!("SCREEN_CONCURRENCY must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.profile_path, PathBuf::from("data/profile.json"));
        assert_eq!(config.metrics_path, PathBuf::from("data/metrics.json"));
        assert!(config.policy_path.is_none());
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.ranking_limit, 10);
        assert_eq!(config.screen_concurrency, 8);
    }

    #[test]
    fn test_overrides() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("POLICY_PATH", "/etc/rendy/policy.json"),
            ("RANKING_LIMIT", "5"),
            ("SCREEN_CONCURRENCY", "2"),
        ]))
        .unwrap();
        assert_eq!(config.policy_path, Some(PathBuf::from("/etc/rendy/policy.json")));
        assert_eq!(config.ranking_limit, 5);
        assert_eq!(config.screen_concurrency, 2);
    }

    #[test]
    fn test_invalid_values() {
        let err = AgentConfig::from_lookup(lookup(&[("CACHE_TTL_SECONDS", "five")])).unwrap_err();
        assert!(err.to_string().contains("CACHE_TTL_SECONDS"));
        assert!(AgentConfig::from_lookup(lookup(&[("RANKING_LIMIT", "0")])).is_err());
        assert!(AgentConfig::from_lookup(lookup(&[("SCREEN_CONCURRENCY", "-1")])).is_err());
    }
}
