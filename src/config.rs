use config::{Config as ConfigBuilder, Environment};
use serde::{Deserialize, Serialize};

/// How `reorder_components` applies its per-row position updates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReorderMode {
    /// One update per row; a failure midway leaves earlier rows renumbered.
    #[default]
    Sequential,
    /// All updates inside one transaction.
    Transactional,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub cors_allow_origin: String,
    pub reorder_mode: ReorderMode,
    pub site_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://lms_pages.db?mode=rwc".to_string(),
            max_connections: 5,
            cors_allow_origin: "*".to_string(),
            reorder_mode: ReorderMode::Sequential,
            site_name: "School Pages".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with cascading precedence:
    /// 1. Environment variables (LMS_*), including those from `.env`
    /// 2. Defaults
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::load(Environment::with_prefix("LMS").try_parsing(true))
    }

    fn load(env: Environment) -> anyhow::Result<Self> {
        let config = ConfigBuilder::builder()
            .add_source(ConfigBuilder::try_from(&Self::default())?)
            .add_source(env)
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("LMS")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = Config::load(env_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.reorder_mode, ReorderMode::Sequential);
        assert_eq!(config.site_name, "School Pages");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::load(env_from(&[
            ("LMS_PORT", "9001"),
            ("LMS_REORDER_MODE", "transactional"),
            ("LMS_DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.reorder_mode, ReorderMode::Transactional);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Config::load(env_from(&[("LMS_PORT", "not-a-port")])).is_err());
    }
}
