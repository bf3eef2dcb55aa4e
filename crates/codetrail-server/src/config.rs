//! Application configuration, layered from defaults, an optional TOML file
//! and environment variables (`CODETRAIL_*`).

use std::path::PathBuf;

use codetrail_domain::config::ExecutorConfig;
use codetrail_domain::error::{Error, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the SQLite database file. Defaults to
    /// `~/.agenticide/codetrail.db`.
    pub database_path: Option<PathBuf>,
    /// Task executor tunables.
    pub executor: ExecutorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { database_path: None, executor: ExecutorConfig::default() }
    }
}

impl AppConfig {
    /// Load defaults, then overlay an optional TOML file at `config_path`,
    /// then `CODETRAIL_`-prefixed environment variables.
    pub fn load(config_path: Option<&std::path::Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("CODETRAIL_"));
        figment
            .extract()
            .map_err(|e| Error::validation(format!("failed to load configuration: {e}")))
    }

    /// Resolve the database file path, defaulting to the per-user config
    /// directory `~/.agenticide/codetrail.db`.
    #[must_use]
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(default_database_path)
    }
}

fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agenticide")
        .join("codetrail.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.executor.max_concurrency, 3);
    }
}
