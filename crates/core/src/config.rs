//! Engine configuration.
//!
//! Every field has a default so an empty JSON object is a valid config.
//! Logging settings can be overridden from the environment.

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const LOG_FILTER_ENV: &str = "SEMASCOPE_LOG";
pub const LOG_DIR_ENV: &str = "SEMASCOPE_LOG_DIR";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub solver: SolverConfig,
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Recursion guard for type resolution and hierarchy walks.
    pub max_depth: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub dir: PathBuf,
    pub to_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            filter: "info".to_string(),
            dir: home.join(".semascope/logs"),
            to_stderr: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Apply `SEMASCOPE_LOG` and `SEMASCOPE_LOG_DIR` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
            if !filter.trim().is_empty() {
                self.logging.filter = filter;
            }
        }
        if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.logging.dir = PathBuf::from(dir);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config.solver.max_depth, 32);
        assert_eq!(config.completion.max_results, None);
        assert_eq!(config.logging.filter, "info");
        assert!(config.logging.dir.ends_with(".semascope/logs"));
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{ "solver": { "max_depth": 8 }, "completion": { "max_results": 50 } }"#,
        )
        .unwrap();
        assert_eq!(config.solver.max_depth, 8);
        assert_eq!(config.completion.max_results, Some(50));
        assert!(!config.logging.to_stderr);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = EngineConfig::from_json_str("{ solver: ").unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Config(_)));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semascope.json");
        std::fs::write(&path, r#"{ "logging": { "to_stderr": true } }"#).unwrap();
        let config = EngineConfig::from_path(&path).unwrap();
        assert!(config.logging.to_stderr);

        let missing = EngineConfig::from_path(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(crate::error::CoreError::Io(_))));
    }
}
