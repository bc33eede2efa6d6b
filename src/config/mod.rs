use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAMES: [&str; 2] = ["./.modal-dialogs.json", "./modal-dialogs.json"];

/// Dialog host and logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dismiss the topmost dialog when Escape is pressed
    pub close_on_escape: bool,

    /// Dismiss the topmost dialog when its backdrop is clicked
    pub close_on_backdrop: bool,

    /// `tracing` filter directive used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            close_on_backdrop: true,
            log_filter: "modal_dialogs=info".to_string(),
        }
    }
}

impl Config {
    /// Build the configuration: defaults, then a config file, then the
    /// environment. `explicit` replaces the file search when given.
    pub async fn init(explicit: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit {
            Some(path) => Self::load(path).await?,
            None => Self::load_from_file().await?.unwrap_or_default(),
        };
        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load a configuration file. Missing fields keep their defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Candidate config files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = CONFIG_FILE_NAMES.iter().map(PathBuf::from).collect();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("modal-dialogs").join("config.json"));
        }
        paths
    }

    /// Load the first config file that exists
    pub async fn load_from_file() -> Result<Option<Self>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Apply `MODAL_DIALOGS_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("MODAL_DIALOGS_CLOSE_ON_ESCAPE").and_then(|v| parse_flag(&v)) {
            self.close_on_escape = value;
        }

        if let Some(value) = lookup("MODAL_DIALOGS_CLOSE_ON_BACKDROP").and_then(|v| parse_flag(&v)) {
            self.close_on_backdrop = value;
        }

        if let Some(filter) = lookup("MODAL_DIALOGS_LOG") {
            self.log_filter = filter;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(anyhow::anyhow!("log_filter must not be empty"));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert!(config.close_on_escape);
        assert!(config.close_on_backdrop);
        assert_eq!(config.log_filter, "modal_dialogs=info");
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "close_on_escape": false }"#)
            .await
            .unwrap();

        let config = Config::load(&path).await.unwrap();
        assert!(!config.close_on_escape);
        assert!(config.close_on_backdrop);
        assert_eq!(config.log_filter, "modal_dialogs=info");
    }

    #[tokio::test]
    async fn test_init_with_explicit_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        let written = Config {
            close_on_backdrop: false,
            log_filter: "modal_dialogs=debug".to_string(),
            ..Config::default()
        };
        tokio::fs::write(&path, serde_json::to_string(&written).unwrap())
            .await
            .unwrap();

        let config = Config::init(Some(&path)).await.unwrap();
        assert!(!config.close_on_backdrop);
    }

    #[tokio::test]
    async fn test_load_rejects_bad_files() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(Config::load(&missing).await.is_err());

        let broken = temp_dir.path().join("broken.json");
        tokio::fs::write(&broken, "{ not json").await.unwrap();
        let err = Config::load(&broken).await.unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("MODAL_DIALOGS_CLOSE_ON_ESCAPE", "off"),
            ("MODAL_DIALOGS_CLOSE_ON_BACKDROP", "maybe"),
            ("MODAL_DIALOGS_LOG", "modal_dialogs=trace"),
        ]);

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|value| value.to_string()));

        assert!(!config.close_on_escape);
        assert!(config.close_on_backdrop);
        assert_eq!(config.log_filter, "modal_dialogs=trace");
    }

    #[test]
    fn test_config_validation() {
        let config = Config {
            log_filter: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_paths_order() {
        let paths = Config::config_paths();
        assert_eq!(paths[0], PathBuf::from("./.modal-dialogs.json"));
        assert_eq!(paths[1], PathBuf::from("./modal-dialogs.json"));
    }
}
