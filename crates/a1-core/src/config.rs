use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::blog::WordPressConfig;
use crate::constants::{
    API_BASE_URL, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, SEEN_SET_CAPACITY,
};

/// Client configuration, loaded from a JSON file. Every field has a default
/// so a partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct A1Config {
    pub api_base_url: String,

    /// Logged-in user the poller runs as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub seen_capacity: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress: Option<WordPressConfig>,
}

impl Default for A1Config {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            username: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            seen_capacity: SEEN_SET_CAPACITY,
            wordpress: None,
        }
    }
}

impl A1Config {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: A1Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else fall back to defaults. An explicit path that
    /// cannot be read is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/a1-tools/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_minimal_config() {
        let config: A1Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, A1Config::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.seen_capacity, 100);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "apiBaseUrl": "https://staging.a1.test/api",
            "username": "alex",
            "pollIntervalSecs": 30,
            "wordpress": {
                "siteUrl": "https://blog.a1.test",
                "username": "editor",
                "applicationPassword": "xxxx yyyy"
            }
        }"#;
        let config: A1Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base_url, "https://staging.a1.test/api");
        assert_eq!(config.username.as_deref(), Some("alex"));
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.wordpress.unwrap().username, "editor");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = A1Config {
            poll_interval_secs: 0,
            ..A1Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = A1Config {
            username: Some("alex".to_string()),
            ..A1Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(A1Config::load(&path).unwrap(), config);
        assert_eq!(A1Config::load_or_default(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = A1Config::load_or_default(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
