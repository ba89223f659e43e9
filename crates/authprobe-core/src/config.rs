//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend base URL and the last username that logged
//! in successfully.
//!
//! Configuration is stored at `~/.config/authprobe/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_BASE_URL;

/// Application name used for config/storage directory paths
pub const APP_NAME: &str = "authprobe";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "AUTHPROBE_BASE_URL";

/// Environment variable pre-filling the username field
pub const USERNAME_ENV: &str = "AUTHPROBE_USERNAME";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `~/.config/authprobe/config.json` on Linux
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the backend URL: command line, then environment, then
    /// the config file, then the default.
    pub fn base_url(&self, cli_override: Option<&str>) -> Result<Url> {
        let env = std::env::var(BASE_URL_ENV).ok();
        self.resolve_base_url(cli_override, env.as_deref())
    }

    fn resolve_base_url(&self, cli_override: Option<&str>, env: Option<&str>) -> Result<Url> {
        let raw = cli_override
            .or(env)
            .or(self.base_url.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);

        let url = Url::parse(raw).with_context(|| format!("Invalid base URL: {}", raw))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Base URL must be http or https: {}", raw);
        }
        if url.query().is_some() || url.fragment().is_some() {
            anyhow::bail!("Base URL must not have a query or fragment: {}", raw);
        }
        Ok(url)
    }

    /// Initial username for the form: environment, then last login
    pub fn initial_username(&self) -> String {
        std::env::var(USERNAME_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.last_username.clone())
            .unwrap_or_default()
    }

    /// Root directory holding one local storage per origin
    pub fn storage_root(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find local data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for rolling log files in interactive mode
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = Config::default();
        let url = config.resolve_base_url(None, None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_base_url_precedence() {
        let config = Config {
            base_url: Some("http://from-file:1000".to_string()),
            last_username: None,
        };
        assert_eq!(
            config.resolve_base_url(None, None).unwrap().host_str(),
            Some("from-file")
        );
        assert_eq!(
            config.resolve_base_url(None, Some("http://from-env:2000")).unwrap().host_str(),
            Some("from-env")
        );
        assert_eq!(
            config
                .resolve_base_url(Some("http://from-cli:3000"), Some("http://from-env:2000"))
                .unwrap()
                .host_str(),
            Some("from-cli")
        );
    }

    #[test]
    fn test_blank_override_falls_through() {
        let config = Config::default();
        let url = config.resolve_base_url(Some("  "), None).unwrap();
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config::default();
        assert!(config.resolve_base_url(Some("not a url"), None).is_err());
        assert!(config.resolve_base_url(Some("file:///tmp"), None).is_err());
        assert!(config.resolve_base_url(Some("http://h/?x=1"), None).is_err());
        assert!(config.resolve_base_url(Some("http://h/#top"), None).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            base_url: Some("https://portal.example.com".to_string()),
            last_username: Some("alice".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }
}
