//! Application configuration
//!
//! JSON config file in the platform config directory, with environment
//! variable overrides for the path and the secrets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// App configuration (stored in config file, not in the remote backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the hosted auth/database service
    pub backend_url: String,
    /// Public (anonymous) API key for the hosted service
    pub backend_anon_key: String,
    pub llm_provider: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            backend_anon_key: String::new(),
            llm_provider: "openai".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            llm_api_key: None,
            llm_base_url: None,
        }
    }
}

impl AppConfig {
    pub fn backend_configured(&self) -> bool {
        !self.backend_url.is_empty() && !self.backend_anon_key.is_empty()
    }
}

/// Config file path
/// Priority: LOTTOMATE_CONFIG_PATH env var > default config directory
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("LOTTOMATE_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("com", "lottomate", "Lottomate")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.config_dir().join("config.json"))
}

/// Load configuration, applying environment overrides on top of the file
pub fn load_config() -> Result<AppConfig> {
    let mut config = load_config_from(&config_path()?)?;

    if let Ok(url) = std::env::var("LOTTOMATE_BACKEND_URL") {
        config.backend_url = url;
    }
    if let Ok(key) = std::env::var("LOTTOMATE_ANON_KEY") {
        config.backend_anon_key = key;
    }
    if let Ok(key) = std::env::var("LOTTOMATE_LLM_API_KEY") {
        config.llm_api_key = Some(key);
    }

    Ok(config)
}

/// Load configuration from a specific file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => Err(err.into()),
    }
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests don't run in parallel
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.backend_configured());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig {
            backend_url: "https://backend.example.com".to_string(),
            backend_anon_key: "anon-key".to_string(),
            llm_provider: "anthropic".to_string(),
            llm_model: "claude-sonnet-4-5".to_string(),
            llm_api_key: Some("secret".to_string()),
            llm_base_url: None,
        };
        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.backend_configured());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend_url": "https://only-this.example.com"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend_url, "https://only-this.example.com");
        assert_eq!(config.llm_provider, "openai");
    }

    #[test]
    fn test_config_path_env_override() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("LOTTOMATE_CONFIG_PATH", "/tmp/lottomate-test-config.json");
        let path = config_path().unwrap();
        assert_eq!(path.to_string_lossy(), "/tmp/lottomate-test-config.json");
        std::env::remove_var("LOTTOMATE_CONFIG_PATH");
    }
}
