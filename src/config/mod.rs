// Runtime configuration for the server
//
// The completion credential resolves with this precedence:
//   1. CLI flag / OPENAI_API_KEY environment variable
//   2. ~/.ideaforge/secrets.toml
// An absent credential is a normal configuration: the synthesizer runs in
// deterministic offline mode instead of calling the completion service.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Provider id under which the completion key is stored in the secrets file.
pub const COMPLETION_PROVIDER_ID: &str = "openai";

pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Read-only process-wide configuration, passed explicitly into the
/// synthesizer rather than read from ambient environment inside the
/// pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Completion credential; `None` selects offline fallback mode.
    pub api_key: Option<String>,
    pub completions_url: String,
    pub model: String,
    pub temperature: f64,
    pub search_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Assemble the runtime configuration from CLI-provided values, falling
    /// back to the secrets file for the credential.
    pub fn resolve(
        api_key: Option<String>,
        model: String,
        completions_url: String,
        search_url: String,
    ) -> Self {
        let mut api_key = api_key.filter(|k| !k.trim().is_empty());

        if api_key.is_none() {
            match SecretsConfig::load() {
                Ok(secrets) => {
                    api_key = secrets.get_token(COMPLETION_PROVIDER_ID).cloned();
                    if api_key.is_some() {
                        log::info!("Loaded completion credential from secrets file");
                    }
                }
                Err(e) => log::warn!("Failed to load secrets file: {}", e),
            }
        }

        Self {
            api_key,
            completions_url,
            model,
            temperature: DEFAULT_TEMPERATURE,
            search_url,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Secrets stored in ~/.ideaforge/secrets.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// API tokens indexed by provider id (e.g., "openai" -> "sk-...")
    #[serde(default)]
    pub api_tokens: HashMap<String, String>,
}

impl SecretsConfig {
    /// Get the secrets file path (~/.ideaforge/secrets.toml)
    pub fn get_secrets_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".ideaforge").join("secrets.toml"))
    }

    /// Load secrets from the default location
    pub fn load() -> Result<Self> {
        let path = Self::get_secrets_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Self::load_from(&path)
    }

    /// Load secrets from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read secrets file '{}': {}", path.display(), e))?;

        let config: SecretsConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse secrets file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save secrets to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::get_secrets_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        self.save_to(&path)
    }

    /// Save secrets to an explicit path, creating parent directories and
    /// restricting permissions to the owner on unix.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    anyhow!(
                        "Failed to create secrets directory '{}': {}",
                        parent.display(),
                        e
                    )
                })?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize secrets: {}", e))?;

        fs::write(path, contents)
            .map_err(|e| anyhow!("Failed to write secrets file '{}': {}", path.display(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions).map_err(|e| {
                anyhow!(
                    "Failed to set permissions on secrets file '{}': {}",
                    path.display(),
                    e
                )
            })?;
        }

        log::info!("Saved secrets to: {}", path.display());
        Ok(())
    }

    /// Get a provider's API token
    pub fn get_token(&self, provider_id: &str) -> Option<&String> {
        self.api_tokens.get(provider_id)
    }

    /// Set a provider's API token
    pub fn set_token(&mut self, provider_id: &str, token: &str) {
        self.api_tokens
            .insert(provider_id.to_string(), token.to_string());
    }

    /// Check if a provider has a token configured
    pub fn has_token(&self, provider_id: &str) -> bool {
        self.api_tokens.contains_key(provider_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert!(!config.has_credential());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.completions_url, DEFAULT_COMPLETIONS_URL);
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
    }

    #[test]
    fn test_blank_cli_key_is_treated_as_absent() {
        let config = AppConfig::resolve(
            Some("   ".to_string()),
            DEFAULT_MODEL.to_string(),
            DEFAULT_COMPLETIONS_URL.to_string(),
            DEFAULT_SEARCH_URL.to_string(),
        );
        // a blank flag must never become the credential
        assert_ne!(config.api_key.as_deref(), Some("   "));
    }

    #[test]
    fn test_secrets_config_default() {
        let config = SecretsConfig::default();
        assert!(config.api_tokens.is_empty());
    }

    #[test]
    fn test_set_and_get_token() {
        let mut config = SecretsConfig::default();
        config.set_token("openai", "test-token");
        assert_eq!(config.get_token("openai"), Some(&"test-token".to_string()));
        assert!(config.has_token("openai"));
        assert!(!config.has_token("anthropic"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("secrets.toml");

        let mut config = SecretsConfig::default();
        config.set_token("openai", "sk-12345");
        config.save_to(&path).unwrap();

        let loaded = SecretsConfig::load_from(&path).unwrap();
        assert_eq!(loaded.get_token("openai"), Some(&"sk-12345".to_string()));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = SecretsConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.api_tokens.is_empty());
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "not [valid toml").unwrap();
        assert!(SecretsConfig::load_from(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        SecretsConfig::default().save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
