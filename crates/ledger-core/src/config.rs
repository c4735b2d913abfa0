//! Client configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional
//! TOML file, then the `LEDGER_API_URL` / `LEDGER_SESSION` environment
//! variables. Command-line flags are layered on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Default API URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable overriding the API URL.
pub const API_URL_ENV: &str = "LEDGER_API_URL";

/// Environment variable carrying the session token.
pub const SESSION_ENV: &str = "LEDGER_SESSION";

/// Default number of decisions per page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Default number of ranked results requested from search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// Session token sent as the `session` cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub timeout_secs: u64,
    pub per_page: u32,
    pub search_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            per_page: DEFAULT_PER_PAGE,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl Config {
    /// Load from an optional file, then apply environment overrides.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> LedgerResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(session) = lookup(SESSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.session = Some(session);
        }
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> LedgerResult<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(LedgerError::config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(LedgerError::config("per_page must be between 1 and 100"));
        }
        if self.search_limit == 0 || self.search_limit > 20 {
            return Err(LedgerError::config("search_limit must be between 1 and 20"));
        }
        Ok(())
    }

    /// API URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Browser entry point of the Slack OAuth flow. Navigated to, never fetched.
    pub fn slack_auth_url(&self) -> String {
        format!("{}/auth/slack", self.base_url())
    }

    /// Persist this config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| LedgerError::config(e.to_string()))?;
        std::fs::write(path, text)?;
        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.search_limit, 5);
        assert!(config.session.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("api_url = \"https://ledger.example.com/\"").unwrap();
        assert_eq!(config.base_url(), "https://ledger.example.com");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.slack_auth_url(), "https://ledger.example.com/auth/slack");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            API_URL_ENV => Some("https://api.example.com".to_string()),
            SESSION_ENV => Some("tok".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.session.as_deref(), Some("tok"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.session.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config { api_url: "localhost:8000".into(), ..Config::default() };
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));

        let config = Config { per_page: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { search_limit: 21, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("ledger-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let config = Config { session: Some("abc".into()), ..Config::default() };
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
