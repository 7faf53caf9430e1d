use std::{path::{Path, PathBuf}, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use validator::Validate;

/// Optional file read from the working directory before environment overrides are applied.
pub const CONFIG_PATH: &str = "scraper.toml";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";
const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
const DEFAULT_LLM_BASE_URL: &str = "https://api.anthropic.com";


/// Settings for the structured extraction request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name sent with every Messages API request.
    #[validate(length(min = 1))]
    pub model: String,
    /// Upper bound on the size of the reply.
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: u32,
    /// Scheme and host of the Messages API, without the `/v1/messages` path.
    #[validate(url)]
    pub base_url: String
}


impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2000,
            base_url: DEFAULT_LLM_BASE_URL.to_string()
        }
    }
}


/// Process-wide settings, built once at start-up and handed to whatever needs them.
///
/// Values come from `scraper.toml` when it exists and are then overridden by
/// environment variables (a `.env` file is honoured too).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Anthropic API key. Structured extraction is disabled without it.
    pub api_key: Option<String>,
    /// Path to Google service account credentials.
    pub credentials_path: Option<PathBuf>,
    /// Seconds to wait for new listings after pressing "Load More".
    #[validate(range(min = 1, max = 300))]
    pub scraping_delay: u64,
    /// User agent the browser presents to job boards.
    #[validate(length(min = 1))]
    pub user_agent: String,
    pub log_level: String,
    /// Seconds to wait for a selector to show up before giving up on it.
    #[validate(range(min = 1, max = 300))]
    pub page_timeout: u64,
    #[validate]
    pub llm: LlmSettings
}


impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            credentials_path: None,
            scraping_delay: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: "INFO".to_string(),
            page_timeout: 10,
            llm: LlmSettings::default()
        }
    }
}


impl Config {
    /// Loads `.env`, then [`CONFIG_PATH`] if present, then applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is normal
        let _ = dotenvy::dotenv();
        Self::from_file(CONFIG_PATH)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display()))
        }
    }

    /// Overrides fields with whatever `lookup` returns for their environment variable, then validates.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(path) = lookup("GOOGLE_CREDENTIALS_PATH") {
            self.credentials_path = Some(PathBuf::from(path));
        }
        if let Some(delay) = lookup("SCRAPING_DELAY") {
            self.scraping_delay = delay.trim().parse()
                .with_context(|| format!("SCRAPING_DELAY must be a whole number of seconds, got {delay:?}"))?;
        }
        if let Some(user_agent) = lookup("USER_AGENT") {
            self.user_agent = user_agent;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(timeout) = lookup("PAGE_TIMEOUT") {
            self.page_timeout = timeout.trim().parse()
                .with_context(|| format!("PAGE_TIMEOUT must be a whole number of seconds, got {timeout:?}"))?;
        }
        if let Some(model) = lookup("ANTHROPIC_MODEL") {
            self.llm.model = model;
        }
        if let Some(base_url) = lookup("ANTHROPIC_BASE_URL") {
            self.llm.base_url = base_url;
        }

        self.validate().context("Invalid scraper configuration")?;
        Ok(self)
    }

    pub fn scraping_delay(&self) -> Duration {
        Duration::from_secs(self.scraping_delay)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout)
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default().with_overrides(env(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.scraping_delay, 3);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.page_timeout(), Duration::from_secs(10));
        assert_eq!(config.llm.max_tokens, 2000);
    }

    #[test]
    fn environment_overrides_every_field() {
        let config = Config::default()
            .with_overrides(env(&[
                ("ANTHROPIC_API_KEY", "sk-test"),
                ("GOOGLE_CREDENTIALS_PATH", "/tmp/creds.json"),
                ("SCRAPING_DELAY", "7"),
                ("USER_AGENT", "test-agent"),
                ("LOG_LEVEL", "debug"),
                ("ANTHROPIC_MODEL", "some-model"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.credentials_path, Some(PathBuf::from("/tmp/creds.json")));
        assert_eq!(config.scraping_delay(), Duration::from_secs(7));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.llm.model, "some-model");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::default()
            .with_overrides(env(&[("ANTHROPIC_API_KEY", "  ")]))
            .unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn malformed_delay_is_rejected() {
        let err = Config::default()
            .with_overrides(env(&[("SCRAPING_DELAY", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("SCRAPING_DELAY"));
    }

    #[test]
    fn zero_delay_fails_validation() {
        assert!(Config::default().with_overrides(env(&[("SCRAPING_DELAY", "0")])).is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let config: Config = toml::from_str("scraping_delay = 5\n[llm]\nmax_tokens = 1000\n").unwrap();
        assert_eq!(config.scraping_delay, 5);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::from_file("definitely/not/here/scraper.toml").unwrap();
        assert_eq!(config.scraping_delay, 3);
    }
}
