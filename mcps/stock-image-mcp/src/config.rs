//! Configuration loading for stock-image-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables (provider keys, timeout)
//! 2. Environment variable STOCK_IMAGE_CONFIG_PATH
//! 3. ~/.binks/stock-images.toml
//! 4. Default values
//!
//! Provider keys are held in [`Secret`], which never prints its value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const UNSPLASH_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";
pub const PIXABAY_KEY_ENV: &str = "PIXABAY_API_KEY";
pub const STORYBLOCKS_PUBKEY_ENV: &str = "STORYBLOCKS_PUBLIC_KEY";
pub const STORYBLOCKS_PRIVKEY_ENV: &str = "STORYBLOCKS_PRIVATE_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Request behaviour shared by all providers
    #[serde(default)]
    pub search: SearchConfig,
    /// Provider API keys
    #[serde(default)]
    pub credentials: Credentials,
    /// Provider base URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

/// General search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Per-provider deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent sent with every provider request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// API keys for each provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub unsplash_key: Option<Secret>,
    #[serde(default)]
    pub pixabay_key: Option<Secret>,
    #[serde(default)]
    pub storyblocks_pubkey: Option<Secret>,
    #[serde(default)]
    pub storyblocks_privkey: Option<Secret>,
}

/// Base URLs, overridable for staging or mock servers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_unsplash_url")]
    pub unsplash: String,
    #[serde(default = "default_pixabay_url")]
    pub pixabay: String,
    #[serde(default = "default_storyblocks_url")]
    pub storyblocks: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
///
/// Read from the environment only, so tracing can start before the config
/// file is loaded.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `LOG_FORMAT=json` selects structured output
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self { format }
    }
}

/// A secret string whose value is never printed or serialized
///
/// Surrounding whitespace (e.g. a trailing newline from a key file) is
/// stripped on construction.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_string())
    }

    /// The raw value, for building authenticated requests only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

// Default value functions
fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("stock-image-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn default_unsplash_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_pixabay_url() -> String {
    "https://pixabay.com".to_string()
}

fn default_storyblocks_url() -> String {
    "https://api.graphicstock.com".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            unsplash: default_unsplash_url(),
            pixabay: default_pixabay_url(),
            storyblocks: default_storyblocks_url(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A zero deadline would time out every provider before it answers
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("search.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

impl Credentials {
    /// Unsplash key, if set and non-blank
    pub fn unsplash(&self) -> Option<&Secret> {
        present(&self.unsplash_key)
    }

    pub fn pixabay(&self) -> Option<&Secret> {
        present(&self.pixabay_key)
    }

    pub fn storyblocks_pubkey(&self) -> Option<&Secret> {
        present(&self.storyblocks_pubkey)
    }

    pub fn storyblocks_privkey(&self) -> Option<&Secret> {
        present(&self.storyblocks_privkey)
    }
}

fn present(secret: &Option<Secret>) -> Option<&Secret> {
    secret.as_ref().filter(|s| !s.is_empty())
}

impl Config {
    /// Load configuration from file or use defaults, then apply the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::info!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        config
            .search
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Override values from environment variables (highest priority)
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = &mut self.credentials;
        for (name, slot) in [
            (UNSPLASH_KEY_ENV, &mut creds.unsplash_key),
            (PIXABAY_KEY_ENV, &mut creds.pixabay_key),
            (STORYBLOCKS_PUBKEY_ENV, &mut creds.storyblocks_pubkey),
            (STORYBLOCKS_PRIVKEY_ENV, &mut creds.storyblocks_privkey),
        ] {
            if let Some(value) = lookup(name) {
                *slot = Some(Secret::new(value));
            }
        }

        if let Some(secs) = lookup("STOCK_IMAGE_TIMEOUT_SECS") {
            self.search.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("STOCK_IMAGE_TIMEOUT_SECS is not a number: {secs}"))?;
            self.search
                .validate()
                .context("invalid STOCK_IMAGE_TIMEOUT_SECS")?;
        }

        Ok(())
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("STOCK_IMAGE_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.binks/stock-images.toml
        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home).join(".binks").join("stock-images.toml"));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.timeout(), Duration::from_secs(10));
        assert_eq!(config.endpoints.unsplash, "https://api.unsplash.com");
        assert_eq!(config.endpoints.storyblocks, "https://api.graphicstock.com");
        assert!(config.credentials.unsplash().is_none());
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[search]
timeout_secs = 3

[credentials]
unsplash_key = "u-key"
storyblocks_pubkey = "sb-pub"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.search.timeout_secs, 3);
        assert_eq!(config.credentials.unsplash().unwrap().expose(), "u-key");
        assert_eq!(config.credentials.storyblocks_pubkey().unwrap().expose(), "sb-pub");
        assert!(config.credentials.storyblocks_privkey().is_none());
        assert_eq!(config.endpoints.pixabay, "https://pixabay.com");
    }

    #[test]
    fn test_from_file_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search\ntimeout_secs = ").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.credentials.pixabay_key = Some(Secret::new("from-file"));

        config
            .apply_env(env(&[
                (PIXABAY_KEY_ENV, "from-env"),
                (STORYBLOCKS_PUBKEY_ENV, "pub"),
                (STORYBLOCKS_PRIVKEY_ENV, "priv"),
                ("STOCK_IMAGE_TIMEOUT_SECS", "25"),
            ]))
            .unwrap();

        assert_eq!(config.credentials.pixabay().unwrap().expose(), "from-env");
        assert_eq!(config.credentials.storyblocks_pubkey().unwrap().expose(), "pub");
        assert_eq!(config.credentials.storyblocks_privkey().unwrap().expose(), "priv");
        assert_eq!(config.search.timeout_secs, 25);
    }

    #[test]
    fn test_log_format_from_env() {
        assert_eq!(
            LoggingConfig::from_lookup(env(&[("LOG_FORMAT", "JSON")])).format,
            LogFormat::Json
        );
        assert_eq!(
            LoggingConfig::from_lookup(env(&[("LOG_FORMAT", "pretty")])).format,
            LogFormat::Text
        );
        assert_eq!(LoggingConfig::from_lookup(env(&[])).format, LogFormat::Text);
    }

    #[test]
    fn test_env_rejects_non_numeric_timeout() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("STOCK_IMAGE_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_rejects_zero_timeout() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("STOCK_IMAGE_TIMEOUT_SECS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\ntimeout_secs = 0").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("timeout_secs must be at least 1"));
    }

    #[test]
    fn test_keys_are_trimmed() {
        let mut config = Config::default();
        config
            .apply_env(env(&[(UNSPLASH_KEY_ENV, "env-key\n")]))
            .unwrap();
        assert_eq!(config.credentials.unsplash().unwrap().expose(), "env-key");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[credentials]\npixabay_key = \"  px-key \\n\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.credentials.pixabay().unwrap().expose(), "px-key");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut config = Config::default();
        config.apply_env(env(&[(UNSPLASH_KEY_ENV, "   ")])).unwrap();
        assert!(config.credentials.unsplash().is_none());
    }

    #[test]
    fn test_secrets_never_printed() {
        let mut config = Config::default();
        config.credentials.unsplash_key = Some(Secret::new("super-secret"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
    }
}
