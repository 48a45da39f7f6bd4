//! File-based provider configuration.
//!
//! Providers and fetcher settings can be described in TOML or JSON:
//!
//! ```toml
//! [fetcher]
//! delay_ms = 500
//! timeout_secs = 10
//!
//! [providers.""]
//! resources = ["https://api.iconify.design", "https://api.simplesvg.com"]
//!
//! [providers.acme]
//! resources = ["https://icons.acme.example"]
//! path = "/icons/"
//! max_url = 1000
//! ```
//!
//! The empty provider name registers the default loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use horizon_icons_core::IconCache;

use crate::api::{ApiProviderConfig, add_api_provider};
use crate::error::{NetworkError, Result};
use crate::fetch::{DEFAULT_DELAY, FetcherConfig, RedundantFetcher, RedundantFetcherBuilder};
use crate::logging::targets;

/// Fetcher settings as written in a configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherSettings {
    /// Delay between staggered host attempts, in milliseconds.
    pub delay_ms: u64,
    /// Per-request timeout in seconds. Zero disables it.
    pub timeout_secs: u64,
    /// User agent override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Start at a random host when none is preferred yet.
    pub random_start: bool,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            timeout_secs: 30,
            user_agent: None,
            random_start: false,
        }
    }
}

impl FetcherSettings {
    /// Apply the settings on top of the default fetcher configuration.
    pub fn to_config(&self) -> FetcherConfig {
        let mut config = FetcherConfig {
            delay: Duration::from_millis(self.delay_ms),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            random_start: self.random_start,
            ..FetcherConfig::default()
        };
        if let Some(ref ua) = self.user_agent {
            config.user_agent = Some(ua.clone());
        }
        config
    }

    /// Build a fetcher from these settings.
    pub fn build_fetcher(&self) -> Result<RedundantFetcher> {
        RedundantFetcherBuilder::new().config(self.to_config()).build()
    }
}

/// A set of API providers, keyed by provider name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Fetcher settings.
    pub fetcher: FetcherSettings,
    /// Providers by name. `""` is the default provider.
    pub providers: BTreeMap<String, ApiProviderConfig>,
}

impl ProvidersConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider.
    pub fn with_provider(mut self, provider: impl Into<String>, config: ApiProviderConfig) -> Self {
        self.providers.insert(provider.into(), config);
        self
    }

    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a TOML configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            "loading provider configuration"
        );
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    /// Check every provider.
    pub fn validate(&self) -> Result<()> {
        for (name, provider) in &self.providers {
            provider
                .validate()
                .map_err(|err| NetworkError::Config(format!("provider '{name}': {err}")))?;
        }
        Ok(())
    }

    /// Register every provider with `cache`, sharing `fetcher`.
    ///
    /// Nothing is registered if any provider is invalid. Returns the number
    /// of providers registered.
    pub fn register(&self, cache: &IconCache, fetcher: &RedundantFetcher) -> Result<usize> {
        self.validate()?;
        for (name, provider) in &self.providers {
            add_api_provider(cache, name, provider.clone(), fetcher.clone())?;
        }
        Ok(self.providers.len())
    }

    /// Build a fetcher from the settings and register every provider with it.
    pub fn apply(&self, cache: &IconCache) -> Result<RedundantFetcher> {
        let fetcher = self.fetcher.build_fetcher()?;
        self.register(cache, &fetcher)?;
        Ok(fetcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        [fetcher]
        delay_ms = 100
        timeout_secs = 0

        [providers.""]
        resources = ["https://api.iconify.design"]

        [providers.acme]
        resources = ["https://icons.acme.example", "https://mirror.acme.example"]
        path = "/icons/"
        max_url = 1000
    "#;

    #[test]
    fn test_from_toml() {
        let config = ProvidersConfig::from_toml(TOML).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[""].max_url, 500);

        let acme = &config.providers["acme"];
        assert_eq!(acme.resources.len(), 2);
        assert_eq!(acme.path, "/icons/");
        assert_eq!(acme.max_url, 1000);

        let fetcher = config.fetcher.to_config();
        assert_eq!(fetcher.delay, Duration::from_millis(100));
        assert!(fetcher.timeout.is_none());
    }

    #[test]
    fn test_from_json() {
        let config = ProvidersConfig::from_json(
            r#"{ "providers": { "acme": {
                "resources": ["https://icons.acme.example"], "maxCount": 20
            } } }"#,
        )
        .unwrap();
        assert_eq!(config.providers["acme"].max_count, Some(20));
        assert_eq!(config.fetcher, FetcherSettings::default());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ProvidersConfig::from_toml("providers = 3"),
            Err(NetworkError::Config(_))
        ));
        assert!(matches!(
            ProvidersConfig::from_json("{"),
            Err(NetworkError::Json(_))
        ));
    }

    #[test]
    fn test_register_is_all_or_nothing() {
        let cache = IconCache::new();
        let config = ProvidersConfig::new()
            .with_provider("good", ApiProviderConfig::new(["https://a.example"]))
            .with_provider("bad", ApiProviderConfig::new(Vec::<String>::new()));

        let err = config.register(&cache, &RedundantFetcher::new()).unwrap_err();
        assert!(err.to_string().contains("provider 'bad'"));
        assert!(cache.loaders().get_loader("good", "mdi").is_none());
    }

    #[test]
    fn test_apply() {
        let cache = IconCache::new();
        let config = ProvidersConfig::from_toml(TOML).unwrap();
        let fetcher = config.apply(&cache).unwrap();

        assert_eq!(fetcher.config().delay, Duration::from_millis(100));
        assert!(cache.loaders().get_loader("", "mdi").is_some());
        assert!(cache.loaders().get_loader("acme", "anything").is_some());
        assert!(cache.loaders().get_loader("other", "mdi").is_none());
    }
}
