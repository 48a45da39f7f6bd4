//! Loader for Iconify-compatible icon APIs.
//!
//! Icons are requested as `GET {host}{path}{prefix}.json?icons=a,b,c` and
//! answered with an [`IconSet`]:
//!
//! ```json
//! { "prefix": "mdi", "icons": { "home": { "body": "..." } }, "not_found": ["nope"] }
//! ```

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use horizon_icons_core::{
    BatchLimits, BulkIconLoader, BulkRequest, IconCache, IconError, IconLoader, IconSet,
    LoaderConfig,
};

use crate::error::{NetworkError, Result};
use crate::fetch::RedundantFetcher;
use crate::logging::targets;

/// Public Iconify API hosts.
pub const ICONIFY_HOSTS: [&str; 3] = [
    "https://api.iconify.design",
    "https://api.simplesvg.com",
    "https://api.unisvg.com",
];

/// Default maximum URL length.
pub const DEFAULT_MAX_URL: usize = 500;

fn default_path() -> String {
    "/".to_string()
}

fn default_max_url() -> usize {
    DEFAULT_MAX_URL
}

/// Configuration of one icon API provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProviderConfig {
    /// Mirror hosts, such as `https://api.iconify.design`.
    pub resources: Vec<String>,
    /// Path prefix on each host.
    #[serde(default = "default_path")]
    pub path: String,
    /// Maximum request URL length, used to size batches.
    #[serde(default = "default_max_url", alias = "maxURL", alias = "max_url_length")]
    pub max_url: usize,
    /// Maximum number of icons per request.
    #[serde(default, alias = "maxCount", skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

impl ApiProviderConfig {
    /// Create a config for the given hosts with default limits.
    pub fn new<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resources: resources.into_iter().map(Into::into).collect(),
            path: default_path(),
            max_url: DEFAULT_MAX_URL,
            max_count: None,
        }
    }

    /// The public Iconify API.
    pub fn iconify() -> Self {
        Self::new(ICONIFY_HOSTS)
    }

    /// Set the path prefix.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the maximum URL length.
    pub fn max_url(mut self, max_url: usize) -> Self {
        self.max_url = max_url;
        self
    }

    /// Set the maximum number of icons per request.
    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Check that the config can be used.
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(NetworkError::Config("no resources configured".into()));
        }
        for host in &self.resources {
            url::Url::parse(host)?;
        }
        Ok(())
    }

    /// The path with exactly one leading and one trailing slash.
    pub fn normalized_path(&self) -> String {
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        }
    }

    /// Endpoint for a batch of icons, relative to a host.
    pub fn endpoint(&self, prefix: &str, names: &[String]) -> String {
        format!(
            "{}{}.json?icons={}",
            self.normalized_path(),
            prefix,
            names.join(",")
        )
    }

    /// Maximum combined name length per request for `prefix`.
    ///
    /// Whatever remains of `max_url` after the longest host, the path and
    /// the `{prefix}.json?icons=` part.
    pub fn max_length(&self, prefix: &str) -> usize {
        let longest_host = self
            .resources
            .iter()
            .map(|host| host.trim_end_matches('/').len())
            .max()
            .unwrap_or(0);
        let fixed =
            longest_host + self.normalized_path().len() + prefix.len() + ".json?icons=".len();
        self.max_url.saturating_sub(fixed)
    }
}

impl Default for ApiProviderConfig {
    fn default() -> Self {
        Self::iconify()
    }
}

/// Bulk loader backed by an icon API.
#[derive(Clone, Debug)]
pub struct ApiLoader {
    config: ApiProviderConfig,
    fetcher: RedundantFetcher,
}

impl ApiLoader {
    /// Create a loader for one provider.
    pub fn new(config: ApiProviderConfig, fetcher: RedundantFetcher) -> Self {
        Self { config, fetcher }
    }

    /// The provider configuration.
    pub fn config(&self) -> &ApiProviderConfig {
        &self.config
    }

    /// Request one batch.
    ///
    /// A 404 answer means the prefix does not exist and yields an empty set,
    /// so every requested name is recorded as missing.
    pub async fn fetch(&self, prefix: &str, names: &[String]) -> Result<IconSet> {
        let endpoint = self.config.endpoint(prefix, names);
        tracing::debug!(target: targets::API, prefix, count = names.len(), "requesting icons");

        match self
            .fetcher
            .fetch_json::<IconSet>(&self.config.resources, &endpoint)
            .await
        {
            Ok(set) => Ok(set),
            Err(err) if err.is_not_found() => {
                tracing::debug!(target: targets::API, prefix, "icon set not found");
                Ok(IconSet::new(prefix))
            }
            Err(err) => Err(err),
        }
    }
}

impl BulkIconLoader for ApiLoader {
    fn load_icons(
        &self,
        request: BulkRequest,
    ) -> BoxFuture<'static, horizon_icons_core::Result<Option<IconSet>>> {
        let loader = self.clone();
        Box::pin(async move {
            match loader.fetch(&request.prefix, &request.names).await {
                Ok(set) => Ok(Some(set)),
                Err(err) => Err(IconError::unavailable(
                    request.provider,
                    request.prefix,
                    err.to_string(),
                )),
            }
        })
    }

    fn batch_limits(&self, prefix: &str) -> BatchLimits {
        BatchLimits {
            max_count: self.config.max_count,
            max_length: Some(self.config.max_length(prefix)),
        }
    }
}

/// Register an icon API as the loader for `provider`.
///
/// Use provider `""` to make it the default loader. Names are validated
/// before they are requested.
///
/// ```no_run
/// use horizon_icons_core::IconCache;
/// use horizon_icons_net::{ApiProviderConfig, RedundantFetcher, add_api_provider};
///
/// let cache = IconCache::new();
/// add_api_provider(&cache, "", ApiProviderConfig::iconify(), RedundantFetcher::new()).unwrap();
/// ```
pub fn add_api_provider(
    cache: &IconCache,
    provider: &str,
    config: ApiProviderConfig,
    fetcher: RedundantFetcher,
) -> Result<()> {
    config.validate()?;

    tracing::info!(
        target: targets::API,
        provider,
        hosts = config.resources.len(),
        "API provider added"
    );

    let hosts = config.resources.clone();
    let loader = LoaderConfig::new(IconLoader::bulk(ApiLoader::new(config, fetcher)))
        .validate_names(true)
        .hosts(hosts);
    cache.set_provider_loader(provider, loader);
    Ok(())
}
