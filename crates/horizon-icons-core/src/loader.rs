//! Icon loaders and the registry that resolves them.
//!
//! A loader is either a [`SingleIconLoader`], asked for one icon at a time,
//! or a [`BulkIconLoader`], asked for a list of names sharing a prefix. Both
//! are represented by [`IconLoader`] so the queue never has to guess which
//! shape it was given.
//!
//! Loaders are registered per prefix or per provider in a [`LoaderRegistry`]:
//!
//! ```
//! use horizon_icons_core::{IconData, LoaderConfig, LoaderRegistry};
//!
//! let registry = LoaderRegistry::new();
//! registry.set_loader(
//!     "local",
//!     LoaderConfig::single(|icon| async move {
//!         Ok(Some(IconData::new(format!("<text>{}</text>", icon.name))))
//!     }),
//! );
//!
//! assert!(registry.get_loader("", "local").is_some());
//! assert!(registry.get_loader("", "mdi").is_none());
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::RwLock;

use crate::batch::BatchLimits;
use crate::error::Result;
use crate::icon::{IconData, IconSet};
use crate::logging::targets;
use crate::name::IconName;

/// Loads icons one at a time.
///
/// `Ok(None)` means the icon does not exist. `Err` means the source could not
/// be consulted.
pub trait SingleIconLoader: Send + Sync {
    /// Load one icon.
    fn load_icon(&self, icon: IconName) -> BoxFuture<'static, Result<Option<IconData>>>;
}

impl<F, Fut> SingleIconLoader for F
where
    F: Fn(IconName) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<IconData>>> + Send + 'static,
{
    fn load_icon(&self, icon: IconName) -> BoxFuture<'static, Result<Option<IconData>>> {
        Box::pin(self(icon))
    }
}

/// A request for several icons of one provider and prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkRequest {
    /// Provider name, empty for the default provider.
    pub provider: String,
    /// Icon set prefix.
    pub prefix: String,
    /// Requested names, sorted.
    pub names: Vec<String>,
}

impl BulkRequest {
    /// Identifiers of every requested icon.
    pub fn icons(&self) -> impl Iterator<Item = IconName> + '_ {
        self.names
            .iter()
            .map(|name| IconName::new(self.provider.as_str(), self.prefix.as_str(), name.as_str()))
    }
}

/// Loads icons of one prefix in bulk.
///
/// `Ok(Some(set))` answers every requested name: icons in the set are
/// loaded, requested names that are absent from it are missing. `Ok(None)`
/// and `Err` both mean the source could not be consulted.
pub trait BulkIconLoader: Send + Sync {
    /// Load a batch of icons.
    fn load_icons(&self, request: BulkRequest) -> BoxFuture<'static, Result<Option<IconSet>>>;

    /// Batch limits this loader needs for `prefix`.
    ///
    /// Limits set on the [`LoaderConfig`] take precedence.
    fn batch_limits(&self, _prefix: &str) -> BatchLimits {
        BatchLimits::unlimited()
    }
}

impl<F, Fut> BulkIconLoader for F
where
    F: Fn(BulkRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<IconSet>>> + Send + 'static,
{
    fn load_icons(&self, request: BulkRequest) -> BoxFuture<'static, Result<Option<IconSet>>> {
        Box::pin(self(request))
    }
}

/// A loader of either shape.
#[derive(Clone)]
pub enum IconLoader {
    /// Called once per icon.
    Single(Arc<dyn SingleIconLoader>),
    /// Called once per batch.
    Bulk(Arc<dyn BulkIconLoader>),
}

impl IconLoader {
    /// Wrap a single-icon loader.
    pub fn single(loader: impl SingleIconLoader + 'static) -> Self {
        Self::Single(Arc::new(loader))
    }

    /// Wrap a bulk loader.
    pub fn bulk(loader: impl BulkIconLoader + 'static) -> Self {
        Self::Bulk(Arc::new(loader))
    }

    /// Check if this is a bulk loader.
    pub fn is_bulk(&self) -> bool {
        matches!(self, Self::Bulk(_))
    }
}

impl std::fmt::Debug for IconLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(_) => f.write_str("IconLoader::Single"),
            Self::Bulk(_) => f.write_str("IconLoader::Bulk"),
        }
    }
}

/// A loader together with the options that control how it is called.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// The loader.
    pub loader: IconLoader,
    /// Maximum number of names per bulk call.
    pub max_count: Option<usize>,
    /// Maximum combined name length per bulk call.
    pub max_length: Option<usize>,
    /// Write names that fail strict validation as missing instead of
    /// requesting them.
    pub validate_names: bool,
    /// Request names again even when they were confirmed missing before.
    pub allow_reload: bool,
    /// Hosts the loader talks to, for inspection.
    pub hosts: Vec<String>,
}

impl LoaderConfig {
    /// Create a config with default options.
    pub fn new(loader: IconLoader) -> Self {
        Self {
            loader,
            max_count: None,
            max_length: None,
            validate_names: false,
            allow_reload: false,
            hosts: Vec::new(),
        }
    }

    /// Create a config around a single-icon closure.
    pub fn single<F, Fut>(loader: F) -> Self
    where
        F: Fn(IconName) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<IconData>>> + Send + 'static,
    {
        Self::new(IconLoader::single(loader))
    }

    /// Create a config around a bulk closure.
    pub fn bulk<F, Fut>(loader: F) -> Self
    where
        F: Fn(BulkRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<IconSet>>> + Send + 'static,
    {
        Self::new(IconLoader::bulk(loader))
    }

    /// Set the maximum number of names per bulk call.
    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Set the maximum combined name length per bulk call.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Enable or disable strict name validation.
    pub fn validate_names(mut self, validate: bool) -> Self {
        self.validate_names = validate;
        self
    }

    /// Enable or disable reloading of missing icons.
    pub fn allow_reload(mut self, allow: bool) -> Self {
        self.allow_reload = allow;
        self
    }

    /// Record the hosts the loader uses.
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Effective batch limits for `prefix`.
    pub fn batch_limits(&self, prefix: &str) -> BatchLimits {
        let own = BatchLimits {
            max_count: self.max_count,
            max_length: self.max_length,
        };
        match &self.loader {
            IconLoader::Bulk(loader) => own.or(loader.batch_limits(prefix)),
            IconLoader::Single(_) => own,
        }
    }
}

/// Loader registrations, by prefix and by provider.
///
/// Lookup rules:
///
/// - A non-empty provider only ever resolves to its provider-level loader.
///   Prefix-level loaders do not apply to named providers.
/// - The default (empty) provider resolves to the prefix-level loader if one
///   is registered, and otherwise to the loader registered for provider `""`.
#[derive(Default)]
pub struct LoaderRegistry {
    prefixes: RwLock<HashMap<String, Arc<LoaderConfig>>>,
    providers: RwLock<HashMap<String, Arc<LoaderConfig>>>,
}

impl LoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader for one prefix of the default provider.
    pub fn set_loader(&self, prefix: impl Into<String>, config: LoaderConfig) {
        let prefix = prefix.into();
        tracing::debug!(
            target: targets::LOADER,
            prefix = %prefix,
            bulk = config.loader.is_bulk(),
            "prefix loader registered"
        );
        self.prefixes.write().insert(prefix, Arc::new(config));
    }

    /// Register a loader for a whole provider.
    ///
    /// Registering for provider `""` sets the default loader.
    pub fn set_provider_loader(&self, provider: impl Into<String>, config: LoaderConfig) {
        let provider = provider.into();
        tracing::debug!(
            target: targets::LOADER,
            provider = %provider,
            bulk = config.loader.is_bulk(),
            "provider loader registered"
        );
        self.providers.write().insert(provider, Arc::new(config));
    }

    /// Remove a prefix-level loader.
    pub fn remove_loader(&self, prefix: &str) -> Option<Arc<LoaderConfig>> {
        self.prefixes.write().remove(prefix)
    }

    /// Remove a provider-level loader.
    pub fn remove_provider_loader(&self, provider: &str) -> Option<Arc<LoaderConfig>> {
        self.providers.write().remove(provider)
    }

    /// Resolve the loader for a provider and prefix.
    pub fn get_loader(&self, provider: &str, prefix: &str) -> Option<Arc<LoaderConfig>> {
        if !provider.is_empty() {
            return self.providers.read().get(provider).cloned();
        }
        if let Some(config) = self.prefixes.read().get(prefix) {
            return Some(config.clone());
        }
        self.providers.read().get("").cloned()
    }

    /// Providers with a provider-level loader, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut providers: Vec<String> = self.providers.read().keys().cloned().collect();
        providers.sort();
        providers
    }

    /// Prefixes with a prefix-level loader, sorted.
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = self.prefixes.read().keys().cloned().collect();
        prefixes.sort();
        prefixes
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("prefixes", &self.prefixes())
            .field("providers", &self.providers())
            .finish()
    }
}
