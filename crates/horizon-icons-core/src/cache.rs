//! The icon cache context.
//!
//! [`IconCache`] owns everything one independent cache needs: the
//! provider → prefix map of [`IconStorage`] registries, the
//! [`LoaderRegistry`], the request queue and the [`Scheduler`]. There is no
//! global state, so several caches can live side by side.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::icon::{IconData, IconSet};
use crate::loader::{LoaderConfig, LoaderRegistry};
use crate::name::{IconName, IconRef};
use crate::queue::RequestQueue;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::split::split_icon_names;
use crate::storage::{IconStorage, Lookup};
use crate::subscription::SubscriptionKey;

/// Options for an [`IconCache`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Accept bare names without a prefix (`"home"`), stored under the empty
    /// provider and empty prefix.
    pub simple_names: bool,
}

impl CacheConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable simple names.
    pub fn simple_names(mut self, enabled: bool) -> Self {
        self.simple_names = enabled;
        self
    }
}

pub(crate) struct CacheInner {
    pub(crate) config: CacheConfig,
    pub(crate) storages: RwLock<HashMap<String, HashMap<String, IconStorage>>>,
    pub(crate) loaders: LoaderRegistry,
    pub(crate) queue: RequestQueue,
    pub(crate) scheduler: Arc<dyn Scheduler>,
}

/// An icon cache.
///
/// Cloning is cheap; clones share state.
///
/// # Example
///
/// ```
/// use horizon_icons_core::{IconCache, IconData};
///
/// let cache = IconCache::new();
/// cache.add_icon("mdi:home", IconData::new("<path d=\"M10 20v-6h4v6\"/>"));
///
/// assert!(cache.icon_exists("mdi:home"));
/// assert!(!cache.icon_exists("mdi:account"));
/// ```
#[derive(Clone)]
pub struct IconCache {
    pub(crate) inner: Arc<CacheInner>,
}

impl IconCache {
    /// Create a cache with default options that runs work on tokio.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder.
    pub fn builder() -> IconCacheBuilder {
        IconCacheBuilder::new()
    }

    /// The cache options.
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// The scheduler that runs notification ticks and loader calls.
    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.inner.scheduler
    }

    /// Parse a name using this cache's options.
    pub fn parse_name(&self, name: impl Into<IconRef>) -> Option<IconName> {
        name.into().resolve(self.inner.config.simple_names)
    }

    /// Get the registry for a provider and prefix, creating it if needed.
    pub fn storage(&self, provider: &str, prefix: &str) -> IconStorage {
        if let Some(storage) = self.existing_storage(provider, prefix) {
            return storage;
        }
        let mut storages = self.inner.storages.write();
        storages
            .entry(provider.to_string())
            .or_default()
            .entry(prefix.to_string())
            .or_insert_with(|| IconStorage::new(provider, prefix, self.inner.scheduler.clone()))
            .clone()
    }

    /// Get the registry for a provider and prefix if it exists.
    pub fn existing_storage(&self, provider: &str, prefix: &str) -> Option<IconStorage> {
        self.inner
            .storages
            .read()
            .get(provider)
            .and_then(|prefixes| prefixes.get(prefix))
            .cloned()
    }

    /// Look up an icon without loading it.
    ///
    /// Unparseable names are reported as [`Lookup::Unknown`].
    pub fn get_icon(&self, name: impl Into<IconRef>) -> Lookup {
        let Some(icon) = self.parse_name(name) else {
            return Lookup::Unknown;
        };
        match self.existing_storage(&icon.provider, &icon.prefix) {
            Some(storage) => storage.get(&icon.name),
            None => Lookup::Unknown,
        }
    }

    /// Check if an icon is loaded.
    pub fn icon_exists(&self, name: impl Into<IconRef>) -> bool {
        self.get_icon(name).is_loaded()
    }

    /// Add one icon.
    ///
    /// Returns `false` if the name could not be parsed.
    pub fn add_icon(&self, name: impl Into<IconRef>, data: IconData) -> bool {
        let Some(icon) = self.parse_name(name) else {
            return false;
        };
        self.storage(&icon.provider, &icon.prefix)
            .update(&icon.name, Some(data));
        true
    }

    /// Add an icon set under `provider`.
    ///
    /// Returns the names that were written.
    pub fn add_icon_set(&self, provider: &str, set: &IconSet) -> Vec<String> {
        if set.prefix.is_empty() && !self.inner.config.simple_names {
            return Vec::new();
        }
        self.storage(provider, &set.prefix).add_icon_set(set)
    }

    /// List loaded icons, optionally restricted to one provider and prefix.
    pub fn list_icons(&self, provider: Option<&str>, prefix: Option<&str>) -> Vec<IconName> {
        let storages = self.inner.storages.read();
        let mut icons = Vec::new();
        for (provider_name, prefixes) in storages.iter() {
            if provider.is_some_and(|p| p != provider_name) {
                continue;
            }
            for (prefix_name, storage) in prefixes {
                if prefix.is_some_and(|p| p != prefix_name) {
                    continue;
                }
                icons.extend(storage.icon_names().into_iter().map(|name| {
                    IconName::new(provider_name.as_str(), prefix_name.as_str(), name)
                }));
            }
        }
        icons.sort();
        icons
    }

    /// Subscribe to changes of icons across registries.
    ///
    /// Names are split by provider and prefix; one record is registered
    /// under the same key in every affected registry. Passing an existing
    /// key replaces those records.
    pub fn subscribe<I, R, F>(
        &self,
        names: I,
        callback: F,
        key: Option<SubscriptionKey>,
    ) -> SubscriptionKey
    where
        I: IntoIterator<Item = R>,
        R: Into<IconRef>,
        F: Fn(&[IconName]) + Send + Sync + 'static,
    {
        let key = key.unwrap_or_default();
        let callback = Arc::new(callback);
        let split = split_icon_names(names, self.inner.config.simple_names, None);

        for (provider, prefixes) in split {
            for (prefix, names) in prefixes {
                let storage = self.storage(&provider, &prefix);
                let callback = callback.clone();
                let (p, x) = (provider.clone(), prefix.clone());
                storage.subscribe(
                    names,
                    move |changed: &[String]| {
                        let icons: Vec<IconName> = changed
                            .iter()
                            .map(|name| IconName::new(p.as_str(), x.as_str(), name.as_str()))
                            .collect();
                        callback(&icons);
                    },
                    Some(key),
                );
            }
        }
        key
    }

    /// Remove a subscription from every registry.
    ///
    /// Returns `true` if any record was removed.
    pub fn unsubscribe(&self, key: SubscriptionKey) -> bool {
        let storages = self.inner.storages.read();
        let mut removed = false;
        for storage in storages.values().flat_map(HashMap::values) {
            removed |= storage.unsubscribe(key);
        }
        removed
    }

    /// The loader registry.
    pub fn loaders(&self) -> &LoaderRegistry {
        &self.inner.loaders
    }

    /// Register a loader for one prefix of the default provider.
    pub fn set_loader(&self, prefix: impl Into<String>, config: LoaderConfig) {
        self.inner.loaders.set_loader(prefix, config);
    }

    /// Register a loader for a whole provider.
    pub fn set_provider_loader(&self, provider: impl Into<String>, config: LoaderConfig) {
        self.inner.loaders.set_provider_loader(provider, config);
    }
}

impl Default for IconCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storages = self.inner.storages.read();
        let count: usize = storages.values().map(HashMap::len).sum();
        f.debug_struct("IconCache")
            .field("config", &self.inner.config)
            .field("storages", &count)
            .field("loaders", &self.inner.loaders)
            .finish()
    }
}

/// Builder for [`IconCache`].
#[derive(Default)]
pub struct IconCacheBuilder {
    config: CacheConfig,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl IconCacheBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache options.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable simple names.
    pub fn simple_names(mut self, enabled: bool) -> Self {
        self.config.simple_names = enabled;
        self
    }

    /// Use a specific scheduler instead of [`TokioScheduler`].
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Build the cache.
    pub fn build(self) -> IconCache {
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Arc::new(TokioScheduler::new()));
        IconCache {
            inner: Arc::new(CacheInner {
                config: self.config,
                storages: RwLock::new(HashMap::new()),
                loaders: LoaderRegistry::new(),
                queue: RequestQueue::new(),
                scheduler,
            }),
        }
    }
}
