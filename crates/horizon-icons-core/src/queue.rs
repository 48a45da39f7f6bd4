//! Loading icons on demand.
//!
//! [`IconCache::load_icons`] sorts the requested names into loaded, missing
//! and pending, puts the unknown ones on a per-registry request queue and
//! reports progress through a callback until nothing is pending.
//!
//! Request queues are flushed once per scheduler tick, so several
//! `load_icons` calls issued together share loader invocations. Loader
//! results are written through [`IconStorage`], whose notifications drive the
//! callbacks of every call waiting on those names.
//!
//! # Failures
//!
//! When a source cannot be consulted (no loader, a loader error or a bulk
//! loader returning `None`), the affected names are released rather than
//! recorded as missing. Calls waiting on them report them as missing, but a
//! later call will try again.
//!
//! # Cancellation
//!
//! [`LoadHandle::abort`] only silences the callback of that call. Loader
//! invocations already started keep running and still populate the cache.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;

use crate::batch::split_for_batch_loading;
use crate::cache::IconCache;
use crate::error::{IconError, Result};
use crate::icon::{IconData, IconSet};
use crate::loader::{BulkRequest, IconLoader, LoaderConfig};
use crate::logging::{panic_message, span_names, targets};
use crate::name::{IconName, IconRef, is_valid_part};
use crate::scheduler::Scheduler;
use crate::split::{flatten_split_icon_names, split_icon_names};
use crate::storage::{IconStatus, IconStorage, Lookup};
use crate::subscription::SubscriptionKey;

/// Snapshot of one load call.
///
/// The three lists are disjoint and together hold every requested name that
/// could be parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Icons that are loaded.
    pub loaded: Vec<IconName>,
    /// Icons that are missing, or whose source could not be consulted.
    pub missing: Vec<IconName>,
    /// Icons still being loaded.
    pub pending: Vec<IconName>,
}

impl LoadProgress {
    /// Check if nothing is pending any more.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

type ProgressCallback = Box<dyn FnMut(&LoadProgress) + Send>;

type RegistryKey = (String, String);

/// Names waiting for the next flush, per registry.
///
/// A registry with an entry has a flush scheduled.
#[derive(Default)]
pub(crate) struct RequestQueue {
    waiting: Mutex<HashMap<RegistryKey, Vec<String>>>,
}

impl RequestQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn enqueue(&self, cache: &IconCache, provider: &str, prefix: &str, names: Vec<String>) {
        if names.is_empty() {
            return;
        }
        let key = (provider.to_string(), prefix.to_string());
        let schedule = {
            let mut waiting = self.waiting.lock();
            match waiting.get_mut(&key) {
                Some(list) => {
                    list.extend(names);
                    false
                }
                None => {
                    waiting.insert(key.clone(), names);
                    true
                }
            }
        };

        if schedule {
            let cache = cache.clone();
            cache
                .inner
                .scheduler
                .clone()
                .defer(Box::new(move || flush(&cache, &key.0, &key.1)));
        }
    }

    fn take(&self, provider: &str, prefix: &str) -> Vec<String> {
        self.waiting
            .lock()
            .remove(&(provider.to_string(), prefix.to_string()))
            .unwrap_or_default()
    }
}

/// Send everything queued for one registry to its loader.
fn flush(cache: &IconCache, provider: &str, prefix: &str) {
    let names = cache.inner.queue.take(provider, prefix);
    if names.is_empty() {
        return;
    }

    let _span = tracing::debug_span!(
        target: targets::QUEUE,
        "flush",
        operation = span_names::FLUSH,
        provider,
        prefix
    )
    .entered();

    let storage = cache.storage(provider, prefix);
    let Some(config) = cache.inner.loaders.get_loader(provider, prefix) else {
        tracing::warn!(
            target: targets::QUEUE,
            count = names.len(),
            "no loader registered, icons cannot be loaded"
        );
        for name in &names {
            storage.release(name);
        }
        return;
    };

    let scheduler = cache.inner.scheduler.clone();
    match &config.loader {
        IconLoader::Bulk(loader) => {
            let batches = split_for_batch_loading(names, config.batch_limits(prefix));
            tracing::debug!(target: targets::QUEUE, batches = batches.len(), "requesting batches");
            for names in batches {
                let request = BulkRequest {
                    provider: provider.to_string(),
                    prefix: prefix.to_string(),
                    names,
                };
                let future = loader.load_icons(request.clone());
                let storage = storage.clone();
                scheduler.spawn(Box::pin(async move {
                    let result = AssertUnwindSafe(future).catch_unwind().await;
                    match result {
                        Ok(result) => apply_bulk(&storage, &request.names, result),
                        Err(payload) => {
                            tracing::error!(
                                target: targets::QUEUE,
                                "bulk loader panicked: {}",
                                panic_message(payload.as_ref())
                            );
                            release_all(&storage, &request.names);
                        }
                    }
                }));
            }
        }
        IconLoader::Single(loader) => {
            tracing::debug!(target: targets::QUEUE, count = names.len(), "requesting icons");
            for name in names {
                let future = loader.load_icon(IconName::new(provider, prefix, name.as_str()));
                let storage = storage.clone();
                scheduler.spawn(Box::pin(async move {
                    let result = AssertUnwindSafe(future).catch_unwind().await;
                    match result {
                        Ok(result) => apply_single(&storage, &name, result),
                        Err(payload) => {
                            tracing::error!(
                                target: targets::QUEUE,
                                name = %name,
                                "icon loader panicked: {}",
                                panic_message(payload.as_ref())
                            );
                            storage.release(&name);
                        }
                    }
                }));
            }
        }
    }
}

fn apply_bulk(storage: &IconStorage, requested: &[String], result: Result<Option<IconSet>>) {
    match result {
        Ok(Some(set)) => {
            storage.add_icon_set(&set);
            for name in requested {
                if !set.mentions(name) {
                    storage.update(name, None);
                }
            }
        }
        Ok(None) => {
            tracing::warn!(
                target: targets::QUEUE,
                provider = storage.provider(),
                prefix = storage.prefix(),
                count = requested.len(),
                "icon source returned no data"
            );
            release_all(storage, requested);
        }
        Err(err) => {
            tracing::warn!(
                target: targets::QUEUE,
                provider = storage.provider(),
                prefix = storage.prefix(),
                count = requested.len(),
                error = %err,
                "icon source is unavailable"
            );
            release_all(storage, requested);
        }
    }
}

fn apply_single(storage: &IconStorage, name: &str, result: Result<Option<IconData>>) {
    match result {
        Ok(data) => {
            storage.update(name, data);
        }
        Err(err) => {
            tracing::warn!(
                target: targets::QUEUE,
                provider = storage.provider(),
                prefix = storage.prefix(),
                name,
                error = %err,
                "icon source is unavailable"
            );
            storage.release(name);
        }
    }
}

fn release_all(storage: &IconStorage, names: &[String]) {
    for name in names {
        storage.release(name);
    }
}

fn is_valid_request(icon: &IconName) -> bool {
    (icon.provider.is_empty() || is_valid_part(&icon.provider))
        && (icon.prefix.is_empty() || is_valid_part(&icon.prefix))
        && is_valid_part(&icon.name)
}

struct CallState {
    icons: Vec<IconName>,
    storages: BTreeMap<RegistryKey, IconStorage>,
    /// Names this call already reported as loaded (`true`) or missing.
    settled: HashMap<IconName, bool>,
    last: LoadProgress,
    done: bool,
}

impl CallState {
    /// Sort the requested names.
    ///
    /// A name leaves `pending` at most once per call: later reloads started
    /// by other calls do not move it back.
    fn sort(&mut self) -> LoadProgress {
        let mut progress = LoadProgress::default();
        for icon in &self.icons {
            let loaded = match self.settled.get(icon) {
                Some(&loaded) => loaded,
                None => {
                    let status = self
                        .storages
                        .get(&(icon.provider.clone(), icon.prefix.clone()))
                        .map_or(IconStatus::Unknown, |storage| storage.status(&icon.name));
                    let loaded = match status {
                        IconStatus::Pending => {
                            progress.pending.push(icon.clone());
                            continue;
                        }
                        IconStatus::Loaded => true,
                        IconStatus::Missing | IconStatus::Unknown => false,
                    };
                    self.settled.insert(icon.clone(), loaded);
                    loaded
                }
            };
            if loaded {
                progress.loaded.push(icon.clone());
            } else {
                progress.missing.push(icon.clone());
            }
        }
        progress
    }

    fn finish(&mut self, key: SubscriptionKey) {
        self.done = true;
        for storage in self.storages.values() {
            storage.unsubscribe(key);
        }
    }
}

/// One `load_icons` call.
///
/// Lock order: `callback`, then `state`, then storage locks.
struct LoadCall {
    key: SubscriptionKey,
    aborted: AtomicBool,
    scheduler: Arc<dyn Scheduler>,
    callback: Mutex<Option<ProgressCallback>>,
    state: Mutex<CallState>,
}

impl LoadCall {
    /// Re-sort and report if anything changed.
    fn check(&self) {
        let mut callback = self.callback.lock();
        let progress = {
            let mut state = self.state.lock();
            if state.done {
                return;
            }
            if self.aborted.load(Ordering::Acquire) {
                state.finish(self.key);
                *callback = None;
                return;
            }

            let progress = state.sort();
            if progress == state.last {
                return;
            }
            state.last = progress.clone();
            if progress.is_complete() {
                state.finish(self.key);
            }
            progress
        };

        tracing::trace!(
            target: targets::QUEUE,
            loaded = progress.loaded.len(),
            missing = progress.missing.len(),
            pending = progress.pending.len(),
            "load progress"
        );

        if let Some(callback) = callback.as_mut() {
            callback(&progress);
        }
        if progress.is_complete() {
            *callback = None;
        }
    }

    /// Report the initial state once, for calls with nothing to wait for.
    fn report_complete(&self) {
        let callback = self.callback.lock().take();
        let progress = {
            let mut state = self.state.lock();
            state.done = true;
            state.last.clone()
        };
        if self.aborted.load(Ordering::Acquire) {
            return;
        }
        if let Some(mut callback) = callback {
            callback(&progress);
        }
    }
}

/// Handle to a running load call.
#[derive(Clone)]
pub struct LoadHandle {
    call: Arc<LoadCall>,
}

impl LoadHandle {
    /// Stop delivering progress to the callback.
    ///
    /// This does not cancel loader invocations that are already running;
    /// they complete and populate the cache as usual.
    pub fn abort(&self) {
        if self.call.aborted.swap(true, Ordering::AcqRel) {
            return;
        }
        let call = self.call.clone();
        self.call.scheduler.defer(Box::new(move || call.check()));
    }

    /// Check if [`abort`](Self::abort) was called.
    pub fn is_aborted(&self) -> bool {
        self.call.aborted.load(Ordering::Acquire)
    }

    /// Check if the call has delivered its final progress, or was aborted
    /// and cleaned up.
    pub fn is_finished(&self) -> bool {
        self.call.state.lock().done
    }

    /// The latest progress seen by this call.
    pub fn progress(&self) -> LoadProgress {
        self.call.state.lock().last.clone()
    }
}

impl std::fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadHandle")
            .field("key", &self.call.key)
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

impl IconCache {
    /// Load icons, reporting progress to `callback`.
    ///
    /// The callback receives a [`LoadProgress`] whenever the state of the
    /// requested names changes, and always receives a final one with nothing
    /// pending. It never runs within this call. Unparseable names are
    /// ignored.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use horizon_icons_core::IconCache;
    ///
    /// # async fn example(cache: IconCache) {
    /// cache.load_icons(["mdi:home", "mdi:account"], |progress| {
    ///     if progress.is_complete() {
    ///         println!("loaded {} icons", progress.loaded.len());
    ///     }
    /// });
    /// # }
    /// ```
    pub fn load_icons<I, R, F>(&self, names: I, callback: F) -> LoadHandle
    where
        I: IntoIterator<Item = R>,
        R: Into<IconRef>,
        F: FnMut(&LoadProgress) + Send + 'static,
    {
        self.start_load(names, Some(Box::new(callback)))
    }

    /// Start loading icons without tracking progress.
    pub fn preload_icons<I, R>(&self, names: I) -> LoadHandle
    where
        I: IntoIterator<Item = R>,
        R: Into<IconRef>,
    {
        self.start_load(names, None)
    }

    /// Load icons and wait until nothing is pending.
    pub async fn load_icons_async<I, R>(&self, names: I) -> Result<LoadProgress>
    where
        I: IntoIterator<Item = R>,
        R: Into<IconRef>,
    {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let mut tx = Some(tx);
        let _handle = self.load_icons(names, move |progress: &LoadProgress| {
            if !progress.is_complete() {
                return;
            }
            if let Some(tx) = tx.take() {
                let _ = tx.send(progress.clone());
            }
        });
        rx.await
            .map_err(|_| IconError::loader("load call ended without a result"))
    }

    /// Load one icon and return its data.
    ///
    /// Fails with [`IconError::NotFound`] when the icon does not exist and
    /// with [`IconError::Unavailable`] when its source could not be
    /// consulted.
    pub async fn load_icon(&self, name: impl Into<IconRef>) -> Result<Arc<IconData>> {
        let name = name.into();
        let Some(icon) = self.parse_name(name.clone()) else {
            let text = match name {
                IconRef::Name(icon) => icon.to_string(),
                IconRef::Text(text) => text,
            };
            return Err(IconError::InvalidName(text));
        };

        self.load_icons_async([icon.clone()]).await?;

        let storage = self.storage(&icon.provider, &icon.prefix);
        match storage.get(&icon.name) {
            Lookup::Loaded(data) => Ok(data),
            Lookup::Missing => Err(IconError::NotFound(icon.to_string())),
            Lookup::Unknown => Err(IconError::unavailable(
                icon.provider,
                icon.prefix,
                "icon source could not be consulted",
            )),
        }
    }

    fn start_load<I, R>(&self, names: I, callback: Option<ProgressCallback>) -> LoadHandle
    where
        I: IntoIterator<Item = R>,
        R: Into<IconRef>,
    {
        let split = split_icon_names(names, self.inner.config.simple_names, None);
        let icons = flatten_split_icon_names(&split);
        let mut storages = BTreeMap::new();

        for (provider, prefixes) in &split {
            for (prefix, names) in prefixes {
                let storage = self.storage(provider, prefix);
                let config = self.inner.loaders.get_loader(provider, prefix);
                let queued = self.request_unknown(&storage, config.as_deref(), names);
                self.inner.queue.enqueue(self, provider, prefix, queued);
                storages.insert((provider.clone(), prefix.clone()), storage);
            }
        }

        let mut state = CallState {
            icons,
            storages,
            settled: HashMap::new(),
            last: LoadProgress::default(),
            done: false,
        };
        let initial = state.sort();
        state.last = initial;

        tracing::debug!(
            target: targets::QUEUE,
            loaded = state.last.loaded.len(),
            missing = state.last.missing.len(),
            pending = state.last.pending.len(),
            "load started"
        );

        let call = Arc::new(LoadCall {
            key: SubscriptionKey::new(),
            aborted: AtomicBool::new(false),
            scheduler: self.inner.scheduler.clone(),
            callback: Mutex::new(callback),
            state: Mutex::new(state),
        });

        let complete = call.state.lock().last.is_complete();
        if complete {
            let deferred = call.clone();
            self.inner
                .scheduler
                .defer(Box::new(move || deferred.report_complete()));
            return LoadHandle { call };
        }

        {
            let state = call.state.lock();
            for ((provider, prefix), storage) in &state.storages {
                let names: Vec<String> = state
                    .icons
                    .iter()
                    .filter(|icon| &icon.provider == provider && &icon.prefix == prefix)
                    .map(|icon| icon.name.clone())
                    .collect();
                if names.is_empty() {
                    continue;
                }
                let subscriber = call.clone();
                storage.subscribe(names, move |_: &[String]| subscriber.check(), Some(call.key));
            }
        }

        // Catch changes delivered between sorting and subscribing.
        let recheck = call.clone();
        self.inner.scheduler.defer(Box::new(move || recheck.check()));

        LoadHandle { call }
    }

    /// Mark names that need loading as pending and return the ones that
    /// were not already in flight.
    fn request_unknown(
        &self,
        storage: &IconStorage,
        config: Option<&LoaderConfig>,
        names: &[String],
    ) -> Vec<String> {
        let validate = config.is_some_and(|c| c.validate_names);
        let allow_reload = config.is_some_and(|c| c.allow_reload);
        let mut queued = Vec::new();

        for name in names {
            match storage.status(name) {
                IconStatus::Loaded | IconStatus::Pending => continue,
                IconStatus::Missing if !allow_reload => continue,
                IconStatus::Missing | IconStatus::Unknown => {}
            }

            if validate {
                let icon = IconName::new(storage.provider(), storage.prefix(), name.as_str());
                if !is_valid_request(&icon) {
                    tracing::debug!(target: targets::QUEUE, icon = %icon, "invalid icon name");
                    storage.update(name, None);
                    continue;
                }
            }

            if storage.mark_pending(name) {
                queued.push(name.clone());
            }
        }
        queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use std::sync::atomic::AtomicUsize;

    fn cache() -> (IconCache, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let cache = IconCache::builder().scheduler(scheduler.clone()).build();
        (cache, scheduler)
    }

    fn record() -> (
        Arc<Mutex<Vec<LoadProgress>>>,
        impl FnMut(&LoadProgress) + Send + 'static,
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        (log, move |progress: &LoadProgress| l.lock().push(progress.clone()))
    }

    #[tokio::test]
    async fn test_nothing_pending_reports_once_deferred() {
        let (cache, scheduler) = cache();
        cache.add_icon("mdi:home", IconData::new("<g/>"));
        cache.storage("", "mdi").update("nope", None);
        scheduler.run_ready();

        let (log, callback) = record();
        let handle = cache.load_icons(["mdi:home", "mdi:nope"], callback);
        assert!(log.lock().is_empty());

        scheduler.run_until_idle().await;
        let log = log.lock();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].loaded, vec![IconName::new("", "mdi", "home")]);
        assert_eq!(log[0].missing, vec![IconName::new("", "mdi", "nope")]);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_calls_in_one_tick_share_a_loader_call() {
        let (cache, scheduler) = cache();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        cache.set_loader(
            "mdi",
            LoaderConfig::bulk(move |request: BulkRequest| {
                c.lock().push(request.names.clone());
                async move {
                    let mut set = IconSet::new(request.prefix.as_str());
                    for name in &request.names {
                        set = set.with_icon(name.as_str(), IconData::new("<g/>"));
                    }
                    Ok(Some(set))
                }
            }),
        );

        let (first, first_cb) = record();
        let (second, second_cb) = record();
        cache.load_icons(["mdi:home", "mdi:account"], first_cb);
        cache.load_icons(["mdi:account", "mdi:settings"], second_cb);

        scheduler.run_until_idle().await;

        assert_eq!(
            *calls.lock(),
            vec![vec![
                "account".to_string(),
                "home".to_string(),
                "settings".to_string()
            ]]
        );
        assert!(first.lock().last().unwrap().is_complete());
        assert_eq!(second.lock().last().unwrap().loaded.len(), 2);
    }

    #[tokio::test]
    async fn test_batches_follow_limits() {
        let (cache, scheduler) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        cache.set_loader(
            "mdi",
            LoaderConfig::bulk(move |request: BulkRequest| {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(Some(IconSet::new(request.prefix))) }
            })
            .max_count(2),
        );

        let (log, callback) = record();
        cache.load_icons(["mdi:a", "mdi:b", "mdi:c"], callback);
        scheduler.run_until_idle().await;
        let progress = log.lock().last().cloned().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(progress.missing.len(), 3);
        assert!(progress.loaded.is_empty());
    }

    #[tokio::test]
    async fn test_single_loader_called_per_name() {
        let (cache, scheduler) = cache();
        cache.set_loader(
            "mdi",
            LoaderConfig::single(|icon: IconName| async move {
                if icon.name == "home" {
                    Ok(Some(IconData::new("<home/>")))
                } else {
                    Ok(None)
                }
            }),
        );

        let (log, callback) = record();
        cache.load_icons(["mdi:home", "mdi:nope"], callback);
        scheduler.run_until_idle().await;

        let last = log.lock().last().cloned().unwrap();
        assert_eq!(last.loaded, vec![IconName::new("", "mdi", "home")]);
        assert_eq!(last.missing, vec![IconName::new("", "mdi", "nope")]);
        assert!(cache.get_icon("mdi:nope").is_missing());
    }

    #[tokio::test]
    async fn test_abort_silences_callback() {
        let (cache, scheduler) = cache();
        cache.set_loader(
            "mdi",
            LoaderConfig::single(|_icon: IconName| async { Ok(Some(IconData::new("<g/>"))) }),
        );

        let (log, callback) = record();
        let handle = cache.load_icons(["mdi:home"], callback);
        handle.abort();
        assert!(handle.is_aborted());

        scheduler.run_until_idle().await;
        assert!(log.lock().is_empty());
        assert!(cache.icon_exists("mdi:home"));
        assert_eq!(cache.storage("", "mdi").subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_panicking_loader_releases_names() {
        let (cache, scheduler) = cache();
        cache.set_loader(
            "mdi",
            LoaderConfig::bulk(|request: BulkRequest| async move {
                if !request.names.is_empty() {
                    panic!("loader failed");
                }
                Ok(None)
            }),
        );

        let (log, callback) = record();
        cache.load_icons(["mdi:home"], callback);
        scheduler.run_until_idle().await;

        let last = log.lock().last().cloned().unwrap();
        assert_eq!(last.missing, vec![IconName::new("", "mdi", "home")]);
        assert_eq!(cache.get_icon("mdi:home"), Lookup::Unknown);
    }

    #[tokio::test]
    async fn test_reload_by_later_call_keeps_earlier_call_finishing() {
        let (cache, scheduler) = cache();
        let loader = |request: BulkRequest| async move {
            let mut set = IconSet::new(request.prefix.as_str());
            for name in request.names.iter().filter(|name| *name != "y") {
                set = set.with_icon(name.as_str(), IconData::new("<g/>"));
            }
            Ok::<_, IconError>(Some(set))
        };
        cache.set_loader("mdi", LoaderConfig::bulk(loader));
        cache.storage("", "mdi").update("y", None);
        scheduler.run_ready();

        let (first, first_cb) = record();
        let handle = cache.load_icons(["mdi:a", "mdi:y"], first_cb);
        scheduler.run_ready();

        // "y" goes back to pending for the second call only
        cache.set_loader("mdi", LoaderConfig::bulk(loader).allow_reload(true));
        let (second, second_cb) = record();
        cache.load_icons(["mdi:y"], second_cb);
        scheduler.run_until_idle().await;

        assert!(handle.is_finished());
        let y = IconName::new("", "mdi", "y");
        let log = first.lock();
        assert!(log.iter().all(|progress| progress.missing.contains(&y)));
        let last = log.last().cloned().unwrap();
        assert!(last.is_complete());
        assert_eq!(last.loaded, vec![IconName::new("", "mdi", "a")]);
        assert_eq!(last.missing, vec![y.clone()]);

        let last = second.lock().last().cloned().unwrap();
        assert_eq!(last.missing, vec![IconName::new("", "mdi", "y")]);
        assert!(cache.get_icon("mdi:y").is_missing());
    }

    #[test]
    fn test_is_valid_request() {
        assert!(is_valid_request(&IconName::new("", "mdi", "home")));
        assert!(is_valid_request(&IconName::new("", "", "home")));
        assert!(!is_valid_request(&IconName::new("", "mdi", "Home")));
        assert!(!is_valid_request(&IconName::new("Acme", "mdi", "home")));
    }
}
