//! Icon registry for one `(provider, prefix)` pair.
//!
//! An [`IconStorage`] tracks which icons are loaded, which are confirmed
//! missing and which are in flight. [`IconStorage::update`] and
//! [`IconStorage::release`] are the only ways to change resolution state;
//! both record the change and schedule a notification tick, so a burst of
//! updates from one loader response reaches each subscriber once.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::icon::{IconData, IconSet};
use crate::logging::{panic_message, span_names, targets};
use crate::scheduler::Scheduler;
use crate::subscription::{SubscriberList, SubscriptionKey, Watch};

/// Result of a three-state lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    /// The icon is loaded.
    Loaded(Arc<IconData>),
    /// The icon is confirmed absent.
    Missing,
    /// Nothing is known about the icon yet.
    Unknown,
}

impl Lookup {
    /// Get the icon data if loaded.
    pub fn data(&self) -> Option<&Arc<IconData>> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Check if the icon is loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Check if the icon is confirmed missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Check if the icon is either loaded or confirmed missing.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Resolution state of one name, including in-flight bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconStatus {
    /// Loaded.
    Loaded,
    /// Confirmed missing.
    Missing,
    /// Being loaded.
    Pending,
    /// Not known and not being loaded.
    Unknown,
}

enum Commit {
    Store(IconData),
    Absent,
    Release,
}

#[derive(Default)]
struct StorageState {
    icons: HashMap<String, Arc<IconData>>,
    missing: HashSet<String>,
    pending: HashSet<String>,
    subscribers: SubscriberList,
    changes: BTreeSet<String>,
    tick_scheduled: bool,
}

struct StorageInner {
    provider: String,
    prefix: String,
    state: Mutex<StorageState>,
    scheduler: Arc<dyn Scheduler>,
}

/// Icon registry for one provider and prefix.
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct IconStorage {
    inner: Arc<StorageInner>,
}

impl IconStorage {
    /// Create an empty registry that schedules ticks on `scheduler`.
    pub fn new(
        provider: impl Into<String>,
        prefix: impl Into<String>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Arc::new(StorageInner {
                provider: provider.into(),
                prefix: prefix.into(),
                state: Mutex::new(StorageState::default()),
                scheduler,
            }),
        }
    }

    /// The provider this registry belongs to.
    pub fn provider(&self) -> &str {
        &self.inner.provider
    }

    /// The icon set prefix this registry belongs to.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    /// Look up an icon.
    pub fn get(&self, name: &str) -> Lookup {
        let state = self.inner.state.lock();
        if let Some(data) = state.icons.get(name) {
            Lookup::Loaded(data.clone())
        } else if state.missing.contains(name) {
            Lookup::Missing
        } else {
            Lookup::Unknown
        }
    }

    /// Get the resolution state of a name.
    ///
    /// A name that is being reloaded reports [`IconStatus::Pending`] even
    /// though it is still recorded as missing.
    pub fn status(&self, name: &str) -> IconStatus {
        let state = self.inner.state.lock();
        if state.pending.contains(name) {
            IconStatus::Pending
        } else if state.icons.contains_key(name) {
            IconStatus::Loaded
        } else if state.missing.contains(name) {
            IconStatus::Missing
        } else {
            IconStatus::Unknown
        }
    }

    /// Check if a name is being loaded.
    pub fn is_pending(&self, name: &str) -> bool {
        self.inner.state.lock().pending.contains(name)
    }

    /// Mark a name as being loaded.
    ///
    /// Returns `false` if it already was.
    pub fn mark_pending(&self, name: &str) -> bool {
        self.inner.state.lock().pending.insert(name.to_string())
    }

    /// Store icon data, or record the icon as missing when `data` is `None`.
    ///
    /// Always clears the pending flag. Writing the value that is already
    /// stored (or `None` for an already-missing icon) changes nothing and
    /// does not notify, unless it cleared a pending flag.
    ///
    /// Returns `true` if a change was recorded.
    pub fn update(&self, name: &str, data: Option<IconData>) -> bool {
        match data {
            Some(data) => self.commit(name, Commit::Store(data)),
            None => self.commit(name, Commit::Absent),
        }
    }

    /// Give up on loading a name without recording an answer.
    ///
    /// Used when the source could not be consulted: the name stops being
    /// pending and becomes unknown again, so a later load may retry it.
    pub fn release(&self, name: &str) -> bool {
        self.commit(name, Commit::Release)
    }

    /// Store every icon of a set and record its `not_found` names as missing.
    ///
    /// Returns the names that were written.
    pub fn add_icon_set(&self, set: &IconSet) -> Vec<String> {
        let mut written = Vec::with_capacity(set.icons.len() + set.not_found.len());
        for name in set.icons.keys() {
            if let Some(icon) = set.resolve_icon(name) {
                self.update(name, Some(icon));
                written.push(name.clone());
            }
        }
        for name in &set.not_found {
            if !set.icons.contains_key(name) {
                self.update(name, None);
                written.push(name.clone());
            }
        }
        written
    }

    fn commit(&self, name: &str, commit: Commit) -> bool {
        let mut state = self.inner.state.lock();
        let was_pending = state.pending.remove(name);

        let changed = match commit {
            Commit::Store(data) => {
                let same = state
                    .icons
                    .get(name)
                    .is_some_and(|current| **current == data);
                if !same {
                    state.icons.insert(name.to_string(), Arc::new(data));
                    state.missing.remove(name);
                }
                !same
            }
            Commit::Absent => {
                let removed = state.icons.remove(name).is_some();
                state.missing.insert(name.to_string()) || removed
            }
            Commit::Release => false,
        };

        if !changed && !was_pending {
            return false;
        }

        tracing::trace!(
            target: targets::STORAGE,
            provider = %self.inner.provider,
            prefix = %self.inner.prefix,
            name,
            changed,
            "icon state updated"
        );

        state.changes.insert(name.to_string());
        if !state.tick_scheduled {
            state.tick_scheduled = true;
            let storage = self.clone();
            self.inner.scheduler.defer(Box::new(move || storage.tick()));
        }
        true
    }

    /// Deliver the accumulated change-set to affected subscribers.
    fn tick(&self) {
        let (changes, callbacks) = {
            let mut state = self.inner.state.lock();
            state.tick_scheduled = false;
            let changes = std::mem::take(&mut state.changes);
            let callbacks = state.subscribers.affected(&changes);
            (changes, callbacks)
        };

        if changes.is_empty() {
            return;
        }

        let _span = tracing::debug_span!(
            target: targets::STORAGE,
            "tick",
            operation = span_names::TICK,
            provider = %self.inner.provider,
            prefix = %self.inner.prefix
        )
        .entered();
        tracing::debug!(
            target: targets::STORAGE,
            changes = changes.len(),
            subscribers = callbacks.len(),
            "delivering notifications"
        );

        let names: Vec<String> = changes.into_iter().collect();
        for (key, callback) in callbacks {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(&names))) {
                tracing::error!(
                    target: targets::SUBSCRIPTION,
                    subscription = key.as_u64(),
                    "subscriber callback panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    /// Subscribe to changes of `names` (or of every name, with `"*"`).
    ///
    /// Passing an existing `key` replaces that subscription.
    pub fn subscribe<I, S, F>(
        &self,
        names: I,
        callback: F,
        key: Option<SubscriptionKey>,
    ) -> SubscriptionKey
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        let watch = Watch::from_names(names);
        self.inner
            .state
            .lock()
            .subscribers
            .subscribe(watch, Arc::new(callback), key)
    }

    /// Remove a subscription. Returns `true` if it existed.
    pub fn unsubscribe(&self, key: SubscriptionKey) -> bool {
        self.inner.state.lock().subscribers.unsubscribe(key)
    }

    /// Number of loaded icons.
    pub fn loaded_count(&self) -> usize {
        self.inner.state.lock().icons.len()
    }

    /// Names of loaded icons, sorted.
    pub fn icon_names(&self) -> Vec<String> {
        let state = self.inner.state.lock();
        let mut names: Vec<String> = state.icons.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }
}

impl std::fmt::Debug for IconStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("IconStorage")
            .field("provider", &self.inner.provider)
            .field("prefix", &self.inner.prefix)
            .field("icons", &state.icons.len())
            .field("missing", &state.missing.len())
            .field("pending", &state.pending.len())
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
