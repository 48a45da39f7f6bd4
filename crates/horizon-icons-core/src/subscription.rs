//! Subscriber bookkeeping for icon registries.
//!
//! A subscriber watches a set of icon names (or every name, via the `"*"`
//! sentinel) in one registry and is called once per notification tick in
//! which any watched name changed.
//!
//! Subscriptions are identified by a [`SubscriptionKey`]. Subscribing again
//! with the same key replaces the earlier record, so callers that re-render
//! can re-subscribe freely without accumulating duplicates.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The name that makes a subscriber watch every icon in a registry.
pub const WATCH_ALL: &str = "*";

/// Callback invoked with the names that changed in one tick.
pub type SubscriberCallback = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Identifies one subscription.
///
/// Keys are allocated from a process-wide counter and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey(u64);

impl SubscriptionKey {
    /// Allocate a fresh key.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this key.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for SubscriptionKey {
    fn default() -> Self {
        Self::new()
    }
}

/// What a subscriber watches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Watch {
    /// Every name in the registry.
    All,
    /// A specific set of names.
    Names(HashSet<String>),
}

impl Watch {
    /// Build from a list of names. Any `"*"` entry makes it [`Watch::All`].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = HashSet::new();
        for name in names {
            let name = name.into();
            if name == WATCH_ALL {
                return Self::All;
            }
            set.insert(name);
        }
        Self::Names(set)
    }

    /// Check whether any of `changes` is watched.
    pub fn matches(&self, changes: &BTreeSet<String>) -> bool {
        match self {
            Self::All => !changes.is_empty(),
            Self::Names(names) => changes.iter().any(|name| names.contains(name)),
        }
    }
}

struct Subscriber {
    key: SubscriptionKey,
    watch: Watch,
    callback: SubscriberCallback,
}

/// Ordered list of subscribers for one registry.
#[derive(Default)]
pub struct SubscriberList {
    subscribers: Vec<Subscriber>,
}

impl SubscriberList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber, replacing any existing record under `key`.
    ///
    /// A replaced subscriber moves to the end of the delivery order.
    pub fn subscribe(
        &mut self,
        watch: Watch,
        callback: SubscriberCallback,
        key: Option<SubscriptionKey>,
    ) -> SubscriptionKey {
        let key = key.unwrap_or_default();
        self.unsubscribe(key);
        self.subscribers.push(Subscriber {
            key,
            watch,
            callback,
        });
        key
    }

    /// Remove the subscriber registered under `key`.
    ///
    /// Returns `true` if one was removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.key != key);
        self.subscribers.len() != before
    }

    /// Check if a subscriber is registered under `key`.
    pub fn contains(&self, key: SubscriptionKey) -> bool {
        self.subscribers.iter().any(|s| s.key == key)
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Callbacks affected by `changes`, in registration order.
    pub fn affected(
        &self,
        changes: &BTreeSet<String>,
    ) -> Vec<(SubscriptionKey, SubscriberCallback)> {
        self.subscribers
            .iter()
            .filter(|s| s.watch.matches(changes))
            .map(|s| (s.key, s.callback.clone()))
            .collect()
    }
}

impl std::fmt::Debug for SubscriberList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.subscribers.iter().map(|s| (s.key, &s.watch)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> SubscriberCallback {
        Arc::new(|_| {})
    }

    fn changes(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_keys_are_unique() {
        let a = SubscriptionKey::new();
        let b = SubscriptionKey::new();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn test_watch_from_names() {
        assert_eq!(Watch::from_names(["a", "*", "b"]), Watch::All);

        let watch = Watch::from_names(["home", "account"]);
        assert!(watch.matches(&changes(&["home"])));
        assert!(!watch.matches(&changes(&["settings"])));
        assert!(!watch.matches(&changes(&[])));
        assert!(Watch::All.matches(&changes(&["anything"])));
    }

    #[test]
    fn test_resubscribe_replaces() {
        let mut list = SubscriberList::new();
        let key = list.subscribe(Watch::from_names(["a"]), noop(), None);
        let same = list.subscribe(Watch::from_names(["b"]), noop(), Some(key));

        assert_eq!(key, same);
        assert_eq!(list.len(), 1);
        assert!(list.affected(&changes(&["a"])).is_empty());
        assert_eq!(list.affected(&changes(&["b"])).len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut list = SubscriberList::new();
        let key = list.subscribe(Watch::All, noop(), None);
        assert!(list.contains(key));
        assert!(list.unsubscribe(key));
        assert!(!list.unsubscribe(key));
        assert!(list.is_empty());
    }

    #[test]
    fn test_affected_in_registration_order() {
        let mut list = SubscriberList::new();
        let first = list.subscribe(Watch::All, noop(), None);
        let _skipped = list.subscribe(Watch::from_names(["x"]), noop(), None);
        let third = list.subscribe(Watch::from_names(["a", "b"]), noop(), None);

        let keys: Vec<_> = list
            .affected(&changes(&["b"]))
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec![first, third]);
    }
}
