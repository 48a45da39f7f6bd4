//! Core systems for Horizon Icons.
//!
//! This crate provides the in-memory side of the icon cache:
//!
//! - **Registry**: per provider/prefix icon storage with loaded, missing and
//!   pending bookkeeping ([`IconStorage`])
//! - **Subscriptions**: coalesced change notifications, one delivery per
//!   subscriber per tick
//! - **Name handling**: parsing, validation and grouping of icon names
//! - **Batching**: splitting name lists into loader-sized requests
//! - **Loaders**: single and bulk loaders resolved per provider or prefix
//! - **Load queue**: on-demand loading with progress callbacks
//! - **Scheduler**: injectable deferred execution, with a manual scheduler
//!   for deterministic tests
//!
//! Network access lives in `horizon-icons-net`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_icons_core::{
//!     BulkRequest, IconCache, IconData, IconSet, LoaderConfig, ManualScheduler,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let scheduler = Arc::new(ManualScheduler::new());
//! let cache = IconCache::builder().scheduler(scheduler.clone()).build();
//!
//! cache.set_provider_loader(
//!     "acme",
//!     LoaderConfig::bulk(|request: BulkRequest| async move {
//!         let mut set = IconSet::new(request.prefix);
//!         if request.names.iter().any(|name| name == "foo") {
//!             set = set.with_icon("foo", IconData::new("<g/>"));
//!         }
//!         Ok(Some(set))
//!     }),
//! );
//!
//! cache.load_icons(["@acme:test:foo"], |progress| {
//!     if progress.is_complete() {
//!         assert_eq!(progress.loaded.len(), 1);
//!     }
//! });
//! scheduler.run_until_idle().await;
//!
//! assert_eq!(cache.get_icon("@acme:test:foo").data().unwrap().body, "<g/>");
//! # });
//! ```

mod batch;
mod cache;
mod error;
mod icon;
mod loader;
pub mod logging;
mod name;
mod queue;
pub mod scheduler;
mod split;
mod storage;
pub mod subscription;

pub use batch::{BatchLimits, split_for_batch_loading};
pub use cache::{CacheConfig, IconCache, IconCacheBuilder};
pub use error::{IconError, Result};
pub use icon::{IconData, IconSet};
pub use loader::{
    BulkIconLoader, BulkRequest, IconLoader, LoaderConfig, LoaderRegistry, SingleIconLoader,
};
pub use name::{IconName, IconRef, is_valid_part};
pub use queue::{LoadHandle, LoadProgress};
pub use scheduler::{JobId, ManualScheduler, Scheduler, Task, TokioScheduler};
pub use split::{SplitIconNames, flatten_split_icon_names, merge_split_icon_names, split_icon_names};
pub use storage::{IconStatus, IconStorage, Lookup};
pub use subscription::{SubscriptionKey, WATCH_ALL};
