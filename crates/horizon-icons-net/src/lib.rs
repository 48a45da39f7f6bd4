//! Networking module for Horizon Icons.
//!
//! This crate loads icons over HTTP for a `horizon-icons-core` cache:
//!
//! - **Redundant fetching**: [`RedundantFetcher`] races mirror hosts with a
//!   staggered start and remembers which one answered
//! - **Icon API loader**: [`ApiLoader`] requests batches of icons from an
//!   Iconify-compatible API
//! - **Provider configuration**: [`add_api_provider`] and
//!   [`ProvidersConfig`], loadable from TOML or JSON
//!
//! # Example
//!
//! ```no_run
//! use horizon_icons_core::IconCache;
//! use horizon_icons_net::{ApiProviderConfig, RedundantFetcher, add_api_provider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = IconCache::new();
//! add_api_provider(&cache, "", ApiProviderConfig::iconify(), RedundantFetcher::new())?;
//!
//! let icon = cache.load_icon("mdi:home").await?;
//! println!("{}", icon.body);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
mod error;
pub mod fetch;
pub mod logging;

pub use api::{ApiLoader, ApiProviderConfig, add_api_provider};
pub use config::{FetcherSettings, ProvidersConfig};
pub use error::{NetworkError, Result};
pub use fetch::{AbortSignal, FetcherConfig, RedundantFetcher, RedundantFetcherBuilder};
