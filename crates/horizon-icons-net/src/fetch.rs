//! Redundant JSON fetching across mirror hosts.
//!
//! [`RedundantFetcher::fetch_json`] requests the same endpoint from a list of
//! mirrors. Attempts are staggered: the attempt at position `i` starts after
//! `i × delay`, or as soon as every attempt ahead of it has failed. The first
//! successful response wins and all other attempts are aborted.
//!
//! The fetcher remembers which host answered last for each host list and
//! tries it first next time.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use horizon_icons_net::RedundantFetcher;
//!
//! # async fn example() -> horizon_icons_net::Result<()> {
//! let fetcher = RedundantFetcher::builder()
//!     .delay(Duration::from_millis(500))
//!     .build()?;
//!
//! let hosts = vec![
//!     "https://api.iconify.design".to_string(),
//!     "https://api.simplesvg.com".to_string(),
//! ];
//! let data: serde_json::Value = fetcher.fetch_json(&hosts, "/mdi.json?icons=home").await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use http::header::ACCEPT;
use parking_lot::Mutex;
use rand::Rng;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{NetworkError, Result};
use crate::logging::targets;

/// Default delay between staggered attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(750);

/// Configuration for the redundant fetcher.
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    /// Delay before each further host is tried.
    pub delay: Duration,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// User agent.
    pub user_agent: Option<String>,
    /// Start at a random host when there is no remembered preference.
    pub random_start: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(format!(
                "HorizonIcons/{} (Rust)",
                env!("CARGO_PKG_VERSION")
            )),
            random_start: false,
        }
    }
}

/// Builder for [`RedundantFetcher`].
#[derive(Default)]
pub struct RedundantFetcherBuilder {
    config: FetcherConfig,
}

impl RedundantFetcherBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: FetcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the delay between staggered attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the per-request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Start at a random host when no host is preferred yet.
    pub fn random_start(mut self, enabled: bool) -> Self {
        self.config.random_start = enabled;
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> Result<RedundantFetcher> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(ref ua) = self.config.user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder.build()?;

        Ok(RedundantFetcher {
            inner: Arc::new(FetcherInner {
                client,
                config: self.config,
                preferred: Mutex::new(HashMap::new()),
            }),
        })
    }
}

struct FetcherInner {
    client: reqwest::Client,
    config: FetcherConfig,
    /// Index of the last winning host, keyed by the joined host list.
    preferred: Mutex<HashMap<String, usize>>,
}

/// Fetches JSON from the first of several mirror hosts that answers.
///
/// Cheap to clone; clones share the connection pool and host preferences.
#[derive(Clone)]
pub struct RedundantFetcher {
    inner: Arc<FetcherInner>,
}

impl Default for RedundantFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RedundantFetcher {
    /// Create a fetcher with default configuration.
    pub fn new() -> Self {
        RedundantFetcherBuilder::new()
            .build()
            .expect("Failed to create fetcher with default configuration")
    }

    /// Create a builder.
    pub fn builder() -> RedundantFetcherBuilder {
        RedundantFetcherBuilder::new()
    }

    /// Get the fetcher's configuration.
    pub fn config(&self) -> &FetcherConfig {
        &self.inner.config
    }

    /// Index of the host that answered last for this host list.
    pub fn preferred_host(&self, hosts: &[String]) -> Option<usize> {
        self.inner.preferred.lock().get(&preference_key(hosts)).copied()
    }

    /// Forget all remembered host preferences.
    pub fn clear_preferences(&self) {
        self.inner.preferred.lock().clear();
    }

    /// Fetch `endpoint` from the first host that answers with JSON.
    ///
    /// `endpoint` is appended to each host as-is and should start with `/`.
    /// A 404 answer is returned immediately without trying other hosts,
    /// since every mirror serves the same data.
    #[tracing::instrument(
        target = "horizon_icons_net::fetch",
        level = "debug",
        skip(self, hosts),
        fields(hosts = hosts.len())
    )]
    pub async fn fetch_json<T>(&self, hosts: &[String], endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if hosts.is_empty() {
            return Err(NetworkError::NoHosts);
        }

        let key = preference_key(hosts);
        let start = self.start_index(&key, hosts.len());
        let order: Vec<usize> = (0..hosts.len()).map(|i| (start + i) % hosts.len()).collect();

        let abort = AbortSignal::new();
        let (failed_tx, failed_rx) = watch::channel(0usize);
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();
        let mut tasks = AbortOnDrop(Vec::with_capacity(order.len()));

        for (position, &index) in order.iter().enumerate() {
            let url = build_url(&hosts[index], endpoint);
            let client = self.inner.client.clone();
            let abort = abort.clone();
            let failed = failed_rx.clone();
            let results = result_tx.clone();
            let delay = self.inner.config.delay * position as u32;

            tasks.0.push(tokio::spawn(async move {
                if position > 0 {
                    tokio::select! {
                        biased;
                        _ = abort.aborted() => return,
                        _ = tokio::time::sleep(delay) => {}
                        _ = wait_for_failures(failed, position) => {}
                    }
                }
                if abort.is_aborted() {
                    return;
                }

                let result = match url {
                    Ok(url) => {
                        tokio::select! {
                            biased;
                            _ = abort.aborted() => return,
                            result = request_json::<T>(&client, url) => result,
                        }
                    }
                    Err(err) => Err(err),
                };
                let _ = results.send((index, result));
            }));
        }
        drop(result_tx);

        let mut failures = 0;
        let mut last_error = None;
        while let Some((index, result)) = result_rx.recv().await {
            match result {
                Ok(value) => {
                    abort.abort();
                    self.inner.preferred.lock().insert(key, index);
                    tracing::debug!(
                        target: targets::FETCH,
                        host = %hosts[index],
                        failures,
                        "host answered"
                    );
                    return Ok(value);
                }
                Err(err) if err.is_not_found() => {
                    abort.abort();
                    tracing::debug!(
                        target: targets::FETCH,
                        host = %hosts[index],
                        "resource not found"
                    );
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        target: targets::FETCH,
                        host = %hosts[index],
                        error = %err,
                        "host failed"
                    );
                    failures += 1;
                    failed_tx.send_replace(failures);
                    last_error = Some(err);
                    if failures == hosts.len() {
                        break;
                    }
                }
            }
        }

        drop(tasks);
        Err(NetworkError::Unreachable {
            attempts: failures,
            last: Box::new(last_error.unwrap_or(NetworkError::Cancelled)),
        })
    }

    fn start_index(&self, key: &str, count: usize) -> usize {
        if let Some(&index) = self.inner.preferred.lock().get(key)
            && index < count
        {
            return index;
        }
        if self.inner.config.random_start {
            rand::thread_rng().gen_range(0..count)
        } else {
            0
        }
    }
}

impl std::fmt::Debug for RedundantFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedundantFetcher")
            .field("config", &self.inner.config)
            .finish()
    }
}

fn preference_key(hosts: &[String]) -> String {
    hosts.join(",")
}

fn build_url(host: &str, endpoint: &str) -> Result<Url> {
    let url = Url::parse(&format!("{}{}", host.trim_end_matches('/'), endpoint))?;
    Ok(url)
}

async fn request_json<T: DeserializeOwned>(client: &reqwest::Client, url: Url) -> Result<T> {
    let response = client
        .get(url)
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::HttpStatus {
            status: status.as_u16(),
            message: status.canonical_reason().map(String::from),
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Resolve once at least `count` attempts have failed.
async fn wait_for_failures(mut failed: watch::Receiver<usize>, count: usize) {
    loop {
        let current = *failed.borrow_and_update();
        if current >= count {
            return;
        }
        if failed.changed().await.is_err() {
            // The fetch has returned; the task is about to be aborted.
            std::future::pending::<()>().await;
        }
    }
}

struct AbortOnDrop(Vec<JoinHandle<()>>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Tells the remaining attempts of one fetch to stand down.
///
/// Raised once a host has answered (or reported that the resource does not
/// exist). Attempts still waiting for their turn, or with a request in
/// flight, race against [`aborted`](Self::aborted) and drop out.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    raised: Arc<watch::Sender<bool>>,
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    /// Create a lowered signal.
    pub fn new() -> Self {
        let (raised, _) = watch::channel(false);
        Self {
            raised: Arc::new(raised),
        }
    }

    /// Check if the signal was raised.
    pub fn is_aborted(&self) -> bool {
        *self.raised.borrow()
    }

    /// Raise the signal. Raising it again has no effect.
    pub fn abort(&self) {
        self.raised.send_if_modified(|raised| !std::mem::replace(raised, true));
    }

    /// Resolve once the signal is raised.
    pub async fn aborted(&self) {
        let mut rx = self.raised.subscribe();
        // The sender lives as long as `self`, so this only ends when raised.
        let _ = rx.wait_for(|raised| *raised).await;
    }
}
