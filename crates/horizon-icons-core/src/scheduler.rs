//! Deferred work scheduling.
//!
//! Notification ticks and loader invocations never run inside the call that
//! triggered them; they are handed to a [`Scheduler`]. Two implementations
//! are provided:
//!
//! - [`TokioScheduler`]: runs work on tokio tasks (the default).
//! - [`ManualScheduler`]: queues work until the owner drives it, so tests can
//!   step through ticks deterministically.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::logging::{panic_message, targets};

/// A boxed deferred task.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Executes deferred work for an icon cache.
pub trait Scheduler: Send + Sync {
    /// Run `task` later, never synchronously within this call.
    fn defer(&self, task: Task);

    /// Drive `future` to completion in the background.
    fn spawn(&self, future: BoxFuture<'static, ()>);
}

/// Scheduler backed by tokio tasks.
///
/// Work goes to the runtime the scheduler was created in. Outside of any
/// runtime, the shared fallback runtime from [`runtime`] is used.
#[derive(Clone, Debug, Default)]
pub struct TokioScheduler {
    handle: Option<Handle>,
}

impl TokioScheduler {
    /// Create a scheduler bound to the current runtime, if there is one.
    pub fn new() -> Self {
        Self {
            handle: Handle::try_current().ok(),
        }
    }

    /// Create a scheduler bound to a specific runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn handle(&self) -> Handle {
        match &self.handle {
            Some(handle) => handle.clone(),
            None => Handle::try_current().unwrap_or_else(|_| runtime::get().handle().clone()),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn defer(&self, task: Task) {
        self.handle().spawn(async move { task() });
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self.handle().spawn(future);
    }
}

/// A unique identifier for a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

impl JobId {
    /// Get the raw u64 value of this job ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    JobId(NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed))
}

enum Job {
    Task(Task),
    Future(BoxFuture<'static, ()>),
}

/// A scheduler that only runs work when asked to.
///
/// Jobs run in the order they were queued. Jobs queued while draining are
/// picked up by the same drain call.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use horizon_icons_core::{ManualScheduler, Scheduler};
///
/// let scheduler = ManualScheduler::new();
/// let ran = Arc::new(AtomicBool::new(false));
/// let flag = ran.clone();
/// scheduler.defer(Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// assert!(!ran.load(Ordering::SeqCst));
/// scheduler.run_ready();
/// assert!(ran.load(Ordering::SeqCst));
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    jobs: Mutex<VecDeque<(JobId, Job)>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued jobs.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Check if there are no queued jobs.
    pub fn is_idle(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    /// Run queued synchronous tasks until none are left.
    ///
    /// Queued futures are left in place. Returns the number of tasks run.
    pub fn run_ready(&self) -> usize {
        let mut count = 0;
        loop {
            let next = {
                let mut jobs = self.jobs.lock();
                let position = jobs.iter().position(|(_, job)| matches!(job, Job::Task(_)));
                position.and_then(|index| jobs.remove(index))
            };
            match next {
                Some((id, Job::Task(task))) => {
                    Self::run_task(id, task);
                    count += 1;
                }
                _ => return count,
            }
        }
    }

    /// Run every queued job, tasks and futures alike, until the queue is
    /// empty. Futures are awaited one at a time, in queue order.
    ///
    /// Returns the number of jobs run.
    pub async fn run_until_idle(&self) -> usize {
        let mut count = 0;
        loop {
            let next = self.jobs.lock().pop_front();
            match next {
                Some((id, Job::Task(task))) => Self::run_task(id, task),
                Some((id, Job::Future(future))) => {
                    if let Err(payload) = AssertUnwindSafe(future).catch_unwind().await {
                        tracing::error!(
                            target: targets::SCHEDULER,
                            job = id.as_u64(),
                            "scheduled future panicked: {}",
                            panic_message(payload.as_ref())
                        );
                    }
                }
                None => return count,
            }
            count += 1;
        }
    }

    fn run_task(id: JobId, task: Task) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
            tracing::error!(
                target: targets::SCHEDULER,
                job = id.as_u64(),
                "scheduled task panicked: {}",
                panic_message(payload.as_ref())
            );
        }
    }

    fn push(&self, job: Job) -> JobId {
        let id = next_job_id();
        self.jobs.lock().push_back((id, job));
        id
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) {
        self.push(Job::Task(task));
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self.push(Job::Future(future));
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending_jobs", &self.pending_jobs())
            .finish()
    }
}

/// Fallback runtime for work scheduled outside of any tokio runtime.
pub mod runtime {
    use std::sync::OnceLock;
    use tokio::runtime::Runtime;

    static RUNTIME: OnceLock<Runtime> = OnceLock::new();

    /// Get the shared runtime, creating it on first use.
    pub fn get() -> &'static Runtime {
        RUNTIME.get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("horizon-icons")
                .enable_all()
                .build()
                .expect("Failed to create tokio runtime")
        })
    }
}
