//! # Serial queue: FIFO execution on a dedicated tokio worker.
//!
//! [`SerialQueue`] is the "deliver on queue Q" context: jobs submitted from any
//! thread run one at a time, in submission order, on a single worker task.
//!
//! ## Architecture
//! ```text
//! submit(job) ──► [unbounded queue] ──► worker task ──► job()
//!                                            └──────► panic → logged, worker continues
//! ```
//!
//! ## Rules
//! - **FIFO**: jobs run in the order `submit` accepted them.
//! - **Non-blocking**: `submit()` returns immediately; no completion signal.
//! - **Isolation**: a panicking job is caught and logged; later jobs still run.
//! - **Close**: after [`close`](SerialQueue::close), `submit` returns
//!   [`ContextError::Closed`]; jobs accepted before closing still run.
//!
//! Jobs run synchronously on a runtime worker thread. Keep them short; a job
//! that blocks stalls the queue and the worker thread under it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventcenter::{ExecutionContext, SerialQueue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let queue = SerialQueue::new("ui");
//!     let hits = Arc::new(AtomicUsize::new(0));
//!     let h = Arc::clone(&hits);
//!     queue.submit(Box::new(move || { h.fetch_add(1, Ordering::SeqCst); })).unwrap();
//!     queue.shutdown().await;
//!     assert_eq!(hits.load(Ordering::SeqCst), 1);
//! }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::error::{panic_message, ContextError};

use super::execution::{ExecutionContext, Job};

struct Shared {
    name: &'static str,
    sender: mpsc::UnboundedSender<Job>,
    closed: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// FIFO execution context backed by one tokio worker task.
///
/// Cheap to clone; clones share the same queue and worker.
#[derive(Clone)]
pub struct SerialQueue {
    shared: Arc<Shared>,
}

impl SerialQueue {
    /// Creates a queue whose worker runs on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime (same as [`tokio::spawn`]).
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self::with_handle(name, &Handle::current())
    }

    /// Creates a queue whose worker runs on the given runtime.
    #[must_use]
    pub fn with_handle(name: &'static str, handle: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let closed = CancellationToken::new();
        let worker = handle.spawn(Self::worker(name, rx, closed.clone()));

        Self {
            shared: Arc::new(Shared {
                name,
                sender: tx,
                closed,
                worker: Mutex::new(Some(worker)),
            }),
        }
    }

    async fn worker(
        name: &'static str,
        mut rx: mpsc::UnboundedReceiver<Job>,
        closed: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                job = rx.recv() => match job {
                    Some(job) => Self::run_job(name, job),
                    None => break,
                },
                _ = closed.cancelled() => {
                    rx.close();
                    while let Some(job) = rx.recv().await {
                        Self::run_job(name, job);
                    }
                    break;
                }
            }
        }
        tracing::debug!(queue = name, "serial queue worker stopped");
    }

    fn run_job(name: &'static str, job: Job) {
        if let Err(panic_err) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
            tracing::warn!(
                queue = name,
                panic = %panic_message(&*panic_err),
                "serial queue job panicked"
            );
        }
    }

    /// Stops accepting jobs. Already accepted jobs still run.
    pub fn close(&self) {
        self.shared.closed.cancel();
    }

    /// True once [`close`](Self::close) or [`shutdown`](Self::shutdown) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.is_cancelled()
    }

    /// Graceful shutdown.
    ///
    /// 1. Closes the queue (new submits fail)
    /// 2. Runs the jobs still queued
    /// 3. Awaits the worker task
    ///
    /// Calling it again, or from another clone, returns once the first caller took the worker.
    pub async fn shutdown(&self) {
        self.close();
        let worker = self.shared.worker.lock().take();
        if let Some(handle) = worker {
            let _ = handle.await;
        }
    }
}

impl ExecutionContext for SerialQueue {
    fn submit(&self, job: Job) -> Result<(), ContextError> {
        if self.is_closed() {
            return Err(ContextError::Closed {
                context: self.shared.name,
            });
        }
        self.shared
            .sender
            .send(job)
            .map_err(|_| ContextError::Closed {
                context: self.shared.name,
            })
    }

    fn name(&self) -> &'static str {
        self.shared.name
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("name", &self.shared.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}
