//! # Execution contexts for deferred delivery.
//!
//! An [`ExecutionContext`] accepts a unit of work ([`Job`]) and runs it now or later,
//! possibly on another thread. The center only ever calls [`submit`](ExecutionContext::submit);
//! it never inspects how the context schedules work.
//!
//! ## Provided contexts
//! | Context                       | Ordering            | Thread                  |
//! |-------------------------------|---------------------|-------------------------|
//! | [`Inline`]                    | submission order    | submitting thread       |
//! | [`tokio::runtime::Handle`]    | none                | runtime worker threads  |
//! | [`SerialQueue`](super::SerialQueue) | FIFO          | one tokio worker task   |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventcenter::{ExecutionContext, Inline};
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let h = Arc::clone(&hits);
//! Inline.submit(Box::new(move || { h.fetch_add(1, Ordering::SeqCst); })).unwrap();
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;

use crate::error::ContextError;

/// Zero-argument unit of work handed to a context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Anything that can run a [`Job`] at some point.
///
/// ### Implementation requirements
/// - `submit` must not block waiting for the job to finish.
/// - Return [`ContextError::Closed`] instead of silently dropping a job you will never run.
pub trait ExecutionContext: Send + Sync {
    /// Accepts `job` for execution.
    fn submit(&self, job: Job) -> Result<(), ContextError>;

    /// Returns the context name used in logs and errors.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Runs every job immediately on the submitting thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl ExecutionContext for Inline {
    fn submit(&self, job: Job) -> Result<(), ContextError> {
        job();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

/// Spawns each job as its own task on the runtime; jobs may run concurrently and in any order.
///
/// Tokio gives no way to tell, at spawn time, that the runtime has shut down: a job
/// submitted to a dead runtime is dropped without running, yet `submit` still
/// returns `Ok` and the trigger counts it as scheduled. Use a [`SerialQueue`](super::SerialQueue)
/// when refused work must surface as [`ContextError::Closed`].
impl ExecutionContext for tokio::runtime::Handle {
    fn submit(&self, job: Job) -> Result<(), ContextError> {
        self.spawn(async move { job() });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tokio"
    }
}

impl<C: ExecutionContext + ?Sized> ExecutionContext for Arc<C> {
    fn submit(&self, job: Job) -> Result<(), ContextError> {
        (**self).submit(job)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
