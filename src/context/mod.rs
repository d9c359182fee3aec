//! Execution contexts: where deferred callbacks run.
//!
//! ## Contents
//! - [`ExecutionContext`] the `submit(job)` abstraction the center delivers through
//! - [`Inline`] runs jobs on the submitting thread
//! - [`SerialQueue`] FIFO queue drained by one tokio worker
//!
//! `tokio::runtime::Handle` also implements [`ExecutionContext`].

mod execution;
mod serial;

pub use execution::{ExecutionContext, Inline, Job};
pub use serial::SerialQueue;
