//! Error types produced while delivering events.
//!
//! This module defines two error types:
//!
//! - [`CallbackPanic`]: one observer callback panicked during delivery.
//! - [`ContextError`]: an execution context refused a unit of work.
//!
//! Neither is ever returned from [`EventCenter::trigger`](crate::EventCenter::trigger)
//! as an `Err`: a trigger always completes its delivery loop and reports failures
//! as data in [`TriggerReport`](crate::TriggerReport).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

/// # A callback panicked while handling an event.
///
/// The panic was caught; delivery to the remaining observers continued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("callback for '{event}' (subscription #{subscription}) panicked: {message}")]
pub struct CallbackPanic {
    /// Name of the event kind being delivered.
    pub event: &'static str,
    /// Sequence number of the subscription whose callback panicked.
    pub subscription: u64,
    /// Panic payload rendered as text.
    pub message: String,
}

impl CallbackPanic {
    pub(crate) fn from_payload(
        event: &'static str,
        subscription: u64,
        payload: &(dyn std::any::Any + Send),
    ) -> Self {
        Self {
            event,
            subscription,
            message: panic_message(payload),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventcenter::CallbackPanic;
    ///
    /// let err = CallbackPanic { event: "demo", subscription: 1, message: "boom".into() };
    /// assert_eq!(err.as_label(), "callback_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        "callback_panicked"
    }

    /// Returns a human-readable message with details about the panic.
    pub fn as_message(&self) -> String {
        format!("event={} subscription={}: {}", self.event, self.subscription, self.message)
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// # Errors produced by execution contexts.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The context no longer accepts work (queue closed or runtime gone).
    #[error("execution context '{context}' is closed")]
    Closed {
        /// Name of the context that refused the job.
        context: &'static str,
    },
}

impl ContextError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventcenter::ContextError;
    ///
    /// let err = ContextError::Closed { context: "serial" };
    /// assert_eq!(err.as_label(), "context_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContextError::Closed { .. } => "context_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ContextError::Closed { context } => format!("closed: {context}"),
        }
    }
}
