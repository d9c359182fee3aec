//! # Outcome of one trigger pass.

use crate::error::CallbackPanic;

/// What happened to each subscription visited by one [`trigger`](crate::EventCenter::trigger).
///
/// Subscriptions removed while the pass was running are not counted anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerReport {
    /// Synchronous callbacks that returned normally.
    pub delivered: usize,
    /// Jobs accepted by an execution context (they may not have run yet).
    pub scheduled: usize,
    /// Subscriptions skipped because their observer was gone.
    pub skipped_dead: usize,
    /// Jobs refused by a closed execution context.
    pub rejected: usize,
    /// Callbacks that panicked before `trigger` returned, in delivery order.
    ///
    /// Covers synchronous callbacks and jobs a context ran inside `submit`
    /// (such as [`Inline`](crate::Inline)); those jobs are not counted as `scheduled`.
    pub panics: Vec<CallbackPanic>,
}

impl TriggerReport {
    /// True when no callback panicked and no context refused a job.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.panics.is_empty() && self.rejected == 0
    }

    /// Callbacks reached, synchronously or not (panicked ones included).
    #[inline]
    pub fn reached(&self) -> usize {
        self.delivered + self.scheduled + self.panics.len()
    }
}
