//! # Subscription records.
//!
//! A [`Subscription`] is created by one `add_observer*` call and never edited
//! afterwards. Removal sets a tombstone flag and drops the record from the
//! registry; a trigger pass that already snapshotted it sees the flag and skips it.
//!
//! The callback is stored type-erased. The generic registration API is the only
//! place records are built, so a record under kind `K` always holds a
//! [`Callback<K::Payload>`](Callback).

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::context::ExecutionContext;

use super::handle::{AnyObserver, ObserverRef};

/// Callback signature shared by all registration flavors: receives the live observer and the payload.
pub(crate) type CallbackFn<P> = dyn Fn(&AnyObserver, P) + Send + Sync;

/// Shared, typed callback.
pub(crate) type Callback<P> = Arc<CallbackFn<P>>;

pub(crate) struct Subscription {
    id: u64,
    event: &'static str,
    observer: ObserverRef,
    context: Option<Arc<dyn ExecutionContext>>,
    callback: Box<dyn Any + Send + Sync>,
    removed: AtomicBool,
}

impl Subscription {
    pub(crate) fn new<P: Send + 'static>(
        id: u64,
        event: &'static str,
        observer: ObserverRef,
        context: Option<Arc<dyn ExecutionContext>>,
        callback: Callback<P>,
    ) -> Self {
        Self {
            id,
            event,
            observer,
            context,
            callback: Box::new(callback),
            removed: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn event(&self) -> &'static str {
        self.event
    }

    #[inline]
    pub(crate) fn observer(&self) -> &ObserverRef {
        &self.observer
    }

    #[inline]
    pub(crate) fn context(&self) -> Option<&Arc<dyn ExecutionContext>> {
        self.context.as_ref()
    }

    /// Typed view of the callback; `None` only if `P` is not the registered payload type.
    pub(crate) fn callback<P: Send + 'static>(&self) -> Option<&CallbackFn<P>> {
        self.callback
            .downcast_ref::<Callback<P>>()
            .map(|cb| &**cb)
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.store(true, Ordering::Release);
    }

    #[inline]
    pub(crate) fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    /// Not removed and observer still alive.
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        !self.is_removed() && self.observer.is_alive()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("event", &self.event)
            .field("observer", &self.observer)
            .field("context", &self.context.as_ref().map(|c| c.name()))
            .field("removed", &self.is_removed())
            .finish()
    }
}
