//! # Weak observer identity.
//!
//! [`ObserverRef`] remembers *who* subscribed without keeping them alive.
//!
//! ## Rules
//! - Holds a [`Weak`], never an [`Arc`]: registering never extends the observer's lifetime.
//! - Identity is the address of the observer's allocation. The address cannot be
//!   reused while any `Weak` to it exists, so a dead observer never aliases a new one.
//! - Liveness checks are O(1) (`strong_count`).

use std::any::Any;
use std::sync::{Arc, Weak};

/// Type-erased observer as seen by callbacks.
pub(crate) type AnyObserver = dyn Any + Send + Sync;

/// Non-owning reference to a subscribed entity.
#[derive(Clone)]
pub(crate) struct ObserverRef {
    addr: usize,
    weak: Weak<AnyObserver>,
}

impl ObserverRef {
    pub(crate) fn new<O: Any + Send + Sync>(observer: &Arc<O>) -> Self {
        let weak: Weak<O> = Arc::downgrade(observer);
        Self {
            addr: Self::addr_of(observer),
            weak,
        }
    }

    /// Identity key for `observer`, comparable with [`ObserverRef::is`].
    #[inline]
    pub(crate) fn addr_of<O: ?Sized>(observer: &Arc<O>) -> usize {
        Arc::as_ptr(observer) as *const () as usize
    }

    #[inline]
    pub(crate) fn is(&self, addr: usize) -> bool {
        self.addr == addr
    }

    #[inline]
    pub(crate) fn is_alive(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// Strong reference for the duration of one delivery, or `None` if the observer is gone.
    #[inline]
    pub(crate) fn upgrade(&self) -> Option<Arc<AnyObserver>> {
        self.weak.upgrade()
    }
}

impl std::fmt::Debug for ObserverRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRef")
            .field("addr", &format_args!("{:#x}", self.addr))
            .field("alive", &self.is_alive())
            .finish()
    }
}
