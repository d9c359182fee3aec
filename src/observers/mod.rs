//! Observer bookkeeping: who subscribed, to what, and how to deliver.
//!
//! Internal modules:
//! - [`handle`]: weak, identity-comparable observer references;
//! - [`subscription`]: immutable subscription records with a removal tombstone.

mod handle;
mod subscription;

pub(crate) use handle::{AnyObserver, ObserverRef};
pub(crate) use subscription::{Callback, Subscription};
