//! # EventCenter: typed observer registry and dispatcher.
//!
//! ## Architecture
//! ```text
//! add_observer::<K>(&obs, cb) ──► lock ──► Registry[TypeId(K)].push(Subscription)
//!
//! trigger::<K>(payload)
//!     │
//!     ├─► lock ──► snapshot Registry[TypeId(K)] (reap dead if PrunePolicy::OnTrigger) ──► unlock
//!     │
//!     └─► for sub in snapshot (registration order):
//!           ├─ removed meanwhile   → skip
//!           ├─ observer dead       → skip (skipped_dead)
//!           ├─ no context          → catch_unwind(cb(&obs, payload.clone()))  (delivered | panics)
//!           └─ context             → context.submit(job)                      (scheduled | rejected | panics)
//!                                       job: re-check observer ─► catch_unwind(cb(&obs, payload))
//! ```
//!
//! ## Rules
//! - The registry lock is never held while a callback runs or a job is submitted, so
//!   callbacks may add, remove, and trigger on the same center.
//! - Observers are held weakly; during a synchronous callback the center holds a
//!   strong reference so the observer outlives the call.
//! - Records leaving the registry are dropped only after the lock is released.
//! - A panicking callback never stops the loop. Panics are logged, returned in the
//!   [`TriggerReport`], and re-published as [`CallbackPanicked`] after the loop.
//!   This includes jobs that a context ran before `submit` returned (e.g. [`Inline`](crate::Inline)).
//!   A job that panics after `submit` returned re-publishes on its own.
//! - A job handed to a context cannot be retracted; it still skips a dead observer.

use std::any::{Any, TypeId};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::context::{ExecutionContext, Job};
use crate::error::CallbackPanic;
use crate::events::{CallbackPanicked, EventKind};
use crate::observers::{AnyObserver, Callback, ObserverRef, Subscription};

use super::builder::EventCenterBuilder;
use super::config::Config;
use super::registry::Registry;
use super::report::TriggerReport;

struct Inner {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
    cfg: Config,
}

/// Where a deferred job leaves its panic.
///
/// While the trigger is still inside `submit`, the panic is handed back to it;
/// once `submit` has returned, the job re-publishes by itself.
enum PanicSlot {
    Submitting,
    Caught(CallbackPanic),
    Detached,
}

/// In-process, typed event bus with weakly-held observers.
///
/// Cheap to clone: clones share one registry. There is no global instance; construct
/// one and hand it to whoever publishes or subscribes.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use eventcenter::{event_kind, EventCenter};
///
/// event_kind!(Renamed => String);
///
/// struct Title(Mutex<String>);
///
/// let center = EventCenter::new();
/// let title = Arc::new(Title(Mutex::new(String::new())));
///
/// center.add_observer_with::<Renamed, _, _>(&title, |t, name| *t.0.lock() = name);
/// center.trigger::<Renamed>("draft.md".to_string());
/// assert_eq!(*title.0.lock(), "draft.md");
///
/// drop(title);
/// let report = center.trigger::<Renamed>("final.md".to_string());
/// assert_eq!(report.delivered, 0);
/// ```
#[derive(Clone)]
pub struct EventCenter {
    inner: Arc<Inner>,
}

impl EventCenter {
    /// Creates a center with [`Config::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a center with the given configuration.
    #[must_use]
    pub fn with_config(cfg: Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry::default()),
                next_id: AtomicU64::new(0),
                cfg,
            }),
        }
    }

    /// Starts a builder with the default configuration.
    pub fn builder() -> EventCenterBuilder {
        EventCenterBuilder::new(Config::default())
    }

    /// Configuration this center was built with.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Subscribes `observer` to `K`; `callback` runs on the triggering thread.
    ///
    /// Each call adds an independent subscription, even for the same `(observer, K)` pair.
    /// The center keeps only a weak reference to `observer`.
    pub fn add_observer<K, O, F>(&self, observer: &Arc<O>, callback: F)
    where
        K: EventKind,
        O: Any + Send + Sync,
        F: Fn(K::Payload) + Send + Sync + 'static,
    {
        let cb: Callback<K::Payload> =
            Arc::new(move |_obs: &AnyObserver, payload: K::Payload| callback(payload));
        self.subscribe::<K, O>(observer, None, cb);
    }

    /// Subscribes `observer` to `K`; `callback` runs as a job on `context`.
    ///
    /// Delivery may complete after `trigger` returns. The job checks that the
    /// observer is still alive before calling back.
    pub fn add_observer_on<K, O, C, F>(&self, observer: &Arc<O>, context: C, callback: F)
    where
        K: EventKind,
        O: Any + Send + Sync,
        C: ExecutionContext + 'static,
        F: Fn(K::Payload) + Send + Sync + 'static,
    {
        let cb: Callback<K::Payload> =
            Arc::new(move |_obs: &AnyObserver, payload: K::Payload| callback(payload));
        self.subscribe::<K, O>(observer, Some(Arc::new(context)), cb);
    }

    /// Subscribes `observer` to `K`; `callback` receives the observer itself.
    ///
    /// The observer reference is valid for the whole call, so handlers can use
    /// observer state without capturing a strong reference to it.
    pub fn add_observer_with<K, O, F>(&self, observer: &Arc<O>, callback: F)
    where
        K: EventKind,
        O: Any + Send + Sync,
        F: Fn(&O, K::Payload) + Send + Sync + 'static,
    {
        let cb: Callback<K::Payload> = Arc::new(move |obs: &AnyObserver, payload: K::Payload| {
            if let Some(obs) = obs.downcast_ref::<O>() {
                callback(obs, payload);
            }
        });
        self.subscribe::<K, O>(observer, None, cb);
    }

    fn subscribe<K, O>(
        &self,
        observer: &Arc<O>,
        context: Option<Arc<dyn ExecutionContext>>,
        callback: Callback<K::Payload>,
    ) where
        K: EventKind,
        O: Any + Send + Sync,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let context_name = context.as_ref().map_or("caller", |c| c.name());
        let sub = Subscription::new(id, K::name(), ObserverRef::new(observer), context, callback);

        let mut garbage = Vec::new();
        self.inner
            .registry
            .lock()
            .insert(TypeId::of::<K>(), Arc::new(sub), &mut garbage);
        drop(garbage);

        tracing::debug!(
            event = K::name(),
            subscription = id,
            context = context_name,
            "observer added"
        );
    }

    /// Removes every subscription of `observer` to `K`. Returns how many were removed.
    ///
    /// Subscriptions of `observer` to other kinds are untouched. Identity is the
    /// allocation behind the `Arc`, not value equality.
    pub fn remove_observer<K, O>(&self, observer: &Arc<O>) -> usize
    where
        K: EventKind,
        O: ?Sized,
    {
        let mut garbage = Vec::new();
        let removed = self.inner.registry.lock().remove(
            TypeId::of::<K>(),
            ObserverRef::addr_of(observer),
            &mut garbage,
        );
        drop(garbage);

        tracing::debug!(event = K::name(), removed, "observer removed");
        removed
    }

    /// Removes every subscription of `observer`, across all kinds. Returns how many were removed.
    pub fn remove_observer_for_all_events<O: ?Sized>(&self, observer: &Arc<O>) -> usize {
        let mut garbage = Vec::new();
        let removed = self
            .inner
            .registry
            .lock()
            .remove_all(ObserverRef::addr_of(observer), &mut garbage);
        drop(garbage);

        tracing::debug!(removed, "observer removed from all events");
        removed
    }

    /// Delivers `payload` to every live subscriber of `K`, in registration order.
    ///
    /// Synchronous subscribers have run when this returns; context subscribers have
    /// only been scheduled. Triggering a kind nobody observes is a no-op.
    ///
    /// Never panics because of a callback: failures are listed in the returned report.
    /// A panicking `Clone` of the payload is not a callback failure and unwinds out of `trigger`.
    pub fn trigger<K: EventKind>(&self, payload: K::Payload) -> TriggerReport {
        let mut garbage = Vec::new();
        let subs = self.inner.registry.lock().snapshot(
            TypeId::of::<K>(),
            self.inner.cfg.prunes_on_trigger(),
            &mut garbage,
        );

        let mut report = TriggerReport {
            skipped_dead: garbage.len(),
            ..TriggerReport::default()
        };
        drop(garbage);

        for sub in subs {
            if sub.is_removed() {
                continue;
            }
            let Some(callback) = sub.callback::<K::Payload>() else {
                tracing::error!(
                    event = K::name(),
                    subscription = sub.id(),
                    "subscription payload type mismatch"
                );
                continue;
            };

            match sub.context() {
                None => {
                    let Some(observer) = sub.observer().upgrade() else {
                        report.skipped_dead += 1;
                        continue;
                    };
                    let payload = payload.clone();
                    let outcome = catch_unwind(AssertUnwindSafe(|| callback(&*observer, payload)));
                    drop(observer);

                    match outcome {
                        Ok(()) => report.delivered += 1,
                        Err(panic_err) => {
                            let panic = CallbackPanic::from_payload(K::name(), sub.id(), &*panic_err);
                            tracing::warn!(
                                event = K::name(),
                                subscription = sub.id(),
                                panic = %panic.message,
                                "callback panicked; continuing delivery"
                            );
                            report.panics.push(panic);
                        }
                    }
                }
                Some(context) => {
                    if !sub.observer().is_alive() {
                        report.skipped_dead += 1;
                        continue;
                    }
                    let slot = Arc::new(Mutex::new(PanicSlot::Submitting));
                    let job = Self::deferred::<K>(
                        Arc::downgrade(&self.inner),
                        Arc::clone(&sub),
                        payload.clone(),
                        Arc::clone(&slot),
                    );
                    let submitted = context.submit(job);
                    let caught = match std::mem::replace(&mut *slot.lock(), PanicSlot::Detached) {
                        PanicSlot::Caught(panic) => Some(panic),
                        PanicSlot::Submitting | PanicSlot::Detached => None,
                    };

                    match (submitted, caught) {
                        (_, Some(panic)) => report.panics.push(panic),
                        (Ok(()), None) => report.scheduled += 1,
                        (Err(err), None) => {
                            tracing::warn!(
                                event = K::name(),
                                subscription = sub.id(),
                                context = context.name(),
                                error = %err,
                                "delivery job rejected"
                            );
                            report.rejected += 1;
                        }
                    }
                }
            }
        }

        tracing::trace!(
            event = K::name(),
            delivered = report.delivered,
            scheduled = report.scheduled,
            skipped_dead = report.skipped_dead,
            "event triggered"
        );

        for panic in &report.panics {
            self.publish_panic::<K>(panic.clone());
        }
        report
    }

    /// Builds the job that delivers `payload` to `sub` on its context.
    fn deferred<K: EventKind>(
        center: Weak<Inner>,
        sub: Arc<Subscription>,
        payload: K::Payload,
        slot: Arc<Mutex<PanicSlot>>,
    ) -> Job {
        Box::new(move || {
            let Some(observer) = sub.observer().upgrade() else {
                tracing::trace!(
                    event = sub.event(),
                    subscription = sub.id(),
                    "observer gone before deferred delivery"
                );
                return;
            };
            let Some(callback) = sub.callback::<K::Payload>() else {
                return;
            };
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(&*observer, payload)));
            drop(observer);

            if let Err(panic_err) = outcome {
                let panic = CallbackPanic::from_payload(sub.event(), sub.id(), &*panic_err);
                tracing::warn!(
                    event = sub.event(),
                    subscription = sub.id(),
                    panic = %panic.message,
                    "deferred callback panicked"
                );
                {
                    let mut slot = slot.lock();
                    if matches!(*slot, PanicSlot::Submitting) {
                        *slot = PanicSlot::Caught(panic);
                        return;
                    }
                }
                if let Some(inner) = center.upgrade() {
                    EventCenter { inner }.publish_panic::<K>(panic);
                }
            }
        })
    }

    /// Re-publishes a caught panic, unless disabled or it came from a `CallbackPanicked` handler.
    fn publish_panic<K: EventKind>(&self, panic: CallbackPanic) {
        if !self.inner.cfg.publish_panics || TypeId::of::<K>() == TypeId::of::<CallbackPanicked>() {
            return;
        }
        let _ = self.trigger::<CallbackPanicked>(panic);
    }

    /// Number of live subscriptions to `K`.
    pub fn observer_count<K: EventKind>(&self) -> usize {
        self.inner.registry.lock().count(TypeId::of::<K>())
    }

    /// True if at least one live subscription to `K` exists.
    pub fn has_observers<K: EventKind>(&self) -> bool {
        self.observer_count::<K>() > 0
    }

    /// Number of live subscriptions across all kinds.
    pub fn len(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// True if there are no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reaps subscriptions of dropped observers from every kind. Returns how many.
    ///
    /// The sweep for [`PrunePolicy::Deferred`](crate::PrunePolicy::Deferred); harmless under any policy.
    pub fn purge(&self) -> usize {
        let mut garbage = Vec::new();
        let reaped = self.inner.registry.lock().purge(&mut garbage);
        drop(garbage);
        if reaped > 0 {
            tracing::debug!(reaped, "dead subscriptions purged");
        }
        reaped
    }

    /// Drops every subscription. Returns how many were live.
    pub fn clear(&self) -> usize {
        let mut garbage = Vec::new();
        let cleared = self.inner.registry.lock().clear(&mut garbage);
        drop(garbage);
        tracing::debug!(cleared, "event center cleared");
        cleared
    }
}

impl Default for EventCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCenter")
            .field("subscriptions", &self.len())
            .field("config", &self.inner.cfg)
            .finish()
    }
}
