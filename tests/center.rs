use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use eventcenter::{event_kind, CallbackPanicked, EventCenter, PrunePolicy};

event_kind!(StringEvent => String);
event_kind!(IntEvent => i64);
event_kind!(OtherStringEvent => String);
event_kind!(ClosedEvent => u32);

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
    counter: AtomicI64,
}

fn recorder() -> Arc<Recorder> {
    Arc::new(Recorder::default())
}

#[test]
fn trigger_before_registration_is_not_replayed() {
    let center = EventCenter::new();
    let a = recorder();

    let report = center.trigger::<StringEvent>("Trigger 1".into());
    assert_eq!(report.reached(), 0);

    center.add_observer_with::<StringEvent, _, _>(&a, |a, s| a.log.lock().push(s));
    assert!(a.log.lock().is_empty());

    center.trigger::<StringEvent>("Trigger 2".into());
    assert_eq!(*a.log.lock(), vec!["Trigger 2".to_string()]);
}

#[test]
fn string_and_int_scenario() {
    let center = EventCenter::new();
    let a = recorder();
    let b = recorder();

    center.add_observer_with::<StringEvent, _, _>(&a, |a, s| a.log.lock().push(s));
    center.trigger::<StringEvent>("x".into());
    assert_eq!(*a.log.lock(), vec!["x".to_string()]);

    center.add_observer_with::<IntEvent, _, _>(&b, |b, n| {
        b.counter.fetch_add(n, Ordering::SeqCst);
    });
    center.trigger::<IntEvent>(1);
    assert_eq!(b.counter.load(Ordering::SeqCst), 1);
    assert_eq!(*a.log.lock(), vec!["x".to_string()]);

    center.remove_observer::<StringEvent, _>(&a);
    center.trigger::<StringEvent>("y".into());
    assert_eq!(*a.log.lock(), vec!["x".to_string()]);
}

#[test]
fn delivery_follows_registration_order_with_exact_payload() {
    let center = EventCenter::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    let observers: Vec<_> = (0..5).map(|_| recorder()).collect();

    for (i, obs) in observers.iter().enumerate() {
        let order = Arc::clone(&order);
        center.add_observer::<StringEvent, _, _>(obs, move |s| order.lock().push((i, s)));
    }

    let report = center.trigger::<StringEvent>("payload".into());
    assert_eq!(report.delivered, 5);
    let expected: Vec<_> = (0..5).map(|i| (i, "payload".to_string())).collect();
    assert_eq!(*order.lock(), expected);
}

#[test]
fn remove_observer_keeps_other_kinds() {
    let center = EventCenter::new();
    let a = recorder();
    center.add_observer_with::<StringEvent, _, _>(&a, |a, s| a.log.lock().push(s));
    center.add_observer_with::<IntEvent, _, _>(&a, |a, n| a.counter.store(n, Ordering::SeqCst));

    assert_eq!(center.remove_observer::<StringEvent, _>(&a), 1);
    center.trigger::<StringEvent>("Trigger 2".into());
    center.trigger::<IntEvent>(2);

    assert!(a.log.lock().is_empty());
    assert_eq!(a.counter.load(Ordering::SeqCst), 2);
}

#[test]
fn remove_observer_for_all_events() {
    let center = EventCenter::new();
    let a = recorder();
    let b = recorder();
    center.add_observer_with::<StringEvent, _, _>(&a, |a, s| a.log.lock().push(s));
    center.add_observer_with::<IntEvent, _, _>(&a, |a, n| a.counter.store(n, Ordering::SeqCst));
    center.add_observer_with::<IntEvent, _, _>(&b, |b, n| b.counter.store(n, Ordering::SeqCst));

    assert_eq!(center.remove_observer_for_all_events(&a), 2);
    center.trigger::<StringEvent>("Trigger 2".into());
    center.trigger::<IntEvent>(1);

    assert!(a.log.lock().is_empty());
    assert_eq!(a.counter.load(Ordering::SeqCst), 0);
    assert_eq!(b.counter.load(Ordering::SeqCst), 1);
    assert_eq!(center.remove_observer_for_all_events(&a), 0);
}

#[test]
fn same_payload_type_different_kinds_are_independent() {
    let center = EventCenter::new();
    let a = recorder();
    center.add_observer_with::<StringEvent, _, _>(&a, |a, s| a.log.lock().push(s));

    center.trigger::<OtherStringEvent>("elsewhere".into());
    assert!(a.log.lock().is_empty());
    assert!(!center.has_observers::<OtherStringEvent>());
}

#[test]
fn dropped_observer_is_silently_forgotten() {
    let center = EventCenter::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let a = recorder();
    let h = Arc::clone(&hits);
    center.add_observer::<StringEvent, _, _>(&a, move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(center.observer_count::<StringEvent>(), 1);

    drop(a);
    let report = center.trigger::<StringEvent>("after drop".into());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(report.skipped_dead, 1);
    assert!(report.is_clean());
    assert!(center.is_empty());
}

#[test]
fn registry_does_not_keep_observer_alive() {
    let center = EventCenter::new();
    let a = recorder();
    center.add_observer::<StringEvent, _, _>(&a, |_| {});
    center.add_observer::<IntEvent, _, _>(&a, |_| {});
    assert_eq!(Arc::strong_count(&a), 1);
    assert_eq!(Arc::weak_count(&a), 2);
}

#[test]
fn deferred_prune_waits_for_purge() {
    let center = EventCenter::builder().prune(PrunePolicy::Deferred).build();
    let a = recorder();
    let b = recorder();
    center.add_observer::<StringEvent, _, _>(&a, |_| {});
    center.add_observer::<IntEvent, _, _>(&b, |_| {});
    drop(a);
    drop(b);

    let report = center.trigger::<StringEvent>("x".into());
    assert_eq!(report.skipped_dead, 1);
    assert_eq!(center.len(), 0);
    assert_eq!(center.purge(), 2);
    assert_eq!(center.purge(), 0);
}

#[test]
fn two_observers_are_independent() {
    let center = EventCenter::new();
    let a = recorder();
    let b = recorder();
    center.add_observer_with::<IntEvent, _, _>(&a, |a, n| {
        a.counter.fetch_add(n, Ordering::SeqCst);
    });
    center.add_observer_with::<IntEvent, _, _>(&b, |b, n| {
        b.counter.fetch_add(n, Ordering::SeqCst);
    });

    center.trigger::<IntEvent>(1);
    center.remove_observer::<IntEvent, _>(&a);
    center.trigger::<IntEvent>(10);

    assert_eq!(a.counter.load(Ordering::SeqCst), 1);
    assert_eq!(b.counter.load(Ordering::SeqCst), 11);
}

#[test]
fn panicking_callback_does_not_stop_delivery() {
    let center = EventCenter::new();
    let a = recorder();
    let b = recorder();
    let c = recorder();
    center.add_observer_with::<StringEvent, _, _>(&a, |a, s| a.log.lock().push(s));
    center.add_observer::<StringEvent, _, _>(&b, |_| panic!("observer b failed"));
    center.add_observer_with::<StringEvent, _, _>(&c, |c, s| c.log.lock().push(s));

    let report = center.trigger::<StringEvent>("x".into());

    assert_eq!(report.delivered, 2);
    assert_eq!(report.panics.len(), 1);
    assert_eq!(report.panics[0].event, "StringEvent");
    assert_eq!(report.panics[0].message, "observer b failed");
    assert!(!report.is_clean());
    assert_eq!(*a.log.lock(), vec!["x".to_string()]);
    assert_eq!(*c.log.lock(), vec!["x".to_string()]);
}

#[test]
fn panics_are_republished_unless_disabled() {
    for enabled in [true, false] {
        let center = EventCenter::builder().publish_panics(enabled).build();
        let watcher = recorder();
        let failing = recorder();
        center.add_observer_with::<CallbackPanicked, _, _>(&watcher, |w, p| {
            w.log.lock().push(p.message)
        });
        center.add_observer::<IntEvent, _, _>(&failing, |n| panic!("bad value {n}"));

        let _ = center.trigger::<IntEvent>(7);

        let expected = if enabled {
            vec!["bad value 7".to_string()]
        } else {
            Vec::new()
        };
        assert_eq!(*watcher.log.lock(), expected);
    }
}

#[test]
fn callback_may_reenter_the_center() {
    let center = EventCenter::new();
    let a = recorder();
    let b = recorder();

    let inner = center.clone();
    let late = Arc::clone(&b);
    center.add_observer::<StringEvent, _, _>(&a, move |s| {
        inner.add_observer_with::<StringEvent, _, _>(&late, |b, s| b.log.lock().push(s));
        inner.trigger::<IntEvent>(s.len() as i64);
    });
    center.add_observer_with::<IntEvent, _, _>(&a, |a, n| a.counter.store(n, Ordering::SeqCst));

    center.trigger::<StringEvent>("abc".into());
    assert_eq!(a.counter.load(Ordering::SeqCst), 3);
    assert!(b.log.lock().is_empty());

    center.trigger::<StringEvent>("de".into());
    assert_eq!(*b.log.lock(), vec!["de".to_string()]);
}

#[test]
fn removal_mid_pass_prevents_later_delivery() {
    let center = EventCenter::new();
    let a = recorder();
    let b = recorder();

    let inner = center.clone();
    let victim = Arc::clone(&b);
    center.add_observer::<StringEvent, _, _>(&a, move |_| {
        inner.remove_observer_for_all_events(&victim);
    });
    center.add_observer_with::<StringEvent, _, _>(&b, |b, s| b.log.lock().push(s));

    let report = center.trigger::<StringEvent>("x".into());
    assert_eq!(report.delivered, 1);
    assert!(b.log.lock().is_empty());
}

#[test]
fn clear_drops_everything() {
    let center = EventCenter::new();
    let a = recorder();
    center.add_observer::<StringEvent, _, _>(&a, |_| {});
    center.add_observer::<IntEvent, _, _>(&a, |_| {});
    assert_eq!(center.clear(), 2);
    assert!(center.is_empty());
    assert_eq!(center.trigger::<IntEvent>(1).reached(), 0);
}

/// Triggers `ClosedEvent` on the center when dropped.
struct Reentrant(EventCenter);

impl Drop for Reentrant {
    fn drop(&mut self) {
        self.0.trigger::<ClosedEvent>(0);
    }
}

/// Runs `op` on its own thread and fails instead of hanging if it never returns.
fn within_timeout<T: Send + 'static>(op: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(op());
    });
    rx.recv_timeout(Duration::from_secs(3))
        .expect("operation deadlocked on the registry lock")
}

#[test]
fn reaped_callback_may_reenter_the_center_when_dropped() {
    let center = EventCenter::new();
    let a = recorder();
    let closed = recorder();
    center.add_observer_with::<ClosedEvent, _, _>(&closed, |c, _| {
        c.counter.fetch_add(1, Ordering::SeqCst);
    });

    let guard = Reentrant(center.clone());
    center.add_observer::<IntEvent, _, _>(&a, move |_| {
        let _keep = &guard;
    });
    drop(a);

    let inner = center.clone();
    let report = within_timeout(move || inner.trigger::<IntEvent>(1));
    assert_eq!(report.skipped_dead, 1);
    assert_eq!(closed.counter.load(Ordering::SeqCst), 1);
}

#[test]
fn removed_callback_may_reenter_the_center_when_dropped() {
    let center = EventCenter::new();
    let a = recorder();
    let closed = recorder();
    center.add_observer_with::<ClosedEvent, _, _>(&closed, |c, _| {
        c.counter.fetch_add(1, Ordering::SeqCst);
    });

    let guard = Reentrant(center.clone());
    center.add_observer::<IntEvent, _, _>(&a, move |_| {
        let _keep = &guard;
    });
    let guard = Reentrant(center.clone());
    center.add_observer::<StringEvent, _, _>(&a, move |_| {
        let _keep = &guard;
    });

    let inner = center.clone();
    let target = Arc::clone(&a);
    let removed = within_timeout(move || inner.remove_observer::<IntEvent, _>(&target));
    assert_eq!(removed, 1);

    let inner = center.clone();
    let target = Arc::clone(&a);
    let removed = within_timeout(move || inner.remove_observer_for_all_events(&target));
    assert_eq!(removed, 1);
    assert_eq!(closed.counter.load(Ordering::SeqCst), 2);
}
