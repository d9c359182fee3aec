//! # Basic Example
//!
//! Two components observe a document center:
//! - a status bar that shows the current title
//! - an autosave counter that counts edits
//!
//! The status bar is dropped half-way through; it stops receiving events
//! without ever unsubscribing.
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventcenter=debug cargo run --example basic
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use eventcenter::{event_kind, CallbackPanicked, EventCenter};

event_kind!(
    /// The document title changed.
    TitleChanged => String
);
event_kind!(
    /// The document body changed; payload is the new length.
    Edited => usize
);

struct StatusBar {
    title: Mutex<String>,
}

struct Autosave {
    edits: AtomicU64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let center = EventCenter::new();

    let status = Arc::new(StatusBar {
        title: Mutex::new(String::new()),
    });
    let autosave = Arc::new(Autosave {
        edits: AtomicU64::new(0),
    });

    center.add_observer_with::<TitleChanged, _, _>(&status, |bar, title| {
        println!("[status] title: {title}");
        *bar.title.lock() = title;
    });
    center.add_observer_with::<Edited, _, _>(&autosave, |saver, len| {
        let n = saver.edits.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[autosave] edit #{n}, length {len}");
    });
    center.add_observer::<CallbackPanicked, _, _>(&autosave, |p| {
        println!("[autosave] a handler failed: {}", p.as_message());
    });

    let _ = center.trigger::<TitleChanged>("untitled.txt".to_string());
    let _ = center.trigger::<Edited>(12);
    let _ = center.trigger::<Edited>(40);

    println!("dropping the status bar");
    drop(status);

    let report = center.trigger::<TitleChanged>("notes.txt".to_string());
    println!(
        "title change after drop: delivered={}, skipped_dead={}",
        report.delivered, report.skipped_dead
    );

    center.remove_observer_for_all_events(&autosave);
    let report = center.trigger::<Edited>(41);
    println!("edit after removal: reached={}", report.reached());
}
