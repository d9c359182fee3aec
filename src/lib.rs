//! # eventcenter
//!
//! **eventcenter** is a typed, in-process event-notification bus.
//!
//! Components subscribe to strongly-typed event kinds, get called back when an
//! event of that kind is triggered, and are forgotten automatically when they are
//! dropped. Neither the center nor the publisher tracks observer lifetimes.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//!   │  Observer A  │  │  Observer B  │  │  Observer C  │      (Arc<T>, owned elsewhere)
//!   └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!          │ add_observer::<K>(&arc, cb)       │
//!          ▼                 ▼                 ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  EventCenter                                                 │
//! │  - Mutex<Registry>: TypeId(K) → [Subscription, ...]          │
//! │  - Subscription: Weak<observer> + callback + Option<context> │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             │ trigger::<K>(payload)
//!                 ┌───────────┴──────────────┐
//!                 ▼                          ▼
//!         no context: cb(payload)     context.submit(job)
//!         (calling thread, in order)  (Inline / tokio Handle / SerialQueue)
//! ```
//!
//! ### Subscription lifecycle
//! ```text
//! add_observer ──► registered ──► live ──► removed   (remove_observer / remove_observer_for_all_events)
//!                                  │
//!                                  └─► dead (observer dropped) ──► reaped on next touch
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Event kinds**   | Type-level tags binding an event to its payload type.         | [`EventKind`], [`event_kind!`]             |
//! | **Dispatch**      | Register, remove, and trigger; weakly-held observers.         | [`EventCenter`], [`TriggerReport`]         |
//! | **Contexts**      | Deferred delivery on a queue or runtime.                      | [`ExecutionContext`], [`SerialQueue`]      |
//! | **Errors**        | Isolated callback panics and refused jobs.                    | [`CallbackPanic`], [`ContextError`]        |
//! | **Configuration** | Dead-subscription reaping and panic re-publishing.            | [`Config`], [`PrunePolicy`]                |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use eventcenter::{event_kind, EventCenter};
//!
//! event_kind!(StringEvent => String);
//! event_kind!(IntEvent => i64);
//!
//! struct Log(Mutex<Vec<String>>);
//!
//! let center = EventCenter::new();
//! let log = Arc::new(Log(Mutex::new(Vec::new())));
//!
//! center.add_observer_with::<StringEvent, _, _>(&log, |log, s| log.0.lock().push(s));
//! center.trigger::<StringEvent>("x".to_string());
//! center.trigger::<IntEvent>(1);
//!
//! center.remove_observer::<StringEvent, _>(&log);
//! center.trigger::<StringEvent>("y".to_string());
//!
//! assert_eq!(*log.0.lock(), vec!["x".to_string()]);
//! ```
mod context;
mod core;
mod error;
mod events;
mod observers;

// ---- Public re-exports ----

pub use crate::context::{ExecutionContext, Inline, Job, SerialQueue};
pub use crate::core::{Config, EventCenter, EventCenterBuilder, PrunePolicy, TriggerReport};
pub use crate::error::{CallbackPanic, ContextError};
pub use crate::events::{CallbackPanicked, EventKind};
