//! Event kinds: the type-level keys of the registry.
//!
//! ## Contents
//! - [`EventKind`] marker trait binding a kind to its payload type
//! - [`event_kind!`](crate::event_kind) one-line declaration macro
//! - [`CallbackPanicked`] built-in kind published when a callback panics

mod kind;

pub use kind::{CallbackPanicked, EventKind};
