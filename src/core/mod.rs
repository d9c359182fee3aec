//! Event center core: registry, dispatch, configuration.
//!
//! The public API from this module is [`EventCenter`] plus its configuration
//! and report types.
//!
//! Internal modules:
//! - [`center`]: registration, removal, and the trigger loop;
//! - [`registry`]: the `TypeId → subscriptions` table guarded by the center's lock;
//! - [`builder`]: fluent construction;
//! - [`config`]: prune policy and panic re-publishing;
//! - [`report`]: per-trigger delivery outcome.

mod builder;
mod center;
mod config;
mod registry;
mod report;

pub use builder::EventCenterBuilder;
pub use center::EventCenter;
pub use config::{Config, PrunePolicy};
pub use report::TriggerReport;
