//! # Event center configuration.
//!
//! Provides [`Config`], the settings an [`EventCenter`](crate::EventCenter) is built with.
//!
//! Config is used in two ways:
//! 1. **Direct**: `EventCenter::with_config(config)`
//! 2. **Builder**: `EventCenter::builder().prune(PrunePolicy::Deferred).build()`

/// When subscriptions of destroyed observers are removed from the registry.
///
/// Dead subscriptions never receive events under either policy; the policy only
/// decides when their records are reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrunePolicy {
    /// Reap dead records of a kind while `trigger` looks that kind up.
    #[default]
    OnTrigger,
    /// Skip dead records on trigger; reap them in [`purge`](crate::EventCenter::purge),
    /// in `remove_*`, or when a new observer is added to the same kind.
    Deferred,
}

/// Settings for one event center.
///
/// ## Field semantics
/// - `prune`: when dead subscriptions are reaped (see [`PrunePolicy`])
/// - `publish_panics`: whether caught callback panics are re-published as
///   [`CallbackPanicked`](crate::CallbackPanicked)
#[derive(Clone, Debug)]
pub struct Config {
    /// Reaping policy for subscriptions whose observer was dropped.
    pub prune: PrunePolicy,

    /// Re-publish caught callback panics as a `CallbackPanicked` event.
    ///
    /// Panics raised by `CallbackPanicked` handlers themselves are never re-published.
    pub publish_panics: bool,
}

impl Config {
    /// True when `trigger` should reap dead records of the kind it looks up.
    #[inline]
    pub fn prunes_on_trigger(&self) -> bool {
        self.prune == PrunePolicy::OnTrigger
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `prune = PrunePolicy::OnTrigger` (eager, opportunistic reaping)
    /// - `publish_panics = true`
    fn default() -> Self {
        Self {
            prune: PrunePolicy::default(),
            publish_panics: true,
        }
    }
}
