use super::{center::EventCenter, config::Config, config::PrunePolicy};

/// Builder for constructing an [`EventCenter`] with non-default settings.
///
/// ```rust
/// use eventcenter::{EventCenter, PrunePolicy};
///
/// let center = EventCenter::builder()
///     .prune(PrunePolicy::Deferred)
///     .publish_panics(false)
///     .build();
/// assert_eq!(center.config().prune, PrunePolicy::Deferred);
/// ```
#[derive(Debug, Clone)]
pub struct EventCenterBuilder {
    cfg: Config,
}

impl EventCenterBuilder {
    /// Creates a new builder starting from the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Sets when subscriptions of dropped observers are reaped.
    pub fn prune(mut self, policy: PrunePolicy) -> Self {
        self.cfg.prune = policy;
        self
    }

    /// Enables or disables re-publishing caught panics as `CallbackPanicked`.
    pub fn publish_panics(mut self, enabled: bool) -> Self {
        self.cfg.publish_panics = enabled;
        self
    }

    /// Builds the center. The registry starts empty.
    pub fn build(self) -> EventCenter {
        EventCenter::with_config(self.cfg)
    }
}
