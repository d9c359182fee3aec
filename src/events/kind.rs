//! # Type-level event kinds.
//!
//! An [`EventKind`] is a marker type: it identifies a class of event and fixes the
//! payload type delivered with it. Two kinds are different events even when they
//! share a payload type.
//!
//! ## Example
//! ```rust
//! use eventcenter::{event_kind, EventKind};
//!
//! event_kind!(
//!     /// A user renamed a document.
//!     pub Renamed => String
//! );
//!
//! struct Saved;
//! impl EventKind for Saved {
//!     type Payload = String;
//! }
//!
//! assert_eq!(Renamed::name(), "Renamed");
//! assert!(Saved::name().ends_with("Saved"));
//! ```

use crate::error::CallbackPanic;

/// Marker trait for a class of events carrying a [`Payload`](EventKind::Payload).
///
/// The implementing type is never instantiated by the center; only its
/// [`TypeId`](std::any::TypeId) is used as the registry key.
pub trait EventKind: 'static {
    /// Value handed to every callback; each subscriber receives its own clone.
    type Payload: Clone + Send + 'static;

    /// Name used in logs and in [`CallbackPanic::event`].
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Declares a unit struct implementing [`EventKind`].
///
/// ```rust
/// eventcenter::event_kind!(pub Tick => u64);
/// ```
#[macro_export]
macro_rules! event_kind {
    ($(#[$meta:meta])* $vis:vis $name:ident => $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::EventKind for $name {
            type Payload = $payload;

            fn name() -> &'static str {
                stringify!($name)
            }
        }
    };
}

/// Published by a center when one of its callbacks panics.
///
/// Panics raised while handling this kind are logged but never republished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CallbackPanicked;

impl EventKind for CallbackPanicked {
    type Payload = CallbackPanic;

    fn name() -> &'static str {
        "CallbackPanicked"
    }
}
