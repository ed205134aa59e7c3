//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Registries hand out dense ids in
//! registration order, so `id.index()` is a direct `Vec` index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
///
/// `INVALID` doubles as "no source" on events and inputs: the coordinator
/// rejects an input or request whose source fails `is_valid()` before any
/// handler runs, and agents receive `ProviderId::INVALID` as their context
/// provider since they act for no provider in particular.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `false` for the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identity of an input source (a hand, a controller, a gaze ray…).
    ///
    /// Teleport requests and target answers are keyed by this id.
    pub struct SourceId(u32);
}

typed_id! {
    /// Index of a locomotion provider in the coordinator's registry.
    pub struct ProviderId(u32);
}

typed_id! {
    /// Index of a target-supplying agent in the coordinator's registry.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a teleport anchor in an `AnchorSet`.
    pub struct AnchorId(u32);
}

typed_id! {
    /// Opaque scene entity reported by spatial queries as the hit object.
    pub struct EntityId(u32);
}

typed_id! {
    /// Index of an external listener in the coordinator's registry.
    pub struct ListenerId(u32);
}

typed_id! {
    /// A logical input action (e.g. "teleport", "move", "run").
    ///
    /// The input layer maps physical buttons and axes onto these ids; the
    /// engine only compares them for equality.
    pub struct InputAction(u32);
}
