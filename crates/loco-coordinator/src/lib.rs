//! `loco-coordinator` — the locomotion coordinator.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`locomotion`] | `Locomotion` — flags, activation, events, stepping            |
//! | `dispatch`     | broadcast in registration order, intent application           |
//! | [`registry`]   | `ProviderRegistry`, `ProviderSlot`, per-group active sets     |
//! | [`cooldown`]   | `Cooldown` — shared teleport cooldown                         |
//! | [`builder`]    | `LocomotionBuilder` — fluent construction                     |
//! | [`listener`]   | `FnListener` — closure adapter for external listeners         |
//! | [`error`]      | `LocomotionError`, `LocomotionResult<T>`                      |
//!
//! # Event flow
//!
//! ```text
//! handle_input ─► active providers ─► Intent::RequestTarget
//!                                          │
//!                  raise_teleport_target_request (cooldown, open_request)
//!                                          │
//!                                   broadcast ─► agents ─► Intent::Answer
//! tick ─► agents recompute answers
//! handle_input (release) ─► Intent::Start ─► broadcast TeleportStarted
//!                                               └─► commit ─► TeleportCompleted
//! ```

pub mod builder;
pub mod cooldown;
mod dispatch;
pub mod error;
pub mod listener;
pub mod locomotion;
pub mod registry;
mod targets;

#[cfg(test)]
mod tests;

pub use builder::LocomotionBuilder;
pub use cooldown::Cooldown;
pub use error::{LocomotionError, LocomotionResult};
pub use listener::FnListener;
pub use locomotion::Locomotion;
pub use registry::{ProviderRegistry, ProviderSlot};
