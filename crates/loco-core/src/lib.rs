//! `loco-core` — foundational types for the locomotion engine.
//!
//! This crate is a dependency of every other `loco-*` crate.  It has no
//! `loco-*` dependencies.
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `SourceId`, `ProviderId`, `AgentId`, `AnchorId`, …         |
//! | [`math`]    | `Pose`, planar distance, yaw helpers                       |
//! | [`layer`]   | `Layer`, `LayerMask`                                       |
//! | [`input`]   | `InputEvent`, `InputData`                                  |
//! | [`event`]   | `EventKind`, `LocomotionEvent`, `Motion`                   |
//! | [`flags`]   | `EnableFlags`, `Domain`, `StartupPolicy`, `ProviderGroup`  |
//! | [`target`]  | `LocomotionTarget` trait, `RigTarget`                      |
//! | [`config`]  | profile structs and the TOML loader                        |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! Vectors and rotations are `nalgebra` types, re-exported as [`na`].

pub mod config;
pub mod error;
pub mod event;
pub mod flags;
pub mod ids;
pub mod input;
pub mod layer;
pub mod math;
pub mod target;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use nalgebra as na;

pub use config::{
    DashConfig, LocomotionProfile, ProviderConfig, ServiceConfig, SmoothConfig, TeleportConfig,
    ValidationConfig, ZoneConfig,
};
pub use error::{CoreError, CoreResult};
pub use event::{EventKind, LocomotionEvent, Motion};
pub use flags::{Domain, EnableFlags, ProviderGroup, StartupPolicy};
pub use ids::{AgentId, AnchorId, EntityId, InputAction, ListenerId, ProviderId, SourceId};
pub use input::{InputData, InputEvent};
pub use layer::{Layer, LayerMask};
pub use math::Pose;
pub use target::{LocomotionTarget, RigTarget};
