//! `loco-provider` — movement providers, teleport negotiation, and
//! target-supplying agents.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`listener`] | `LocomotionListener` trait, `deliver`                            |
//! | [`context`]  | `LocoContext<'a>`, `AnswerSource`, `NoAnswers`                   |
//! | [`intent`]   | `Intent` — what a handler asks the coordinator to do             |
//! | [`provider`] | `LocomotionProvider` trait, `TeleportPhase`                      |
//! | [`smooth`]   | `SmoothProvider` — continuous free movement                      |
//! | [`teleport`] | `TeleportProvider<C>` and the per-source negotiation             |
//! | [`commit`]   | `CommitStrategy`, `InstantCommit`, `DashCommit`                  |
//! | [`agent`]    | `TargetAgent` trait, `PointerAgent`, `TargetAnswer`              |
//! | [`error`]    | `ProviderError`, `ProviderResult<T>`                             |
//!
//! # Design notes
//!
//! Handlers never hold a reference to the coordinator.  Each callback gets a
//! [`LocoContext`] with the state it may touch and returns a `Vec<Intent>`;
//! the coordinator applies those intents before calling the next handler.
//! A provider that starts a teleport during a broadcast therefore produces
//! the same event order as a direct nested call would.

pub mod agent;
pub mod commit;
pub mod context;
pub mod error;
pub mod intent;
pub mod listener;
pub mod provider;
pub mod smooth;
pub mod teleport;


pub use agent::{PointerAgent, TargetAgent, TargetAnswer};
pub use commit::{CommitStep, CommitStrategy, DashCommit, Flight, InstantCommit};
pub use context::{AnswerSource, LocoContext, NoAnswers};
pub use error::{ProviderError, ProviderResult};
pub use intent::Intent;
pub use listener::{deliver, LocomotionListener};
pub use provider::{LocomotionProvider, TeleportPhase};
pub use smooth::{SmoothProvider, MIN_SPEED};
pub use teleport::{DashTeleportProvider, InstantTeleportProvider, OpenRequest, TeleportProvider};
