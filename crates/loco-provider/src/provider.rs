//! The `LocomotionProvider` trait — the pluggable movement strategy.

use std::fmt;

use loco_core::{AgentId, InputAction, InputEvent, ProviderGroup, SourceId, StartupPolicy};

use crate::{Intent, LocoContext, LocomotionListener};

/// Negotiation state of one input source on one teleport provider.
///
/// ```text
/// Idle → Requested → Answered → Starting → Idle   (completed)
///        Requested | Answered            → Idle   (canceled or discarded)
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TeleportPhase {
    /// No open request.
    #[default]
    Idle,
    /// A request is open; no agent has taken it on yet.
    Requested,
    /// An agent correlated itself with the request and is answering.
    Answered,
    /// The teleport started and is being committed.
    Starting,
}

impl fmt::Display for TeleportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TeleportPhase::Idle      => "idle",
            TeleportPhase::Requested => "requested",
            TeleportPhase::Answered  => "answered",
            TeleportPhase::Starting  => "starting",
        };
        f.write_str(s)
    }
}

/// A pluggable movement strategy.
///
/// The coordinator owns every provider, tracks whether it is active, and only
/// delivers input and events to active ones.  Providers filter input by their
/// own [`action`][Self::action] and by the global flag of their family.
///
/// # Family and group
///
/// [`family`][Self::family] is what the provider *is* (free movement or
/// teleport).  [`group`][Self::group] is the exclusivity group it was
/// configured into, `None` for an exempt provider.  A provider whose group
/// contradicts its family is refused at registration.
///
/// # Required methods
///
/// Identity, [`on_input`][Self::on_input] and the [`LocomotionListener`]
/// supertrait.  The teleport hooks default to "not a teleport provider".
pub trait LocomotionProvider: LocomotionListener + 'static {
    /// Display name used in logs.
    fn name(&self) -> &str;

    /// Kind label, e.g. `"smooth"` or `"dash-teleport"`.
    fn kind(&self) -> &'static str;

    fn family(&self) -> ProviderGroup;

    fn group(&self) -> Option<ProviderGroup>;

    /// The input action this provider listens to.
    fn action(&self) -> InputAction;

    fn startup(&self) -> StartupPolicy;

    /// Called after the provider became active.
    fn on_activated(&mut self, _ctx: &mut LocoContext<'_>) {}

    /// Called after the provider became inactive.
    ///
    /// Must drop all of the provider's open requests before returning; the
    /// returned intents announce the cancellations.
    fn on_deactivated(&mut self, _ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        vec![]
    }

    /// Handle one input event.  Only called while active.
    fn on_input(&mut self, input: &InputEvent, ctx: &mut LocoContext<'_>) -> Vec<Intent>;

    /// Advance time-based work (e.g. an animated commit) by
    /// `ctx.delta_time`.  Only called while active.
    fn update(&mut self, _ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        vec![]
    }

    // ── Teleport negotiation ──────────────────────────────────────────────

    /// Register a request for `source`.
    ///
    /// Returns `false` if one is already open, in which case the coordinator
    /// does not broadcast.
    fn open_request(&mut self, _source: SourceId, _now: f64) -> bool {
        false
    }

    /// Correlate `agent` with the open request for `source`.
    ///
    /// The first agent wins; later answers and answers for sources without an
    /// open request are ignored.
    fn accept_target_agent(&mut self, _source: SourceId, _agent: AgentId) {}

    fn phase(&self, _source: SourceId) -> TeleportPhase {
        TeleportPhase::Idle
    }

    /// Number of requests currently open, in any phase.
    fn open_requests(&self) -> usize {
        0
    }
}
