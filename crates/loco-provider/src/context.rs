//! Mutable engine state handed to every handler callback.

use loco_core::{AgentId, EnableFlags, LocomotionTarget, ProviderId};
use loco_validation::AnchorSet;

use crate::TargetAnswer;

/// Read access to the current answer of each target-supplying agent.
///
/// Providers resolve a request by looking up the answer of the agent that
/// correlated itself with it.
pub trait AnswerSource {
    fn answer(&self, agent: AgentId) -> Option<TargetAnswer>;
}

/// An [`AnswerSource`] with no agents behind it.
pub struct NoAnswers;

impl AnswerSource for NoAnswers {
    fn answer(&self, _agent: AgentId) -> Option<TargetAnswer> {
        None
    }
}

/// State passed to one handler invocation.
///
/// The coordinator builds a fresh context for every call, so `flags` and
/// `cooling_down` always reflect the state at the moment of the call, even
/// inside a nested broadcast.
///
/// # Lifetimes
///
/// All borrows live for one handler call.  Handlers never see the
/// coordinator itself; anything that needs it is returned as an
/// [`Intent`][crate::Intent].
pub struct LocoContext<'a> {
    /// The provider being called, or `ProviderId::INVALID` when the handler
    /// is an agent or an external listener.
    pub provider: ProviderId,

    /// Global enable flags.
    pub flags: EnableFlags,

    /// `true` while the shared teleport cooldown is running.
    pub cooling_down: bool,

    /// Engine clock in seconds.
    pub now: f64,

    /// Length of the current (or most recent) step in seconds.
    pub delta_time: f32,

    /// The movable target: the installed override if any, else the base.
    pub target: &'a mut dyn LocomotionTarget,

    /// Scene anchors.
    pub anchors: &'a mut AnchorSet,

    /// Current agent answers.
    pub answers: &'a dyn AnswerSource,
}
