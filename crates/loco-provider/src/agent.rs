//! Target-supplying agents — who answers a teleport request, and with what.

use loco_core::math::normalize_yaw;
use loco_core::{
    AgentId, AnchorId, InputAction, InputData, InputEvent, LocomotionEvent, Pose, ProviderId,
    SourceId,
};
use loco_validation::{AnchorSet, QueryResult, SpatialQuery, ValidationPolicy, ValidationResult};

use crate::{AnswerSource, Intent, LocoContext, LocomotionListener};

/// An agent's current proposal for where its source's teleport should land.
///
/// `pose` is `Some` only when `result` is acceptable.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TargetAnswer {
    pub pose:   Option<Pose>,
    pub anchor: Option<AnchorId>,
    pub result: ValidationResult,
}

/// A collaborator that answers teleport target requests for one input
/// source.
///
/// An agent enters targeting mode when it sees a target request for its own
/// source, and leaves it when that source's teleport starts or is canceled.
/// While targeting, [`update`][Self::update] is called every engine step to
/// recompute the answer.
pub trait TargetAgent: LocomotionListener + 'static {
    /// The input source this agent answers for.
    fn source(&self) -> SourceId;

    fn is_targeting(&self) -> bool;

    fn answer(&self) -> TargetAnswer;

    /// Recompute the answer.  Called once per step, targeting or not.
    fn update(&mut self, policy: &ValidationPolicy, ctx: &mut LocoContext<'_>);

    /// Observe raw input.  Default: ignored.
    fn on_input(&mut self, _input: &InputEvent) {}
}

impl AnswerSource for Vec<Box<dyn TargetAgent>> {
    fn answer(&self, agent: AgentId) -> Option<TargetAnswer> {
        self.get(agent.index()).map(|a| a.answer())
    }
}

// ── PointerAgent ──────────────────────────────────────────────────────────────

/// A pointer-style agent that aims with a [`SpatialQuery`].
///
/// While targeting it follows the 2D axis of the requesting provider's action
/// to pick a facing: the stick angle (`atan2(x, y)`) is added to the target's
/// current yaw.  Landing on an anchor that overrides orientation uses the
/// anchor's yaw instead.
pub struct PointerAgent<Q: SpatialQuery> {
    source:  SourceId,
    query:   Q,
    enabled: bool,

    targeting:    bool,
    requested_by: Option<(ProviderId, InputAction)>,
    orientation:  f32,
    answer:       TargetAnswer,

    targeted_anchor: Option<AnchorId>,
    last_query:      Option<QueryResult>,
}

impl<Q: SpatialQuery> PointerAgent<Q> {
    pub fn new(source: SourceId, query: Q) -> Self {
        Self {
            source,
            query,
            enabled: true,
            targeting: false,
            requested_by: None,
            orientation: 0.0,
            answer: TargetAnswer::default(),
            targeted_anchor: None,
            last_query: None,
        }
    }

    /// A disabled agent ignores target requests.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn query_mut(&mut self) -> &mut Q {
        &mut self.query
    }

    /// The provider whose request this agent is answering.
    pub fn requesting_provider(&self) -> Option<ProviderId> {
        self.requested_by.map(|(p, _)| p)
    }

    /// Stick angle in degrees relative to the target's facing.
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    /// The query result the current answer was computed from.
    pub fn last_query(&self) -> Option<&QueryResult> {
        self.last_query.as_ref()
    }

    fn retarget(&mut self, anchor: Option<AnchorId>, anchors: &mut AnchorSet) {
        if self.targeted_anchor == anchor {
            return;
        }
        if let Some(previous) = self.targeted_anchor {
            anchors.set_targeted(previous, false);
        }
        if let Some(next) = anchor {
            anchors.set_targeted(next, true);
        }
        self.targeted_anchor = anchor;
    }

    fn reset(&mut self, anchors: &mut AnchorSet) {
        self.targeting = false;
        self.requested_by = None;
        self.orientation = 0.0;
        self.answer = TargetAnswer::default();
        self.last_query = None;
        self.retarget(None, anchors);
    }
}

impl<Q: SpatialQuery> LocomotionListener for PointerAgent<Q> {
    fn on_teleport_target_requested(
        &mut self,
        event: &LocomotionEvent,
        _ctx:  &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        if event.source != self.source || !self.enabled {
            return vec![];
        }
        if self.targeting {
            tracing::debug!(source = %self.source, "already targeting; request ignored");
            return vec![];
        }
        self.targeting = true;
        self.requested_by = Some((event.provider, event.action));
        self.orientation = 0.0;
        self.answer = TargetAnswer::default();
        vec![Intent::Answer { provider: event.provider, source: self.source }]
    }

    fn on_teleport_started(
        &mut self,
        event: &LocomotionEvent,
        ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        if event.source == self.source {
            self.reset(ctx.anchors);
        }
        vec![]
    }

    fn on_teleport_canceled(
        &mut self,
        event: &LocomotionEvent,
        ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        if event.source == self.source {
            self.reset(ctx.anchors);
        }
        vec![]
    }
}

impl<Q: SpatialQuery + 'static> TargetAgent for PointerAgent<Q> {
    fn source(&self) -> SourceId {
        self.source
    }

    fn is_targeting(&self) -> bool {
        self.targeting
    }

    fn answer(&self) -> TargetAnswer {
        self.answer
    }

    fn update(&mut self, policy: &ValidationPolicy, ctx: &mut LocoContext<'_>) {
        if !self.targeting {
            return;
        }

        let Some(hit) = self.query.query(self.source) else {
            self.answer = TargetAnswer::default();
            self.last_query = None;
            self.retarget(None, ctx.anchors);
            return;
        };

        let viewer = ctx.target.viewer_position();
        let (result, anchor) = policy.classify(&hit, ctx.anchors, &viewer);

        let yaw = match anchor.and_then(|id| ctx.anchors.get(id)) {
            Some(a) if a.overrides_orientation() => a.target_yaw(),
            _ => normalize_yaw(ctx.target.pose().yaw + self.orientation),
        };
        let pose = result.is_acceptable().then(|| Pose::new(hit.endpoint, yaw));

        self.answer = TargetAnswer { pose, anchor, result };
        self.last_query = Some(hit);
        self.retarget(anchor, ctx.anchors);
    }

    fn on_input(&mut self, input: &InputEvent) {
        let Some((_, action)) = self.requested_by else {
            return;
        };
        if input.source != self.source || input.action != action {
            return;
        }
        if let InputData::Dual(stick) = input.data {
            if stick.norm_squared() > 0.0 {
                self.orientation = stick.x.atan2(stick.y).to_degrees();
            }
        }
    }
}
