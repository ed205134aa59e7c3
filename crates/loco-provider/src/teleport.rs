//! Teleport providers and the per-source negotiation state machine.
//!
//! # Per-source flow
//!
//! ```text
//! press / cross threshold ─▶ Intent::RequestTarget
//!     coordinator: open_request() ─▶ broadcast TeleportTargetRequested
//!     agent for that source         ─▶ Intent::Answer ─▶ accept_target_agent()
//! release / fall below threshold
//!     no agent                      ─▶ request discarded, nothing raised
//!     agent answered with a pose    ─▶ Intent::Start
//!     agent answered without a pose ─▶ Intent::Cancel
//! TeleportStarted (own)             ─▶ commit strategy moves the target
//!     arrived                       ─▶ Intent::Complete
//! ```
//!
//! Sources never interfere with each other.  The only state shared between
//! them is the quick-rotate latch, which re-arms only once every source is
//! idle and no teleport is in flight.

use std::collections::{BTreeMap, BTreeSet};

use loco_core::na::Vector2;
use loco_core::{
    AgentId, AnchorId, DashConfig, InputAction, InputData, InputEvent, LocomotionEvent, Pose,
    ProviderGroup, SourceId, StartupPolicy, TeleportConfig,
};
use loco_validation::AnchorSet;

use crate::{
    CommitStep, CommitStrategy, DashCommit, Flight, InstantCommit, Intent, LocoContext,
    LocomotionListener, LocomotionProvider, ProviderError, ProviderResult, TeleportPhase,
};

/// A teleport that lands in the same step it starts.
pub type InstantTeleportProvider = TeleportProvider<InstantCommit>;

/// A teleport that dashes to the destination over a fixed duration.
pub type DashTeleportProvider = TeleportProvider<DashCommit>;

/// Bookkeeping for one open request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpenRequest {
    /// Engine clock when the request opened.
    pub opened_at: f64,
    /// The agent that took the request on, if any.
    pub agent:     Option<AgentId>,
    pub phase:     TeleportPhase,
}

/// A teleport provider, generic over how it commits a started teleport.
pub struct TeleportProvider<C: CommitStrategy> {
    config: TeleportConfig,
    group:  Option<ProviderGroup>,
    commit: C,

    requests: BTreeMap<SourceId, OpenRequest>,
    flights:  BTreeMap<SourceId, Flight>,
    /// Sources whose analog input is past the threshold.
    held:     BTreeSet<SourceId>,

    rotate_armed: bool,
}

impl InstantTeleportProvider {
    pub fn instant(config: TeleportConfig) -> Self {
        Self::new(config, InstantCommit)
    }
}

impl DashTeleportProvider {
    /// Fails if `dash_duration` is not positive.
    pub fn dash(config: DashConfig) -> ProviderResult<Self> {
        if !(config.dash_duration > 0.0) {
            return Err(ProviderError::Config(format!(
                "dash_duration must be positive, got {}",
                config.dash_duration
            )));
        }
        Ok(Self::new(config.teleport, DashCommit { duration: config.dash_duration }))
    }
}

impl<C: CommitStrategy> TeleportProvider<C> {
    pub fn new(config: TeleportConfig, commit: C) -> Self {
        Self {
            config,
            group: Some(ProviderGroup::Teleport),
            commit,
            requests: BTreeMap::new(),
            flights: BTreeMap::new(),
            held: BTreeSet::new(),
            rotate_armed: true,
        }
    }

    /// Put the provider into `group`, or exempt it from exclusivity.
    pub fn with_group(mut self, group: Option<ProviderGroup>) -> Self {
        self.group = group;
        self
    }

    #[inline]
    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    pub fn request(&self, source: SourceId) -> Option<&OpenRequest> {
        self.requests.get(&source)
    }

    /// `true` if a started teleport is still being committed.
    pub fn is_teleporting(&self) -> bool {
        !self.flights.is_empty()
    }

    /// `true` if a sideways stick flick would rotate the target now.
    pub fn can_rotate(&self) -> bool {
        self.rotate_armed
    }

    /// No source has a request open and nothing is in flight.
    fn is_settled(&self) -> bool {
        self.requests.is_empty() && self.flights.is_empty()
    }

    // ── Input handling ────────────────────────────────────────────────────

    fn wants_request(&self, source: SourceId, ctx: &LocoContext<'_>) -> bool {
        ctx.flags.teleportation() && !ctx.cooling_down && !self.requests.contains_key(&source)
    }

    fn request_target(&mut self, source: SourceId) -> Vec<Intent> {
        self.rotate_armed = false;
        vec![Intent::RequestTarget { source }]
    }

    fn on_axis(&mut self, source: SourceId, value: f32, ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        let threshold = self.config.input_threshold;
        if value > threshold {
            if !self.held.contains(&source) && self.wants_request(source, ctx) {
                self.held.insert(source);
                return self.request_target(source);
            }
        } else if value < threshold && self.held.remove(&source) {
            return self.release(source, ctx);
        }
        vec![]
    }

    fn on_dual_axis(
        &mut self,
        source: SourceId,
        stick:  Vector2<f32>,
        ctx:    &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        let threshold = self.config.input_threshold;

        if stick.x.abs() > threshold || stick.y.abs() > threshold {
            let angle = stick.x.atan2(stick.y).to_degrees() + self.config.angle_offset;
            let mut absolute = angle.abs();

            if absolute < self.config.teleport_activation_angle
                && !self.held.contains(&source)
                && self.wants_request(source, ctx)
            {
                self.held.insert(source);
                return self.request_target(source);
            }

            if ctx.flags.teleportation() && self.rotate_armed {
                if absolute > 180.0 {
                    absolute = (absolute - 360.0).abs();
                }
                // Rotation cones are centred on ±90°.
                if (absolute - 90.0).abs() < self.config.rotate_activation_angle / 2.0 {
                    self.rotate_armed = false;
                    let amount = if angle >= 0.0 {
                        self.config.rotation_amount
                    } else {
                        -self.config.rotation_amount
                    };
                    tracing::debug!(provider = %ctx.provider, %source, amount, "quick rotate");
                    ctx.target.rotate_around_up(amount);
                }
            }
            return vec![];
        }

        if stick.x.abs() < threshold && stick.y.abs() < threshold {
            let was_held = self.held.remove(&source);
            if was_held && self.requests.contains_key(&source) {
                return self.release(source, ctx);
            }
            self.rotate_armed = self.is_settled();
        }
        vec![]
    }

    /// Resolve the open request for `source` on input release.
    fn release(&mut self, source: SourceId, ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        let Some(request) = self.requests.get_mut(&source) else {
            return vec![];
        };

        let intents = match (request.phase, request.agent) {
            (TeleportPhase::Starting, _) => return vec![],
            (_, None) => {
                tracing::debug!(provider = %ctx.provider, %source, "no agent answered; request discarded");
                self.requests.remove(&source);
                vec![]
            }
            (_, Some(agent)) => {
                let answer = ctx.answers.answer(agent);
                match answer.and_then(|a| a.pose.map(|pose| (pose, a.anchor))) {
                    Some((pose, anchor)) if ctx.flags.teleportation() => {
                        request.phase = TeleportPhase::Starting;
                        vec![Intent::Start { source, pose, anchor }]
                    }
                    _ => {
                        tracing::debug!(provider = %ctx.provider, %source, %agent, "no valid target on release");
                        self.requests.remove(&source);
                        vec![Intent::Cancel { source }]
                    }
                }
            }
        };
        self.rotate_armed = self.is_settled();
        intents
    }

    fn forget(&mut self, source: SourceId) {
        self.requests.remove(&source);
        self.flights.remove(&source);
    }
}

/// Final pose of a teleport aimed at `aimed`.
///
/// An anchor's position always wins; its yaw wins only when it overrides
/// orientation.
fn destination(aimed: Pose, anchor: Option<AnchorId>, anchors: &AnchorSet) -> Pose {
    match anchor.and_then(|id| anchors.get(id)) {
        Some(a) => {
            let yaw = if a.overrides_orientation() { a.target_yaw() } else { aimed.yaw };
            Pose::new(a.position(), yaw)
        }
        None => aimed,
    }
}

impl<C: CommitStrategy> LocomotionListener for TeleportProvider<C> {
    fn on_teleport_started(
        &mut self,
        event: &LocomotionEvent,
        ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        if event.provider != ctx.provider {
            return vec![];
        }
        let source = event.source;
        let (Some(request), Some(aimed)) = (self.requests.get_mut(&source), event.pose) else {
            tracing::warn!(provider = %ctx.provider, %source, "teleport started without an open request; ignored");
            return vec![];
        };
        request.phase = TeleportPhase::Starting;

        let to = destination(aimed, event.anchor, ctx.anchors);
        let mut flight = Flight::new(ctx.target.pose(), to, event.anchor);
        match self.commit.advance(&mut flight, 0.0) {
            CommitStep::Arrived(pose) => {
                ctx.target.set_pose(pose.position, pose.yaw);
                vec![Intent::Complete { source, pose, anchor: event.anchor }]
            }
            CommitStep::InFlight(pose) => {
                ctx.target.set_pose(pose.position, pose.yaw);
                self.flights.insert(source, flight);
                vec![]
            }
        }
    }

    fn on_teleport_completed(
        &mut self,
        event: &LocomotionEvent,
        ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        if event.provider == ctx.provider {
            self.forget(event.source);
        }
        vec![]
    }

    fn on_teleport_canceled(
        &mut self,
        event: &LocomotionEvent,
        ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        if event.provider == ctx.provider {
            self.forget(event.source);
            self.rotate_armed = self.is_settled();
        }
        vec![]
    }
}

impl<C: CommitStrategy> LocomotionProvider for TeleportProvider<C> {
    fn name(&self) -> &str {
        &self.config.provider.name
    }

    fn kind(&self) -> &'static str {
        self.commit.kind()
    }

    fn family(&self) -> ProviderGroup {
        ProviderGroup::Teleport
    }

    fn group(&self) -> Option<ProviderGroup> {
        self.group
    }

    fn action(&self) -> InputAction {
        self.config.provider.action
    }

    fn startup(&self) -> StartupPolicy {
        self.config.provider.startup
    }

    fn on_deactivated(&mut self, _ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        let open: Vec<SourceId> = self.requests.keys().copied().collect();
        self.requests.clear();
        self.flights.clear();
        self.held.clear();
        self.rotate_armed = true;
        open.into_iter().map(|source| Intent::Cancel { source }).collect()
    }

    fn on_input(&mut self, input: &InputEvent, ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        if input.action != self.config.provider.action || !input.source.is_valid() {
            return vec![];
        }
        let source = input.source;
        match input.data {
            InputData::Down => {
                if self.wants_request(source, ctx) {
                    self.request_target(source)
                } else {
                    vec![]
                }
            }
            InputData::Up           => self.release(source, ctx),
            InputData::Axis(value)  => self.on_axis(source, value, ctx),
            InputData::Dual(stick)  => self.on_dual_axis(source, stick, ctx),
        }
    }

    fn update(&mut self, ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        let mut arrived = Vec::new();
        for (&source, flight) in self.flights.iter_mut() {
            match self.commit.advance(flight, ctx.delta_time) {
                CommitStep::InFlight(pose) => ctx.target.set_pose(pose.position, pose.yaw),
                CommitStep::Arrived(pose) => {
                    ctx.target.set_pose(pose.position, pose.yaw);
                    arrived.push(Intent::Complete { source, pose, anchor: flight.anchor });
                }
            }
        }
        for intent in &arrived {
            if let Intent::Complete { source, .. } = intent {
                self.flights.remove(source);
            }
        }
        arrived
    }

    fn open_request(&mut self, source: SourceId, now: f64) -> bool {
        if self.requests.contains_key(&source) {
            return false;
        }
        self.requests.insert(
            source,
            OpenRequest { opened_at: now, agent: None, phase: TeleportPhase::Requested },
        );
        self.rotate_armed = false;
        true
    }

    fn accept_target_agent(&mut self, source: SourceId, agent: AgentId) {
        match self.requests.get_mut(&source) {
            Some(request) if request.agent.is_none() => {
                tracing::debug!(provider = %self.config.provider.name, %source, %agent, "agent answered");
                request.agent = Some(agent);
                if request.phase == TeleportPhase::Requested {
                    request.phase = TeleportPhase::Answered;
                }
            }
            Some(_) => {
                tracing::debug!(%source, %agent, "request already answered; ignored");
            }
            None => {
                tracing::debug!(%source, %agent, "answer for a source with no open request; ignored");
            }
        }
    }

    fn phase(&self, source: SourceId) -> TeleportPhase {
        self.requests.get(&source).map_or(TeleportPhase::Idle, |r| r.phase)
    }

    fn open_requests(&self) -> usize {
        self.requests.len()
    }
}
