//! The `Locomotion` coordinator and its public API.

use std::any::TypeId;

use loco_core::{
    AgentId, AnchorId, Domain, EnableFlags, EventKind, InputEvent, ListenerId,
    LocomotionEvent, LocomotionTarget, Motion, Pose, ProviderGroup, ProviderId, ServiceConfig,
    SourceId, ZoneConfig,
};
use loco_provider::{
    AnswerSource, LocoContext, LocomotionListener, LocomotionProvider, TargetAgent, TeleportPhase,
};
use loco_validation::{Anchor, AnchorSet, ValidationPolicy};

use crate::registry::ProviderRegistry;
use crate::targets::Targets;
use crate::{Cooldown, LocomotionError, LocomotionResult};

// ── Handlers ──────────────────────────────────────────────────────────────────

/// A broadcast recipient, in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Handler {
    Provider(ProviderId),
    Agent(AgentId),
    Listener(ListenerId),
}

/// Scalar engine state copied into every handler context.
#[derive(Copy, Clone, Debug)]
pub(crate) struct EngineState {
    pub flags:     EnableFlags,
    pub cooldown:  Cooldown,
    /// Seconds since construction.
    pub clock:     f64,
    /// Length of the most recent step.
    pub last_step: f32,
}

impl EngineState {
    pub fn context<'a>(
        &self,
        provider: ProviderId,
        target:   &'a mut dyn LocomotionTarget,
        anchors:  &'a mut AnchorSet,
        answers:  &'a dyn AnswerSource,
    ) -> LocoContext<'a> {
        LocoContext {
            provider,
            flags:        self.flags,
            cooling_down: self.cooldown.is_active(),
            now:          self.clock,
            delta_time:   self.last_step,
            target,
            anchors,
            answers,
        }
    }
}

/// A completion waiting for its `TeleportStarted` broadcast to finish.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Arrival {
    pub provider: ProviderId,
    pub source:   SourceId,
    pub pose:     Pose,
    pub anchor:   Option<AnchorId>,
}

// ── Locomotion ────────────────────────────────────────────────────────────────

/// The locomotion coordinator.
///
/// Single source of truth for the global enable flags, the provider registry
/// with per-group exclusivity, the shared teleport cooldown, and the
/// synchronous event broadcast.
///
/// # Broadcast
///
/// Every event goes to all handlers in registration order: active providers,
/// target-supplying agents, and external listeners.  Intents a handler
/// returns are applied before the next handler is called, so a broadcast
/// raised from inside a handler completes before the outer one continues.
/// The one exception is a completion returned during `TeleportStarted`: it
/// waits until every handler has seen the start.
///
/// # Stepping
///
/// [`tick`][Self::tick] runs three phases:
///
/// 1. the cooldown counts down;
/// 2. agents recompute their answers (skipped while no validation policy is
///    installed);
/// 3. active providers advance time-based work such as dash commits.
///
/// Everything else ([`handle_input`][Self::handle_input], enabling, raising
/// events) runs to completion inside the call.
///
/// Create via [`LocomotionBuilder`][crate::LocomotionBuilder] or
/// [`Locomotion::new`].
pub struct Locomotion {
    pub(crate) state: EngineState,

    pub(crate) providers: ProviderRegistry,
    pub(crate) agents:    Vec<Box<dyn TargetAgent>>,
    pub(crate) listeners: Vec<Box<dyn LocomotionListener>>,
    pub(crate) order:     Vec<Handler>,

    pub(crate) anchors:    AnchorSet,
    pub(crate) validation: Option<ValidationPolicy>,
    pub(crate) targets:    Targets,
    pub(crate) zones:      Vec<ZoneConfig>,

    /// Nesting depth of `TeleportStarted` broadcasts.
    pub(crate) starting: u32,
    /// Completions raised during a `TeleportStarted` broadcast, held until
    /// every handler has seen the start.
    pub(crate) arrivals: Vec<Arrival>,
}

impl Locomotion {
    /// A coordinator with no providers, agents, or validation policy.
    pub fn new(service: &ServiceConfig, target: impl LocomotionTarget + 'static) -> Self {
        Self {
            state: EngineState {
                flags:     service.initial_flags(),
                cooldown:  Cooldown::new(service.cooldown_secs()),
                clock:     0.0,
                last_step: 0.0,
            },
            providers:  ProviderRegistry::new(),
            agents:     Vec::new(),
            listeners:  Vec::new(),
            order:      Vec::new(),
            anchors:    AnchorSet::new(),
            validation: None,
            targets:    Targets::new(Box::new(target)),
            zones:      Vec::new(),
            starting:   0,
            arrivals:   Vec::new(),
        }
    }

    // ── Global flags ──────────────────────────────────────────────────────

    #[inline]
    pub fn flags(&self) -> EnableFlags {
        self.state.flags
    }

    /// Set one of the three global flags.  Nothing else changes.
    pub fn set_enabled(&mut self, domain: Domain, value: bool) {
        self.state.flags.set(domain, value);
        tracing::info!(?domain, value, "locomotion flag set");
    }

    /// Effective value of `domain` (the master switch applied).
    pub fn is_enabled(&self, domain: Domain) -> bool {
        self.state.flags.get(domain)
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register a provider.
    ///
    /// Providers with [`StartupPolicy::AutoStart`][loco_core::StartupPolicy]
    /// are enabled immediately, which may deactivate another provider in the
    /// same group.  A provider whose group contradicts its family is refused.
    pub fn register_provider<P: LocomotionProvider>(
        &mut self,
        provider: P,
    ) -> LocomotionResult<ProviderId> {
        if let Some(group) = provider.group() {
            let family = provider.family();
            if group != family {
                let name = provider.name().to_owned();
                tracing::error!(provider = %name, %family, %group, "provider group does not match its kind; not registered");
                return Err(LocomotionError::GroupMismatch { name, family, group });
            }
        }

        let auto = provider.startup().is_auto();
        let name = provider.name().to_owned();
        let kind = provider.kind();
        let id = self.providers.push(Box::new(provider), TypeId::of::<P>());
        self.order.push(Handler::Provider(id));
        tracing::debug!(provider = %id, %name, kind, "provider registered");

        if auto {
            self.enable_provider(id)?;
        }
        Ok(id)
    }

    /// Register a target-supplying agent.
    pub fn register_agent<A: TargetAgent>(&mut self, agent: A) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        tracing::debug!(agent = %id, source = %agent.source(), "agent registered");
        self.agents.push(Box::new(agent));
        self.order.push(Handler::Agent(id));
        id
    }

    /// Register an external listener.
    pub fn register_listener<L: LocomotionListener + 'static>(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.listeners.len() as u32);
        self.listeners.push(Box::new(listener));
        self.order.push(Handler::Listener(id));
        id
    }

    pub fn add_anchor(&mut self, anchor: Anchor) -> LocomotionResult<AnchorId> {
        Ok(self.anchors.insert(anchor)?)
    }

    #[inline]
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    #[inline]
    pub fn anchors_mut(&mut self) -> &mut AnchorSet {
        &mut self.anchors
    }

    /// Install the validation policy agents consult.
    pub fn set_validation_policy(&mut self, policy: ValidationPolicy) {
        self.validation = Some(policy);
    }

    pub fn validation_policy_mut(&mut self) -> Option<&mut ValidationPolicy> {
        self.validation.as_mut()
    }

    /// Zones known by name, usually from a profile.
    pub fn add_zone(&mut self, zone: ZoneConfig) {
        self.zones.push(zone);
    }

    // ── Target ────────────────────────────────────────────────────────────

    /// The target pose updates currently go to.
    pub fn target(&self) -> &dyn LocomotionTarget {
        self.targets.active_ref()
    }

    /// The base target, even while an override is installed.
    pub fn base_target(&self) -> &dyn LocomotionTarget {
        self.targets.base()
    }

    /// Redirect all pose updates to `target`.  Only one override may be
    /// installed at a time.
    pub fn install_target_override(
        &mut self,
        target: impl LocomotionTarget + 'static,
    ) -> LocomotionResult<()> {
        if self.targets.install(Box::new(target)).is_err() {
            tracing::error!("a locomotion target override is already installed; ignoring the new one");
            return Err(LocomotionError::DuplicateTargetOverride);
        }
        tracing::info!("locomotion target override installed");
        Ok(())
    }

    pub fn remove_target_override(&mut self) -> Option<Box<dyn LocomotionTarget>> {
        self.targets.remove()
    }

    pub fn has_target_override(&self) -> bool {
        self.targets.has_override()
    }

    // ── Activation ────────────────────────────────────────────────────────

    /// Activate a provider.  No-op if it is already active.
    ///
    /// Every other active provider in the same group is disabled through
    /// [`disable_provider`][Self::disable_provider], so their open requests
    /// are canceled.
    pub fn enable_provider(&mut self, id: ProviderId) -> LocomotionResult<()> {
        if self.providers.get(id).is_none() {
            return Err(LocomotionError::UnknownProvider(id));
        }
        if !self.providers.set_active(id, true) {
            return Ok(());
        }
        tracing::info!(provider = %id, name = self.provider_name(id), "provider enabled");
        self.call_provider(id, |p, ctx| p.on_activated(ctx));
        self.on_provider_enabled(id)
    }

    /// Deactivate a provider.  No-op if it is already inactive.
    pub fn disable_provider(&mut self, id: ProviderId) -> LocomotionResult<()> {
        if self.providers.get(id).is_none() {
            return Err(LocomotionError::UnknownProvider(id));
        }
        if !self.providers.set_active(id, false) {
            return Ok(());
        }
        tracing::info!(provider = %id, name = self.provider_name(id), "provider disabled");
        let intents = self.call_provider(id, |p, ctx| p.on_deactivated(ctx)).unwrap_or_default();
        self.apply(Handler::Provider(id), intents);
        Ok(())
    }

    fn on_provider_enabled(&mut self, id: ProviderId) -> LocomotionResult<()> {
        let Some(group) = self.providers.get(id).and_then(|s| s.provider.group()) else {
            return Ok(());
        };
        for other in self.providers.active_in_group(group) {
            if other != id {
                self.disable_provider(other)?;
            }
        }
        Ok(())
    }

    /// Enable the first registered provider of type `P`.
    pub fn enable_provider_of<P: LocomotionProvider>(&mut self) -> LocomotionResult<ProviderId> {
        let id = self
            .providers
            .first_of_type(TypeId::of::<P>())
            .ok_or_else(|| LocomotionError::UnknownKind(std::any::type_name::<P>().to_owned()))?;
        self.enable_provider(id)?;
        Ok(id)
    }

    /// Disable every registered provider of type `P`.  Returns how many
    /// there were.
    pub fn disable_provider_of<P: LocomotionProvider>(&mut self) -> LocomotionResult<usize> {
        let ids = self.providers.all_of_type(TypeId::of::<P>());
        if ids.is_empty() {
            return Err(LocomotionError::UnknownKind(std::any::type_name::<P>().to_owned()));
        }
        for &id in &ids {
            self.disable_provider(id)?;
        }
        Ok(ids.len())
    }

    /// Enable the first registered provider whose kind label is `kind`.
    pub fn enable_provider_kind(&mut self, kind: &str) -> LocomotionResult<ProviderId> {
        let id = self
            .providers
            .first_of_kind(kind)
            .ok_or_else(|| LocomotionError::UnknownKind(kind.to_owned()))?;
        self.enable_provider(id)?;
        Ok(id)
    }

    /// Apply a configuration zone: set the three flags, then enable the
    /// named free and teleport provider kinds.
    pub fn enter_zone(&mut self, zone: &ZoneConfig) -> LocomotionResult<()> {
        tracing::info!(zone = %zone.name, "entering locomotion zone");
        self.state.flags = EnableFlags::new(
            zone.locomotion_enabled,
            zone.movement_enabled,
            zone.teleportation_enabled,
        );
        for kind in [&zone.free_provider, &zone.teleport_provider].into_iter().flatten() {
            self.enable_provider_kind(kind)?;
        }
        Ok(())
    }

    /// Apply the zone registered under `name`.
    pub fn enter_zone_named(&mut self, name: &str) -> LocomotionResult<()> {
        let zone = self
            .zones
            .iter()
            .find(|z| z.name == name)
            .cloned()
            .ok_or_else(|| LocomotionError::Config(format!("no zone named {name:?}")))?;
        self.enter_zone(&zone)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_teleport_cooling_down(&self) -> bool {
        self.state.cooldown.is_active()
    }

    #[inline]
    pub fn cooldown(&self) -> &Cooldown {
        &self.state.cooldown
    }

    /// Active providers in registration order.
    pub fn enabled_providers(&self) -> Vec<ProviderId> {
        self.providers.active()
    }

    /// The active provider of `group`, if any.
    pub fn active_provider(&self, group: ProviderGroup) -> Option<ProviderId> {
        self.providers.active_in_group(group).first().copied()
    }

    pub fn is_provider_active(&self, id: ProviderId) -> bool {
        self.providers.is_active(id)
    }

    pub fn provider(&self, id: ProviderId) -> Option<&dyn LocomotionProvider> {
        self.providers.get(id).map(|s| s.provider.as_ref())
    }

    pub fn agent(&self, id: AgentId) -> LocomotionResult<&dyn TargetAgent> {
        self.agents
            .get(id.index())
            .map(|a| a.as_ref())
            .ok_or(LocomotionError::UnknownAgent(id))
    }

    /// Negotiation state of `source` on `provider`.  Unknown providers report
    /// `Idle`.
    pub fn teleport_phase(&self, provider: ProviderId, source: SourceId) -> TeleportPhase {
        self.providers
            .get(provider)
            .map_or(TeleportPhase::Idle, |s| s.provider.phase(source))
    }

    /// Seconds of engine time since construction.
    #[inline]
    pub fn now(&self) -> f64 {
        self.state.clock
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Open a request for `source` on `provider` and broadcast it.
    ///
    /// No-op while the cooldown runs, while the provider is inactive, or if
    /// the provider already has a request open for `source`.
    pub fn raise_teleport_target_request(
        &mut self,
        provider: ProviderId,
        source:   SourceId,
    ) -> LocomotionResult<()> {
        let event = self.event(provider, source)?;
        if self.state.cooldown.is_active() {
            tracing::debug!(%provider, %source, remaining = self.state.cooldown.remaining(), "teleport cooling down; request dropped");
            return Ok(());
        }
        let now = self.state.clock;
        let Some(slot) = self.providers.get_mut(provider) else {
            return Err(LocomotionError::UnknownProvider(provider));
        };
        if !slot.active {
            tracing::warn!(%provider, %source, "target request from an inactive provider; dropped");
            return Ok(());
        }
        if !slot.provider.open_request(source, now) {
            tracing::debug!(%provider, %source, "request already open for source; dropped");
            return Ok(());
        }
        tracing::debug!(%provider, %source, "teleport target requested");
        self.broadcast(EventKind::TeleportTargetRequested, event);
        Ok(())
    }

    pub fn raise_teleport_started(
        &mut self,
        provider: ProviderId,
        source:   SourceId,
        pose:     Pose,
        anchor:   Option<AnchorId>,
    ) -> LocomotionResult<()> {
        let event = self.event(provider, source)?.with_pose(Some(pose), anchor);
        tracing::debug!(%provider, %source, %pose, "teleport started");
        self.starting += 1;
        self.broadcast(EventKind::TeleportStarted, event);
        self.starting -= 1;

        if self.starting == 0 {
            for arrival in std::mem::take(&mut self.arrivals) {
                let Arrival { provider, source, pose, anchor } = arrival;
                if let Err(err) = self.raise_teleport_completed(provider, source, pose, anchor) {
                    tracing::warn!(%provider, %source, %err, "deferred completion failed");
                }
            }
        }
        Ok(())
    }

    /// Broadcast completion.  The cooldown restarts before any handler runs.
    pub fn raise_teleport_completed(
        &mut self,
        provider: ProviderId,
        source:   SourceId,
        pose:     Pose,
        anchor:   Option<AnchorId>,
    ) -> LocomotionResult<()> {
        let event = self.event(provider, source)?.with_pose(Some(pose), anchor);
        self.state.cooldown.reset();
        self.anchors.notify_completed(anchor);
        tracing::info!(%provider, %source, %pose, "teleport completed");
        self.broadcast(EventKind::TeleportCompleted, event);
        Ok(())
    }

    pub fn raise_teleport_canceled(
        &mut self,
        provider: ProviderId,
        source:   SourceId,
    ) -> LocomotionResult<()> {
        let event = self.event(provider, source)?;
        tracing::debug!(%provider, %source, "teleport canceled");
        self.broadcast(EventKind::TeleportCanceled, event);
        Ok(())
    }

    pub fn raise_moving(
        &mut self,
        provider: ProviderId,
        source:   SourceId,
        motion:   Motion,
    ) -> LocomotionResult<()> {
        let event = self.event(provider, source)?.with_motion(motion);
        tracing::trace!(%provider, %source, speed = motion.speed, "moving");
        self.broadcast(EventKind::Moving, event);
        Ok(())
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Deliver one input event to active providers and agents.
    pub fn handle_input(&mut self, input: InputEvent) -> LocomotionResult<()> {
        if !input.source.is_valid() {
            return Err(LocomotionError::InvalidSource);
        }
        for i in 0..self.order.len() {
            match self.order[i] {
                Handler::Provider(id) if self.providers.is_active(id) => {
                    let intents = self
                        .call_provider(id, |p, ctx| p.on_input(&input, ctx))
                        .unwrap_or_default();
                    self.apply(Handler::Provider(id), intents);
                }
                Handler::Agent(id) => {
                    if let Some(agent) = self.agents.get_mut(id.index()) {
                        agent.on_input(&input);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Advance the engine by `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f32) {
        let delta_time = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        self.state.clock += f64::from(delta_time);
        self.state.last_step = delta_time;

        // ── Phase 1: cooldown ─────────────────────────────────────────────
        self.state.cooldown.tick(delta_time);

        // ── Phase 2: agent answers ────────────────────────────────────────
        self.update_agents();

        // ── Phase 3: provider updates ─────────────────────────────────────
        for id in self.providers.active() {
            // An earlier update may have disabled this one.
            if !self.providers.is_active(id) {
                continue;
            }
            let intents = self.call_provider(id, |p, ctx| p.update(ctx)).unwrap_or_default();
            self.apply(Handler::Provider(id), intents);
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// A bare event for `provider`/`source`, rejecting invalid input.
    fn event(&self, provider: ProviderId, source: SourceId) -> LocomotionResult<LocomotionEvent> {
        if !source.is_valid() {
            return Err(LocomotionError::InvalidSource);
        }
        let slot = self
            .providers
            .get(provider)
            .ok_or(LocomotionError::UnknownProvider(provider))?;
        Ok(LocomotionEvent::bare(provider, source, slot.provider.action()))
    }

    fn provider_name(&self, id: ProviderId) -> &str {
        self.providers.get(id).map_or("", |s| s.provider.name())
    }
}
