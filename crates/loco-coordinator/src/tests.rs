//! Unit tests for loco-coordinator.
//!
//! Everything here goes through the public coordinator API with real
//! providers and a closure-backed pointer agent.

#[cfg(test)]
mod harness {
    use std::cell::RefCell;
    use std::rc::Rc;

    use loco_core::na::Vector3;
    use loco_core::{
        DashConfig, EntityId, EventKind, InputAction, Layer, LocomotionEvent, ProviderConfig,
        ServiceConfig, SmoothConfig, SourceId, StartupPolicy, TeleportConfig,
    };
    use loco_provider::{DashTeleportProvider, InstantTeleportProvider, PointerAgent, SmoothProvider};
    use loco_validation::QueryResult;

    use crate::FnListener;

    pub const TELEPORT: InputAction = InputAction(1);
    pub const MOVE:     InputAction = InputAction(2);
    pub const S1:       SourceId    = SourceId(1);
    pub const S2:       SourceId    = SourceId(2);

    /// What the host's raycaster currently reports.
    pub type Aim = Rc<RefCell<Option<QueryResult>>>;

    pub type Log = Rc<RefCell<Vec<(EventKind, SourceId)>>>;

    pub fn aim_at(hit: Option<QueryResult>) -> Aim {
        Rc::new(RefCell::new(hit))
    }

    pub fn floor(x: f32, z: f32) -> Option<QueryResult> {
        Some(QueryResult::hit(EntityId(1), Vector3::new(x, 0.0, z), Layer(0)))
    }

    pub fn service(cooldown: f32) -> ServiceConfig {
        ServiceConfig { teleport_cooldown: cooldown, ..ServiceConfig::default() }
    }

    pub fn blink(startup: StartupPolicy) -> InstantTeleportProvider {
        InstantTeleportProvider::instant(TeleportConfig::new(ProviderConfig::new(
            "blink", startup, TELEPORT,
        )))
    }

    pub fn dash(startup: StartupPolicy) -> DashTeleportProvider {
        let teleport = TeleportConfig::new(ProviderConfig::new("dash", startup, TELEPORT));
        DashTeleportProvider::dash(DashConfig { teleport, dash_duration: 0.25 }).unwrap()
    }

    pub fn walk(startup: StartupPolicy) -> SmoothProvider {
        SmoothProvider::new(SmoothConfig {
            provider: ProviderConfig::new("walk", startup, MOVE),
            ..SmoothConfig::default()
        })
    }

    pub fn pointer(
        source: SourceId,
        aim:    Aim,
    ) -> PointerAgent<impl FnMut(SourceId) -> Option<QueryResult>> {
        PointerAgent::new(source, move |_: SourceId| *aim.borrow())
    }

    pub fn recorder(log: &Log) -> FnListener<impl FnMut(EventKind, &LocomotionEvent) + use<>> {
        let sink = Rc::clone(log);
        FnListener::new(move |kind, event: &LocomotionEvent| {
            sink.borrow_mut().push((kind, event.source));
        })
    }

    pub fn kinds(log: &Log) -> Vec<EventKind> {
        log.borrow().iter().map(|&(k, _)| k).collect()
    }
}

// ── Teleport flow ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod flow {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_relative_eq;
    use loco_core::na::Vector3;
    use loco_core::{
        AgentId, EntityId, EventKind, InputEvent, Layer, LocomotionEvent, Pose, ProviderId,
        RigTarget, SourceId, StartupPolicy, ValidationConfig,
    };
    use loco_provider::{Intent, LocoContext, LocomotionListener, TeleportPhase};
    use loco_validation::{Anchor, QueryResult};

    use super::harness::*;
    use crate::{Locomotion, LocomotionBuilder, LocomotionError};

    /// Listener, blink provider, pointer agent on `S1`; 1 s cooldown.
    fn rig(aim: &Aim, log: &Log) -> Locomotion {
        LocomotionBuilder::new(RigTarget::default())
            .service(service(1.0))
            .validation(ValidationConfig::default())
            .listener(recorder(log))
            .provider(blink(StartupPolicy::AutoStart))
            .agent(pointer(S1, Rc::clone(aim)))
            .build()
            .unwrap()
    }

    fn teleport(loco: &mut Locomotion, source: SourceId) {
        loco.handle_input(InputEvent::down(source, TELEPORT)).unwrap();
        loco.tick(0.1);
        loco.handle_input(InputEvent::up(source, TELEPORT)).unwrap();
    }

    #[test]
    fn valid_answer_starts_and_completes() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        teleport(&mut loco, S1);

        assert_eq!(
            kinds(&log),
            vec![EventKind::TeleportTargetRequested, EventKind::TeleportStarted, EventKind::TeleportCompleted]
        );
        assert_eq!(loco.target().pose().position, Vector3::new(0.0, 0.0, 3.0));
        assert!(loco.is_teleport_cooling_down());
        assert_eq!(loco.teleport_phase(ProviderId(0), S1), TeleportPhase::Idle);
        assert!(!loco.agent(AgentId(0)).unwrap().is_targeting());
    }

    #[test]
    fn late_listener_sees_start_before_instant_completion() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .validation(ValidationConfig::default())
            .provider(blink(StartupPolicy::AutoStart))
            .agent(pointer(S1, Rc::clone(&aim)))
            .listener(recorder(&log))
            .build()
            .unwrap();

        teleport(&mut loco, S1);

        assert_eq!(
            *log.borrow(),
            vec![
                (EventKind::TeleportTargetRequested, S1),
                (EventKind::TeleportStarted, S1),
                (EventKind::TeleportCompleted, S1),
            ]
        );
        assert_eq!(loco.target().pose().position, Vector3::new(0.0, 0.0, 3.0));
        assert!(loco.is_teleport_cooling_down());
        assert!(!loco.agent(AgentId(0)).unwrap().is_targeting());
    }

    #[test]
    fn cooldown_blocks_requests_until_it_expires() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = rig(&aim, &log);
        teleport(&mut loco, S1);
        log.borrow_mut().clear();

        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert!(log.borrow().is_empty(), "no broadcast within the cooldown");
        loco.handle_input(InputEvent::up(S1, TELEPORT)).unwrap();

        loco.tick(0.5);
        assert!(loco.is_teleport_cooling_down());
        loco.tick(0.5);
        assert!(!loco.is_teleport_cooling_down());

        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested]);
    }

    #[test]
    fn cooldown_is_running_during_the_completed_broadcast() {
        struct Probe(Rc<RefCell<Vec<bool>>>);

        impl LocomotionListener for Probe {
            fn on_teleport_completed(
                &mut self,
                _event: &LocomotionEvent,
                ctx:    &mut LocoContext<'_>,
            ) -> Vec<Intent> {
                self.0.borrow_mut().push(ctx.cooling_down);
                vec![]
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let aim = aim_at(floor(1.0, 1.0));
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .validation(ValidationConfig::default())
            .provider(blink(StartupPolicy::AutoStart))
            .agent(pointer(S1, Rc::clone(&aim)))
            .listener(Probe(Rc::clone(&seen)))
            .build()
            .unwrap();

        teleport(&mut loco, S1);
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn unanswered_request_is_discarded_without_cancel() {
        let log = Log::default();
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .listener(recorder(&log))
            .provider(blink(StartupPolicy::AutoStart))
            .build()
            .unwrap();

        teleport(&mut loco, S1);
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested]);
        assert_eq!(loco.teleport_phase(ProviderId(0), S1), TeleportPhase::Idle);
        assert_eq!(loco.target().pose(), Pose::identity());

        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert_eq!(log.borrow().len(), 2, "a fresh request opens after the discard");
    }

    #[test]
    fn rejected_target_cancels() {
        let aim = aim_at(floor(0.0, 40.0));
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        teleport(&mut loco, S1);
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested, EventKind::TeleportCanceled]);
        assert_eq!(loco.target().pose(), Pose::identity());
        assert!(!loco.is_teleport_cooling_down());
    }

    #[test]
    fn missing_validation_policy_cancels() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .listener(recorder(&log))
            .provider(blink(StartupPolicy::AutoStart))
            .agent(pointer(S1, Rc::clone(&aim)))
            .build()
            .unwrap();

        teleport(&mut loco, S1);
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested, EventKind::TeleportCanceled]);
    }

    #[test]
    fn agents_answer_only_their_own_source() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        teleport(&mut loco, S2);
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested]);
        assert_eq!(loco.target().pose(), Pose::identity());
    }

    #[test]
    fn invalid_source_is_an_error() {
        let aim = aim_at(None);
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        let err = loco.handle_input(InputEvent::down(SourceId::INVALID, TELEPORT)).unwrap_err();
        assert!(matches!(err, LocomotionError::InvalidSource));
        let err = loco.raise_teleport_target_request(ProviderId(0), SourceId::INVALID).unwrap_err();
        assert!(matches!(err, LocomotionError::InvalidSource));
        let err = loco.raise_teleport_canceled(ProviderId(7), S1).unwrap_err();
        assert!(matches!(err, LocomotionError::UnknownProvider(ProviderId(7))));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn direct_raise_respects_the_open_request() {
        let aim = aim_at(None);
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        loco.raise_teleport_target_request(ProviderId(0), S1).unwrap();
        loco.raise_teleport_target_request(ProviderId(0), S1).unwrap();
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested]);
        assert_eq!(loco.teleport_phase(ProviderId(0), S1), TeleportPhase::Answered);
    }

    #[test]
    fn anchor_overrides_position_and_yaw_and_activates() {
        let activations = Rc::new(RefCell::new(0));
        let targeted = Rc::new(RefCell::new(Vec::new()));

        let mut pad = Anchor::new("pad", EntityId(7), Vector3::new(1.0, 0.0, 2.0)).with_orientation(-90.0);
        let count = Rc::clone(&activations);
        pad.on_activated(move || *count.borrow_mut() += 1);
        let edges = Rc::clone(&targeted);
        pad.on_targeted_changed(move |t| edges.borrow_mut().push(t));

        let hit = QueryResult::hit(EntityId(7), Vector3::new(1.2, 0.0, 2.1), Layer(0));
        let aim = aim_at(Some(hit));
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .validation(ValidationConfig::default())
            .anchor(pad)
            .provider(blink(StartupPolicy::AutoStart))
            .agent(pointer(S1, Rc::clone(&aim)))
            .build()
            .unwrap();

        teleport(&mut loco, S1);

        let pose = loco.target().pose();
        assert_eq!(pose.position, Vector3::new(1.0, 0.0, 2.0));
        assert_relative_eq!(pose.yaw, -90.0);
        assert_eq!(*activations.borrow(), 1);
        assert_eq!(*targeted.borrow(), vec![true, false]);
    }

    #[test]
    fn stick_orientation_sets_the_landing_yaw() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        // Push forward to request, twist right while aiming, let go.
        loco.handle_input(InputEvent::dual(S1, TELEPORT, 0.0, 1.0)).unwrap();
        loco.handle_input(InputEvent::dual(S1, TELEPORT, 1.0, 1.0)).unwrap();
        loco.tick(0.1);
        loco.handle_input(InputEvent::dual(S1, TELEPORT, 0.0, 0.0)).unwrap();

        assert_eq!(kinds(&log).last(), Some(&EventKind::TeleportCompleted));
        assert_relative_eq!(loco.target().pose().yaw, 45.0, epsilon = 1e-4);
    }

    #[test]
    fn dash_completes_over_ticks() {
        let aim = aim_at(floor(0.0, 4.0));
        let log = Log::default();
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .validation(ValidationConfig::default())
            .listener(recorder(&log))
            .provider(dash(StartupPolicy::AutoStart))
            .agent(pointer(S1, Rc::clone(&aim)))
            .build()
            .unwrap();

        teleport(&mut loco, S1);
        assert_eq!(kinds(&log).last(), Some(&EventKind::TeleportStarted));
        assert_eq!(loco.teleport_phase(ProviderId(0), S1), TeleportPhase::Starting);

        loco.tick(0.125);
        assert_relative_eq!(loco.target().pose().position.z, 2.0, epsilon = 1e-4);
        assert!(!loco.is_teleport_cooling_down());

        loco.tick(0.125);
        assert_eq!(kinds(&log).last(), Some(&EventKind::TeleportCompleted));
        assert_eq!(loco.target().pose().position, Vector3::new(0.0, 0.0, 4.0));
        assert!(loco.is_teleport_cooling_down());
        assert_eq!(loco.teleport_phase(ProviderId(0), S1), TeleportPhase::Idle);
    }

    #[test]
    fn target_override_receives_updates() {
        let aim = aim_at(floor(0.0, 3.0));
        let log = Log::default();
        let mut loco = rig(&aim, &log);

        loco.install_target_override(RigTarget::new(Pose::new(Vector3::new(5.0, 0.0, 0.0), 0.0))).unwrap();
        let err = loco.install_target_override(RigTarget::default()).unwrap_err();
        assert!(matches!(err, LocomotionError::DuplicateTargetOverride));

        teleport(&mut loco, S1);
        assert_eq!(loco.target().pose().position, Vector3::new(0.0, 0.0, 3.0));
        assert_eq!(loco.base_target().pose(), Pose::identity());

        assert!(loco.remove_target_override().is_some());
        assert!(!loco.has_target_override());
        assert_eq!(loco.target().pose(), Pose::identity());
    }
}

// ── Activation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod activation {
    use loco_core::{
        AgentId, Domain, EventKind, InputEvent, ProviderGroup, ProviderId, RigTarget,
        StartupPolicy, ValidationConfig, ZoneConfig,
    };
    use loco_provider::{DashTeleportProvider, InstantTeleportProvider, SmoothProvider, TeleportPhase};

    use super::harness::*;
    use crate::{Locomotion, LocomotionBuilder, LocomotionError};

    const A: ProviderId = ProviderId(0);
    const B: ProviderId = ProviderId(1);
    const C: ProviderId = ProviderId(2);

    /// A = blink (auto), B = dash (manual), C = walk (auto).
    fn three(log: &Log) -> Locomotion {
        LocomotionBuilder::new(RigTarget::default())
            .validation(ValidationConfig::default())
            .provider(blink(StartupPolicy::AutoStart))
            .provider(dash(StartupPolicy::ManualStart))
            .provider(walk(StartupPolicy::AutoStart))
            .agent(pointer(S1, aim_at(floor(0.0, 2.0))))
            .listener(recorder(log))
            .build()
            .unwrap()
    }

    #[test]
    fn autostart_providers_are_active() {
        let loco = three(&Log::default());
        assert_eq!(loco.enabled_providers(), vec![A, C]);
        assert_eq!(loco.active_provider(ProviderGroup::Teleport), Some(A));
        assert_eq!(loco.active_provider(ProviderGroup::Free), Some(C));
    }

    #[test]
    fn enabling_replaces_the_group_member_only() {
        let mut loco = three(&Log::default());
        loco.enable_provider(B).unwrap();
        assert!(!loco.is_provider_active(A));
        assert!(loco.is_provider_active(B));
        assert!(loco.is_provider_active(C), "other groups are untouched");
        assert_eq!(loco.enabled_providers(), vec![B, C]);
    }

    #[test]
    fn deactivation_cancels_open_requests_and_clears_targeting() {
        let log = Log::default();
        let mut loco = three(&log);
        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert!(loco.agent(AgentId(0)).unwrap().is_targeting());

        loco.enable_provider(B).unwrap();

        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested, EventKind::TeleportCanceled]);
        assert_eq!(log.borrow()[1], (EventKind::TeleportCanceled, S1));
        assert!(!loco.agent(AgentId(0)).unwrap().is_targeting());
        assert_eq!(loco.teleport_phase(A, S1), TeleportPhase::Idle);
    }

    #[test]
    fn enable_and_disable_are_idempotent() {
        let log = Log::default();
        let mut loco = three(&log);
        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();

        loco.enable_provider(A).unwrap();
        assert_eq!(loco.teleport_phase(A, S1), TeleportPhase::Answered);

        loco.disable_provider(A).unwrap();
        loco.disable_provider(A).unwrap();
        assert_eq!(kinds(&log), vec![EventKind::TeleportTargetRequested, EventKind::TeleportCanceled]);
        assert_eq!(loco.active_provider(ProviderGroup::Teleport), None);
    }

    #[test]
    fn inactive_providers_ignore_input() {
        let log = Log::default();
        let mut loco = three(&log);
        loco.disable_provider(A).unwrap();
        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let mut loco = three(&Log::default());
        let err = loco.enable_provider(ProviderId(9)).unwrap_err();
        assert!(matches!(err, LocomotionError::UnknownProvider(ProviderId(9))));
        assert!(matches!(loco.agent(AgentId(4)), Err(LocomotionError::UnknownAgent(_))));
    }

    #[test]
    fn enable_by_type() {
        let mut loco = three(&Log::default());
        assert_eq!(loco.enable_provider_of::<DashTeleportProvider>().unwrap(), B);
        assert!(!loco.is_provider_active(A));

        assert_eq!(loco.disable_provider_of::<DashTeleportProvider>().unwrap(), 1);
        assert!(!loco.is_provider_active(B));

        assert_eq!(loco.enable_provider_of::<InstantTeleportProvider>().unwrap(), A);
        assert_eq!(loco.disable_provider_of::<SmoothProvider>().unwrap(), 1);
        assert_eq!(loco.enabled_providers(), vec![A]);
    }

    #[test]
    fn enable_by_kind() {
        let mut loco = three(&Log::default());
        assert_eq!(loco.enable_provider_kind("dash-teleport").unwrap(), B);
        assert_eq!(loco.active_provider(ProviderGroup::Teleport), Some(B));

        let err = loco.enable_provider_kind("jetpack").unwrap_err();
        assert!(matches!(err, LocomotionError::UnknownKind(k) if k == "jetpack"));
    }

    #[test]
    fn zones_set_flags_and_switch_providers() {
        let hall = ZoneConfig {
            name:              "hall".into(),
            movement_enabled:  false,
            teleport_provider: Some("dash-teleport".into()),
            ..ZoneConfig::default()
        };
        let mut loco = three(&Log::default());
        loco.add_zone(hall);

        loco.enter_zone_named("hall").unwrap();
        assert!(!loco.is_enabled(Domain::Movement));
        assert!(loco.is_enabled(Domain::Teleportation));
        assert_eq!(loco.active_provider(ProviderGroup::Teleport), Some(B));
        assert_eq!(loco.active_provider(ProviderGroup::Free), Some(C));

        assert!(matches!(loco.enter_zone_named("attic"), Err(LocomotionError::Config(_))));
    }

    #[test]
    fn group_mismatch_is_refused() {
        let mut loco = Locomotion::new(&service(0.0), RigTarget::default());
        let err = loco
            .register_provider(walk(StartupPolicy::AutoStart).with_group(Some(ProviderGroup::Teleport)))
            .unwrap_err();
        assert!(matches!(
            err,
            LocomotionError::GroupMismatch { family: ProviderGroup::Free, group: ProviderGroup::Teleport, .. }
        ));
        assert!(loco.enabled_providers().is_empty());
    }

    #[test]
    fn exempt_providers_do_not_displace_others() {
        let mut loco = Locomotion::new(&service(0.0), RigTarget::default());
        let a = loco.register_provider(blink(StartupPolicy::AutoStart)).unwrap();
        let b = loco.register_provider(dash(StartupPolicy::AutoStart).with_group(None)).unwrap();
        assert!(loco.is_provider_active(a));
        assert!(loco.is_provider_active(b));
        assert_eq!(loco.active_provider(ProviderGroup::Teleport), Some(a));
    }

    #[test]
    fn teleport_flag_blocks_requests() {
        let log = Log::default();
        let mut loco = three(&log);
        loco.set_enabled(Domain::Locomotion, false);
        assert!(!loco.is_enabled(Domain::Teleportation));
        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert!(log.borrow().is_empty());

        loco.set_enabled(Domain::Locomotion, true);
        loco.handle_input(InputEvent::down(S1, TELEPORT)).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }
}

// ── Smooth movement ───────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use approx::assert_relative_eq;
    use loco_core::{Domain, EventKind, InputEvent, RigTarget, StartupPolicy};

    use super::harness::*;
    use crate::LocomotionBuilder;

    #[test]
    fn moves_with_the_last_step_length() {
        let log = Log::default();
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .provider(walk(StartupPolicy::AutoStart))
            .listener(recorder(&log))
            .build()
            .unwrap();

        loco.tick(0.5);
        loco.handle_input(InputEvent::dual(S1, MOVE, 0.0, 1.0)).unwrap();
        assert_relative_eq!(loco.target().pose().position.z, 1.5, epsilon = 1e-5);
        assert_eq!(kinds(&log), vec![EventKind::Moving]);

        loco.set_enabled(Domain::Movement, false);
        loco.handle_input(InputEvent::dual(S1, MOVE, 0.0, 1.0)).unwrap();
        assert_relative_eq!(loco.target().pose().position.z, 1.5, epsilon = 1e-5);
        assert_eq!(log.borrow().len(), 1);
    }
}

// ── Profiles ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod profile {
    use loco_core::{LocomotionProfile, ProviderGroup, RigTarget};

    use crate::LocomotionBuilder;

    const PROFILE: &str = r#"
        [service]
        teleport_cooldown = 0.5

        [instant_teleport]
        name = "blink"
        startup = "auto-start"
        action = 1

        [dash_teleport]
        name = "dash"
        action = 1
        dash_duration = 0.3

        [smooth]
        name = "walk"
        startup = "auto-start"
        action = 2

        [[zones]]
        name = "arena"
        teleport_provider = "dash-teleport"
    "#;

    #[test]
    fn builds_from_a_profile() {
        let profile = LocomotionProfile::from_toml_str(PROFILE).unwrap();
        let mut loco = LocomotionBuilder::new(RigTarget::default())
            .profile(&profile)
            .build()
            .unwrap();

        assert_eq!(loco.cooldown().duration(), 0.5);
        let teleport = loco.active_provider(ProviderGroup::Teleport).unwrap();
        assert_eq!(loco.provider(teleport).unwrap().kind(), "instant-teleport");
        assert_eq!(loco.provider(loco.active_provider(ProviderGroup::Free).unwrap()).unwrap().name(), "walk");

        loco.enter_zone_named("arena").unwrap();
        let teleport = loco.active_provider(ProviderGroup::Teleport).unwrap();
        assert_eq!(loco.provider(teleport).unwrap().kind(), "dash-teleport");
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use std::collections::BTreeMap;

    use loco_core::{EventKind, InputEvent, ProviderGroup, ProviderId, RigTarget, SourceId, StartupPolicy};
    use loco_provider::TeleportPhase;
    use proptest::prelude::*;

    use super::harness::*;
    use crate::{Locomotion, LocomotionBuilder};

    #[derive(Copy, Clone, Debug)]
    enum Op {
        Enable(u32),
        Disable(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![(0u32..4).prop_map(Op::Enable), (0u32..4).prop_map(Op::Disable)]
    }

    /// Two teleport providers, two free providers, all manual.
    fn four() -> Locomotion {
        LocomotionBuilder::new(RigTarget::default())
            .provider(blink(StartupPolicy::ManualStart))
            .provider(walk(StartupPolicy::ManualStart))
            .provider(dash(StartupPolicy::ManualStart))
            .provider(walk(StartupPolicy::ManualStart))
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn at_most_one_active_per_group(ops in prop::collection::vec(op(), 0..40)) {
            let mut loco = four();
            let mut last: BTreeMap<ProviderGroup, Option<ProviderId>> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Enable(i) => {
                        let id = ProviderId(i);
                        loco.enable_provider(id).unwrap();
                        let group = loco.provider(id).unwrap().family();
                        last.insert(group, Some(id));
                    }
                    Op::Disable(i) => {
                        let id = ProviderId(i);
                        loco.disable_provider(id).unwrap();
                        let group = loco.provider(id).unwrap().family();
                        if last.get(&group) == Some(&Some(id)) {
                            last.insert(group, None);
                        }
                    }
                }
                for group in [ProviderGroup::Free, ProviderGroup::Teleport] {
                    let active: Vec<_> = loco
                        .enabled_providers()
                        .into_iter()
                        .filter(|&id| loco.provider(id).unwrap().family() == group)
                        .collect();
                    prop_assert!(active.len() <= 1);
                    prop_assert_eq!(active.first().copied(), last.get(&group).copied().flatten());
                }
            }
        }

        #[test]
        fn one_open_request_per_source(presses in prop::collection::vec((any::<bool>(), 1u32..3), 0..40)) {
            let log = Log::default();
            let mut loco = LocomotionBuilder::new(RigTarget::default())
                .provider(blink(StartupPolicy::AutoStart))
                .listener(recorder(&log))
                .build()
                .unwrap();

            let mut open: BTreeMap<SourceId, bool> = BTreeMap::new();
            let mut expected: BTreeMap<SourceId, usize> = BTreeMap::new();

            for (down, s) in presses {
                let source = SourceId(s);
                let is_open = open.entry(source).or_insert(false);
                if down {
                    loco.handle_input(InputEvent::down(source, TELEPORT)).unwrap();
                    if !*is_open {
                        *expected.entry(source).or_default() += 1;
                        *is_open = true;
                    }
                } else {
                    // No agent answers, so every release discards.
                    loco.handle_input(InputEvent::up(source, TELEPORT)).unwrap();
                    *is_open = false;
                }
                let phase = loco.teleport_phase(ProviderId(0), source);
                let want = if *is_open { TeleportPhase::Requested } else { TeleportPhase::Idle };
                prop_assert_eq!(phase, want);
            }

            let mut seen: BTreeMap<SourceId, usize> = BTreeMap::new();
            for &(kind, source) in log.borrow().iter() {
                prop_assert_eq!(kind, EventKind::TeleportTargetRequested);
                *seen.entry(source).or_default() += 1;
            }
            expected.retain(|_, n| *n > 0);
            prop_assert_eq!(seen, expected);
        }
    }
}
