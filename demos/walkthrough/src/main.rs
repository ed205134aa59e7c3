//! walkthrough — scripted tour of the locomotion engine.
//!
//! Loads a locomotion profile (the bundled `profile.toml`, or the path given
//! as the first argument), builds a coordinator around an in-memory rig, and
//! replays a short input script: walk, teleport onto the floor, get rejected
//! by a wall, land on an anchor, then enter a zone that swaps in the dash
//! teleport.  Run with `RUST_LOG=debug` to see the engine's own tracing.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use loco_coordinator::{FnListener, Locomotion, LocomotionBuilder};
use loco_core::na::Vector3;
use loco_core::{
    EntityId, EventKind, InputAction, InputEvent, Layer, LocomotionEvent, LocomotionProfile, Pose,
    RigTarget, SourceId,
};
use loco_provider::PointerAgent;
use loco_validation::{Anchor, QueryResult};

// ── Constants ─────────────────────────────────────────────────────────────────

const BUNDLED_PROFILE: &str = include_str!("../profile.toml");

const RIGHT_HAND: SourceId    = SourceId(0);
const LEFT_HAND:  SourceId    = SourceId(1);
const TELEPORT:   InputAction = InputAction(1);
const MOVE:       InputAction = InputAction(2);
const RUN:        InputAction = InputAction(3);

const FRAME: f32 = 1.0 / 90.0;
const EYE_HEIGHT: f32 = 1.6;

const FLOOR:  EntityId = EntityId(1);
const WALL:   EntityId = EntityId(2);
const PLINTH: EntityId = EntityId(3);

// ── Scene ─────────────────────────────────────────────────────────────────────

/// Stand-in for the host's raycaster: whatever the right hand points at.
type Pointer = Rc<RefCell<Option<QueryResult>>>;

fn floor_at(x: f32, z: f32) -> QueryResult {
    QueryResult::hit(FLOOR, Vector3::new(x, 0.0, z), Layer(0)).with_path_length(x.hypot(z))
}

fn wall_at(x: f32, z: f32) -> QueryResult {
    QueryResult::hit(WALL, Vector3::new(x, 1.0, z), Layer(0)).with_normal(-Vector3::z())
}

// ── Script helpers ────────────────────────────────────────────────────────────

fn frames(loco: &mut Locomotion, count: usize) {
    for _ in 0..count {
        loco.tick(FRAME);
    }
}

/// Push the stick forward, hold for a few frames, let go.
fn flick_teleport(loco: &mut Locomotion, hold_frames: usize) -> Result<()> {
    loco.handle_input(InputEvent::dual(RIGHT_HAND, TELEPORT, 0.0, 1.0))?;
    frames(loco, hold_frames);
    loco.handle_input(InputEvent::dual(RIGHT_HAND, TELEPORT, 0.0, 0.0))?;
    Ok(())
}

fn report(loco: &Locomotion, step: &str) {
    let pose = loco.target().pose();
    info!(step, %pose, cooling_down = loco.is_teleport_cooling_down(), "rig");
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let profile = match std::env::args().nth(1) {
        Some(path) => LocomotionProfile::load(Path::new(&path))?,
        None => LocomotionProfile::from_toml_str(BUNDLED_PROFILE)?,
    };
    info!(zones = profile.zones.len(), cooldown = profile.service.teleport_cooldown, "profile loaded");

    let pointer: Pointer = Rc::new(RefCell::new(None));
    let aim = Rc::clone(&pointer);

    let mut plinth = Anchor::new("plinth", PLINTH, Vector3::new(-3.0, 0.0, 6.0)).with_orientation(180.0);
    plinth.on_targeted_changed(|targeted| info!(targeted, "plinth highlight"));
    plinth.on_activated(|| info!("arrived at the plinth"));

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let mut loco = LocomotionBuilder::new(RigTarget::new(Pose::identity()).with_eye_height(EYE_HEIGHT))
        .profile(&profile)
        .anchor(plinth)
        .agent(PointerAgent::new(RIGHT_HAND, move |_: SourceId| *aim.borrow()))
        .listener(FnListener::new(move |kind: EventKind, event: &LocomotionEvent| {
            info!(%kind, provider = %event.provider, source = %event.source, "event");
            sink.borrow_mut().push(kind);
        }))
        .build()?;

    report(&loco, "start");

    // ── Walk, then run ────────────────────────────────────────────────────
    frames(&mut loco, 1);
    for _ in 0..45 {
        loco.handle_input(InputEvent::dual(LEFT_HAND, MOVE, 0.0, 1.0))?;
        loco.tick(FRAME);
    }
    loco.handle_input(InputEvent::down(LEFT_HAND, RUN))?;
    for _ in 0..45 {
        loco.handle_input(InputEvent::dual(LEFT_HAND, MOVE, 0.0, 1.0))?;
        loco.tick(FRAME);
    }
    loco.handle_input(InputEvent::up(LEFT_HAND, RUN))?;
    report(&loco, "walked");

    // ── Teleport onto the floor ───────────────────────────────────────────
    let here = loco.target().pose().position;
    *pointer.borrow_mut() = Some(floor_at(here.x + 1.0, here.z + 4.0));
    flick_teleport(&mut loco, 10)?;
    report(&loco, "floor teleport");

    // Inside the cooldown nothing is requested.
    flick_teleport(&mut loco, 5)?;
    frames(&mut loco, 60);

    // ── A wall is not a floor ─────────────────────────────────────────────
    *pointer.borrow_mut() = Some(wall_at(0.0, 6.0));
    flick_teleport(&mut loco, 10)?;
    report(&loco, "wall rejected");

    // ── Quick rotate, then land on the anchor ─────────────────────────────
    loco.handle_input(InputEvent::dual(RIGHT_HAND, TELEPORT, 1.0, 0.0))?;
    loco.handle_input(InputEvent::dual(RIGHT_HAND, TELEPORT, 0.0, 0.0))?;
    report(&loco, "quick rotate");

    *pointer.borrow_mut() = Some(QueryResult::hit(PLINTH, Vector3::new(-2.8, 0.0, 6.1), Layer(0)));
    flick_teleport(&mut loco, 10)?;
    report(&loco, "anchor");
    frames(&mut loco, 60);

    // ── The gallery: no walking, dash teleport ────────────────────────────
    loco.enter_zone_named("gallery")?;
    loco.handle_input(InputEvent::dual(LEFT_HAND, MOVE, 0.0, 1.0))?;
    *pointer.borrow_mut() = Some(floor_at(-3.0, 2.0));
    flick_teleport(&mut loco, 10)?;
    report(&loco, "dash started");
    frames(&mut loco, 30);
    report(&loco, "dash finished");

    // ── Summary ───────────────────────────────────────────────────────────
    let events = events.borrow();
    let count = |kind: EventKind| events.iter().filter(|&&k| k == kind).count();
    info!(
        moving    = count(EventKind::Moving),
        requested = count(EventKind::TeleportTargetRequested),
        started   = count(EventKind::TeleportStarted),
        completed = count(EventKind::TeleportCompleted),
        canceled  = count(EventKind::TeleportCanceled),
        "walkthrough finished"
    );
    Ok(())
}
