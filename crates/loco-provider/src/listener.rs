//! The handler trait every broadcast recipient implements.

use loco_core::{EventKind, LocomotionEvent};

use crate::{Intent, LocoContext};

/// Receives the five locomotion events.
///
/// Providers, target-supplying agents and external listeners all implement
/// this trait and are called in the order they were registered.  Every
/// method defaults to doing nothing, so implementors only override what they
/// care about.
pub trait LocomotionListener {
    fn on_moving(&mut self, _event: &LocomotionEvent, _ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        vec![]
    }

    fn on_teleport_target_requested(
        &mut self,
        _event: &LocomotionEvent,
        _ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        vec![]
    }

    fn on_teleport_started(
        &mut self,
        _event: &LocomotionEvent,
        _ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        vec![]
    }

    fn on_teleport_completed(
        &mut self,
        _event: &LocomotionEvent,
        _ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        vec![]
    }

    fn on_teleport_canceled(
        &mut self,
        _event: &LocomotionEvent,
        _ctx:   &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        vec![]
    }
}

/// Route `event` to the handler method for `kind`.
pub fn deliver<L: LocomotionListener + ?Sized>(
    listener: &mut L,
    kind:     EventKind,
    event:    &LocomotionEvent,
    ctx:      &mut LocoContext<'_>,
) -> Vec<Intent> {
    match kind {
        EventKind::Moving                  => listener.on_moving(event, ctx),
        EventKind::TeleportTargetRequested => listener.on_teleport_target_requested(event, ctx),
        EventKind::TeleportStarted         => listener.on_teleport_started(event, ctx),
        EventKind::TeleportCompleted       => listener.on_teleport_completed(event, ctx),
        EventKind::TeleportCanceled        => listener.on_teleport_canceled(event, ctx),
    }
}
