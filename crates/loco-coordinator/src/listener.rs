//! Closure adapter for external listeners.

use loco_core::{EventKind, LocomotionEvent};
use loco_provider::{Intent, LocoContext, LocomotionListener};

/// A [`LocomotionListener`] that forwards every event to a closure.
///
/// ```rust,ignore
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&log);
/// loco.register_listener(FnListener::new(move |kind, event: &LocomotionEvent| {
///     sink.borrow_mut().push((kind, event.source));
/// }));
/// ```
pub struct FnListener<F> {
    callback: F,
}

impl<F> FnListener<F>
where
    F: FnMut(EventKind, &LocomotionEvent),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }

    fn emit(&mut self, kind: EventKind, event: &LocomotionEvent) -> Vec<Intent> {
        (self.callback)(kind, event);
        vec![]
    }
}

impl<F> LocomotionListener for FnListener<F>
where
    F: FnMut(EventKind, &LocomotionEvent),
{
    fn on_moving(&mut self, event: &LocomotionEvent, _ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        self.emit(EventKind::Moving, event)
    }

    fn on_teleport_target_requested(
        &mut self,
        event: &LocomotionEvent,
        _ctx:  &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        self.emit(EventKind::TeleportTargetRequested, event)
    }

    fn on_teleport_started(
        &mut self,
        event: &LocomotionEvent,
        _ctx:  &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        self.emit(EventKind::TeleportStarted, event)
    }

    fn on_teleport_completed(
        &mut self,
        event: &LocomotionEvent,
        _ctx:  &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        self.emit(EventKind::TeleportCompleted, event)
    }

    fn on_teleport_canceled(
        &mut self,
        event: &LocomotionEvent,
        _ctx:  &mut LocoContext<'_>,
    ) -> Vec<Intent> {
        self.emit(EventKind::TeleportCanceled, event)
    }
}
