//! Handler calls, broadcast, and intent application.

use loco_core::{AgentId, EventKind, ListenerId, LocomotionEvent, ProviderId, SourceId};
use loco_provider::{deliver, Intent, LocoContext, LocomotionProvider, NoAnswers};

use crate::locomotion::{Arrival, Handler, Locomotion};
use crate::LocomotionResult;

impl Locomotion {
    // ── Handler calls ─────────────────────────────────────────────────────

    /// Call `f` on provider `id` with a fresh context.  `None` if `id` is
    /// unknown.
    pub(crate) fn call_provider<R>(
        &mut self,
        id: ProviderId,
        f:  impl FnOnce(&mut dyn LocomotionProvider, &mut LocoContext<'_>) -> R,
    ) -> Option<R> {
        let slot = self.providers.get_mut(id)?;
        let mut ctx = self.state.context(id, self.targets.active(), &mut self.anchors, &self.agents);
        Some(f(slot.provider.as_mut(), &mut ctx))
    }

    fn call_agent(&mut self, id: AgentId, kind: EventKind, event: &LocomotionEvent) -> Vec<Intent> {
        let Some(agent) = self.agents.get_mut(id.index()) else {
            return vec![];
        };
        let mut ctx =
            self.state.context(ProviderId::INVALID, self.targets.active(), &mut self.anchors, &NoAnswers);
        deliver(agent.as_mut(), kind, event, &mut ctx)
    }

    fn call_listener(
        &mut self,
        id:    ListenerId,
        kind:  EventKind,
        event: &LocomotionEvent,
    ) -> Vec<Intent> {
        let Some(listener) = self.listeners.get_mut(id.index()) else {
            return vec![];
        };
        let mut ctx =
            self.state.context(ProviderId::INVALID, self.targets.active(), &mut self.anchors, &self.agents);
        deliver(listener.as_mut(), kind, event, &mut ctx)
    }

    /// Let every agent recompute its answer.
    pub(crate) fn update_agents(&mut self) {
        let Some(policy) = self.validation.as_ref() else {
            if self.agents.iter().any(|a| a.is_targeting()) {
                tracing::debug!("no validation policy installed; agent answers not updated");
            }
            return;
        };
        for agent in &mut self.agents {
            let mut ctx = self.state.context(
                ProviderId::INVALID,
                self.targets.active(),
                &mut self.anchors,
                &NoAnswers,
            );
            agent.update(policy, &mut ctx);
        }
    }

    // ── Broadcast ─────────────────────────────────────────────────────────

    /// Deliver `event` to every handler in registration order.
    ///
    /// Inactive providers are skipped, checked at the moment their turn
    /// comes, so a provider disabled by an earlier handler is not called.
    pub(crate) fn broadcast(&mut self, kind: EventKind, event: LocomotionEvent) {
        tracing::trace!(%kind, provider = %event.provider, source = %event.source, "broadcast");
        // Handlers registered by a nested call join this broadcast.
        let mut i = 0;
        while i < self.order.len() {
            let handler = self.order[i];
            i += 1;

            let intents = match handler {
                Handler::Provider(id) => {
                    if !self.providers.is_active(id) {
                        continue;
                    }
                    self.call_provider(id, |p, ctx| deliver(p, kind, &event, ctx))
                        .unwrap_or_default()
                }
                Handler::Agent(id) => self.call_agent(id, kind, &event),
                Handler::Listener(id) => self.call_listener(id, kind, &event),
            };
            self.apply(handler, intents);
        }
    }

    // ── Intents ───────────────────────────────────────────────────────────

    /// Carry out the intents `handler` returned, in order.
    ///
    /// A completion returned while a `TeleportStarted` broadcast is running
    /// is held back and raised once that broadcast has reached every handler.
    ///
    /// Failures are logged and do not stop the remaining intents.
    pub(crate) fn apply(&mut self, handler: Handler, intents: Vec<Intent>) {
        for intent in intents {
            let outcome = match (handler, intent) {
                (Handler::Provider(p), Intent::RequestTarget { source }) => {
                    self.raise_teleport_target_request(p, source)
                }
                (Handler::Provider(p), Intent::Start { source, pose, anchor }) => {
                    self.raise_teleport_started(p, source, pose, anchor)
                }
                (Handler::Provider(p), Intent::Complete { source, pose, anchor })
                    if self.starting > 0 =>
                {
                    self.arrivals.push(Arrival { provider: p, source, pose, anchor });
                    Ok(())
                }
                (Handler::Provider(p), Intent::Complete { source, pose, anchor }) => {
                    self.raise_teleport_completed(p, source, pose, anchor)
                }
                (Handler::Provider(p), Intent::Cancel { source }) => {
                    self.raise_teleport_canceled(p, source)
                }
                (Handler::Provider(p), Intent::Moved { source, motion }) => {
                    self.raise_moving(p, source, motion)
                }
                (Handler::Agent(agent), Intent::Answer { provider, source }) => {
                    self.accept_answer(provider, source, agent)
                }
                (handler, intent) => {
                    tracing::warn!(?handler, ?intent, "intent not valid for its emitter; dropped");
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                tracing::warn!(?handler, %err, "intent failed");
            }
        }
    }

    fn accept_answer(
        &mut self,
        provider: ProviderId,
        source:   SourceId,
        agent:    AgentId,
    ) -> LocomotionResult<()> {
        let slot = self
            .providers
            .get_mut(provider)
            .ok_or(crate::LocomotionError::UnknownProvider(provider))?;
        slot.provider.accept_target_agent(source, agent);
        Ok(())
    }
}
