//! Event payloads broadcast by the coordinator.

use nalgebra::Vector2;

use crate::{AnchorId, InputAction, Pose, ProviderId, SourceId};

/// The five broadcast events of the locomotion engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A free-movement provider moved the target.
    Moving,
    /// A teleport provider opened a request and wants a target for a source.
    TeleportTargetRequested,
    /// A validated target was accepted; the provider is committing it.
    TeleportStarted,
    /// The target reached its final pose.
    TeleportCompleted,
    /// An open or in-flight request was aborted.
    TeleportCanceled,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Moving                  => "moving",
            EventKind::TeleportTargetRequested => "teleport-target-requested",
            EventKind::TeleportStarted         => "teleport-started",
            EventKind::TeleportCompleted       => "teleport-completed",
            EventKind::TeleportCanceled        => "teleport-canceled",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction and speed carried by `Moving` events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Motion {
    pub direction: Vector2<f32>,
    pub speed:     f32,
}

/// Payload shared by every broadcast event.
///
/// `action` is the raising provider's configured input action so agents can
/// follow the right axis while answering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocomotionEvent {
    pub provider: ProviderId,
    pub source:   SourceId,
    pub action:   InputAction,
    pub pose:     Option<Pose>,
    pub anchor:   Option<AnchorId>,
    pub motion:   Option<Motion>,
}

impl LocomotionEvent {
    /// An event with no pose, anchor, or motion attached.
    pub fn bare(provider: ProviderId, source: SourceId, action: InputAction) -> Self {
        Self { provider, source, action, pose: None, anchor: None, motion: None }
    }

    pub fn with_pose(mut self, pose: Option<Pose>, anchor: Option<AnchorId>) -> Self {
        self.pose = pose;
        self.anchor = anchor;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }
}
