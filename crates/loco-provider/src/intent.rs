//! Handler intents — what a handler asks the coordinator to do next.

use loco_core::{AnchorId, Motion, Pose, ProviderId, SourceId};

/// An action requested by a handler during a callback.
///
/// Handlers cannot reach the coordinator while it is dispatching to them, so
/// they return intents instead.  The coordinator applies a handler's intents
/// as soon as that handler returns and before the next handler runs, which
/// keeps nested broadcasts in the same order a direct call would give.
///
/// The provider for the first five variants is the handler that returned
/// the intent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Intent {
    /// Open a teleport request for `source` and broadcast the target request.
    RequestTarget { source: SourceId },

    /// Broadcast `TeleportStarted` with the resolved answer.
    Start {
        source: SourceId,
        pose:   Pose,
        anchor: Option<AnchorId>,
    },

    /// Broadcast `TeleportCompleted` with the final pose.
    Complete {
        source: SourceId,
        pose:   Pose,
        anchor: Option<AnchorId>,
    },

    /// Broadcast `TeleportCanceled`.
    Cancel { source: SourceId },

    /// Broadcast `Moving`.
    Moved { source: SourceId, motion: Motion },

    /// An agent takes on the open request of `provider` for `source`.
    ///
    /// Only meaningful from agents; the coordinator fills in which agent.
    Answer { provider: ProviderId, source: SourceId },
}
