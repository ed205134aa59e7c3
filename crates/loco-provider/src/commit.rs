//! Commit strategies — how a started teleport reaches its destination.

use loco_core::{AnchorId, Pose};

/// One teleport on its way from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Flight {
    pub from:    Pose,
    pub to:      Pose,
    pub anchor:  Option<AnchorId>,
    /// Seconds since the teleport started.
    pub elapsed: f32,
}

impl Flight {
    pub fn new(from: Pose, to: Pose, anchor: Option<AnchorId>) -> Self {
        Self { from, to, anchor, elapsed: 0.0 }
    }
}

/// Result of advancing a [`Flight`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CommitStep {
    /// Still moving; the target should be at this pose now.
    InFlight(Pose),
    /// Done; this is the final pose.
    Arrived(Pose),
}

/// Decides the target pose over the course of a teleport.
///
/// Advanced once with a zero step when the teleport starts, then once per
/// engine step with that step's length until it reports
/// [`CommitStep::Arrived`].
pub trait CommitStrategy: 'static {
    /// Kind label of providers using this strategy.
    fn kind(&self) -> &'static str;

    fn advance(&self, flight: &mut Flight, delta_time: f32) -> CommitStep;
}

/// Sets the final pose in the step that starts the teleport.
#[derive(Copy, Clone, Debug, Default)]
pub struct InstantCommit;

impl CommitStrategy for InstantCommit {
    fn kind(&self) -> &'static str {
        "instant-teleport"
    }

    fn advance(&self, flight: &mut Flight, _delta_time: f32) -> CommitStep {
        CommitStep::Arrived(flight.to)
    }
}

/// Blends position and yaw from start to destination over `duration`
/// seconds.
#[derive(Copy, Clone, Debug)]
pub struct DashCommit {
    pub duration: f32,
}

impl CommitStrategy for DashCommit {
    fn kind(&self) -> &'static str {
        "dash-teleport"
    }

    fn advance(&self, flight: &mut Flight, delta_time: f32) -> CommitStep {
        flight.elapsed += delta_time;
        let t = flight.elapsed / self.duration;
        if t >= 1.0 {
            CommitStep::Arrived(flight.to)
        } else {
            CommitStep::InFlight(flight.from.interpolate(&flight.to, t))
        }
    }
}
