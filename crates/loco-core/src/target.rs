//! The movable target — the thing locomotion actually moves.

use nalgebra::{Vector2, Vector3};

use crate::math::{normalize_yaw, Pose};

/// The rig (or any other object) whose pose locomotion drives.
///
/// Implementations live in the host: a scene transform, a physics body, a
/// network-replicated proxy.  The engine only calls these methods from its
/// own thread.
pub trait LocomotionTarget {
    /// Current pose.
    fn pose(&self) -> Pose;

    /// Jump to `position` facing `yaw` degrees.
    fn set_pose(&mut self, position: Vector3<f32>, yaw: f32);

    /// Move on the horizontal plane.
    ///
    /// `direction` is relative to the target's facing (`y` forward, `x`
    /// right); the displacement is `direction * speed * delta_time`.
    fn move_planar(&mut self, direction: Vector2<f32>, speed: f32, delta_time: f32);

    /// Turn around world up by `degrees`.
    fn rotate_around_up(&mut self, degrees: f32);

    /// Where the user's eyes are.  Validation measures distances from here.
    ///
    /// Default: the target position.
    fn viewer_position(&self) -> Vector3<f32> {
        self.pose().position
    }
}

/// A plain in-memory [`LocomotionTarget`].
///
/// Useful for headless hosts and tests.  `eye_height` offsets the viewer
/// position above the rig origin.
#[derive(Clone, Debug, Default)]
pub struct RigTarget {
    pub pose:       Pose,
    pub eye_height: f32,
}

impl RigTarget {
    pub fn new(pose: Pose) -> Self {
        Self { pose, eye_height: 0.0 }
    }

    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye_height = eye_height;
        self
    }
}

impl LocomotionTarget for RigTarget {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, position: Vector3<f32>, yaw: f32) {
        self.pose = Pose::new(position, normalize_yaw(yaw));
    }

    fn move_planar(&mut self, direction: Vector2<f32>, speed: f32, delta_time: f32) {
        let (sin, cos) = self.pose.yaw.to_radians().sin_cos();
        // Rotate the local (right, forward) pair into world (x, z).
        let world = Vector3::new(
            direction.x * cos + direction.y * sin,
            0.0,
            direction.y * cos - direction.x * sin,
        );
        self.pose.position += world * speed * delta_time;
    }

    fn rotate_around_up(&mut self, degrees: f32) {
        self.pose.yaw = normalize_yaw(self.pose.yaw + degrees);
    }

    fn viewer_position(&self) -> Vector3<f32> {
        self.pose.position + Vector3::new(0.0, self.eye_height, 0.0)
    }
}
