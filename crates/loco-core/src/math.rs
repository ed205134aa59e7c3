//! Pose type and the small amount of spatial math the engine needs.
//!
//! The world is Y-up.  Orientation is reduced to a yaw angle in degrees
//! around the up axis: locomotion never pitches or rolls the rig, so a full
//! rotation would only carry noise.  Interpolation goes through
//! `UnitQuaternion` so blends take the short way around.

use nalgebra::{UnitQuaternion, Vector2, Vector3};

/// World up direction.
#[inline]
pub fn up() -> Vector3<f32> {
    Vector3::y()
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_yaw(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Distance between `a` and `b` projected onto the horizontal plane.
#[inline]
pub fn planar_distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    Vector2::new(a.x - b.x, a.z - b.z).norm()
}

/// Absolute vertical separation between `a` and `b`.
#[inline]
pub fn height_delta(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    (a.y - b.y).abs()
}

/// Position plus yaw (degrees around world up).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub yaw:      f32,
}

impl Pose {
    #[inline]
    pub fn new(position: Vector3<f32>, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Pose at the origin facing +Z.
    pub fn identity() -> Self {
        Self { position: Vector3::zeros(), yaw: 0.0 }
    }

    /// The yaw as a rotation around world up.
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), normalize_yaw(self.yaw).to_radians())
    }

    /// Blend from `self` to `end` at parameter `t` (clamped to `[0, 1]`).
    ///
    /// Position is linear; yaw is a spherical blend of the two rotations.
    pub fn interpolate(&self, end: &Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        let from = self.rotation();
        let to   = end.rotation();
        // `try_slerp` refuses exactly opposite rotations; nlerp picks a side.
        let blended = from
            .try_slerp(&to, t, 1.0e-6)
            .unwrap_or_else(|| from.nlerp(&to, t));
        Pose {
            position: self.position.lerp(&end.position, t),
            yaw:      yaw_of(&blended),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}) @ {:.1}°",
            self.position.x, self.position.y, self.position.z, self.yaw
        )
    }
}

/// Yaw in degrees of a rotation that only turns around world up.
fn yaw_of(rotation: &UnitQuaternion<f32>) -> f32 {
    normalize_yaw(rotation.scaled_axis().y.to_degrees())
}
