//! The shared teleport cooldown.

use loco_core::config::MAX_TELEPORT_COOLDOWN;

/// Counts down from a fixed duration after each completed teleport.
///
/// While it runs, no new teleport request is broadcast by any provider.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cooldown {
    duration:  f32,
    remaining: f32,
}

impl Cooldown {
    /// `duration` is clamped to `[0, MAX_TELEPORT_COOLDOWN]`; NaN means 0.
    pub fn new(duration: f32) -> Self {
        let duration = if duration.is_nan() { 0.0 } else { duration.clamp(0.0, MAX_TELEPORT_COOLDOWN) };
        Self { duration, remaining: 0.0 }
    }

    /// Restart from the full duration.
    #[inline]
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Count down by `delta_time`, stopping at zero.
    #[inline]
    pub fn tick(&mut self, delta_time: f32) {
        self.remaining = (self.remaining - delta_time).max(0.0);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
