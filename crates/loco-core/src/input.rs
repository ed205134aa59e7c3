//! Input events delivered to providers and agents.
//!
//! The engine does not poll devices.  The host's input layer translates
//! device state into these events, tags each with the originating source and
//! logical action, and hands them to the coordinator on the engine thread.

use nalgebra::Vector2;

use crate::{InputAction, SourceId};

/// Payload of a single input event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputData {
    /// Digital press edge.
    Down,
    /// Digital release edge.
    Up,
    /// Single-axis analog value (trigger, grip…).
    Axis(f32),
    /// Two-axis analog value (thumbstick, touchpad).  `y` is forward.
    Dual(Vector2<f32>),
}

/// One input event tagged with its source and action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub source: SourceId,
    pub action: InputAction,
    pub data:   InputData,
}

impl InputEvent {
    pub fn down(source: SourceId, action: InputAction) -> Self {
        Self { source, action, data: InputData::Down }
    }

    pub fn up(source: SourceId, action: InputAction) -> Self {
        Self { source, action, data: InputData::Up }
    }

    pub fn axis(source: SourceId, action: InputAction, value: f32) -> Self {
        Self { source, action, data: InputData::Axis(value) }
    }

    pub fn dual(source: SourceId, action: InputAction, x: f32, y: f32) -> Self {
        Self { source, action, data: InputData::Dual(Vector2::new(x, y)) }
    }
}
