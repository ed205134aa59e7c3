//! Smooth (continuous) free movement.

use std::collections::BTreeSet;

use loco_core::{
    InputAction, InputData, InputEvent, Motion, ProviderGroup, SmoothConfig, SourceId,
    StartupPolicy,
};

use crate::{Intent, LocoContext, LocomotionListener, LocomotionProvider};

/// Slowest speed a smooth provider accepts, in metres per second.
pub const MIN_SPEED: f32 = 1.0;

/// Moves the target on the horizontal plane from a 2D axis.
///
/// Each dual-axis event on the configured action moves the target by
/// `direction * speed * delta_time` and raises `Moving`.  While the optional
/// run action is held on the same source, `running_speed` is used instead.
#[derive(Debug)]
pub struct SmoothProvider {
    config:  SmoothConfig,
    group:   Option<ProviderGroup>,
    running: BTreeSet<SourceId>,
}

impl SmoothProvider {
    /// Speeds below [`MIN_SPEED`] are raised to it and logged.
    pub fn new(mut config: SmoothConfig) -> Self {
        config.speed = clamp_speed(&config.provider.name, "speed", config.speed);
        config.running_speed = clamp_speed(&config.provider.name, "running_speed", config.running_speed);
        Self { config, group: Some(ProviderGroup::Free), running: BTreeSet::new() }
    }

    /// Put the provider into `group`, or exempt it from exclusivity.
    pub fn with_group(mut self, group: Option<ProviderGroup>) -> Self {
        self.group = group;
        self
    }

    #[inline]
    pub fn config(&self) -> &SmoothConfig {
        &self.config
    }

    /// `true` while the run action is held on `source`.
    pub fn is_running(&self, source: SourceId) -> bool {
        self.running.contains(&source)
    }
}

fn clamp_speed(provider: &str, field: &str, value: f32) -> f32 {
    if value >= MIN_SPEED {
        return value;
    }
    tracing::error!(provider, field, value, min = MIN_SPEED, "speed below minimum; clamped");
    MIN_SPEED
}

impl LocomotionListener for SmoothProvider {}

impl LocomotionProvider for SmoothProvider {
    fn name(&self) -> &str {
        &self.config.provider.name
    }

    fn kind(&self) -> &'static str {
        "smooth"
    }

    fn family(&self) -> ProviderGroup {
        ProviderGroup::Free
    }

    fn group(&self) -> Option<ProviderGroup> {
        self.group
    }

    fn action(&self) -> InputAction {
        self.config.provider.action
    }

    fn startup(&self) -> StartupPolicy {
        self.config.provider.startup
    }

    fn on_deactivated(&mut self, _ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        self.running.clear();
        vec![]
    }

    fn on_input(&mut self, input: &InputEvent, ctx: &mut LocoContext<'_>) -> Vec<Intent> {
        if self.config.run_action == Some(input.action) {
            match input.data {
                InputData::Down => {
                    self.running.insert(input.source);
                }
                InputData::Up => {
                    self.running.remove(&input.source);
                }
                _ => {}
            }
        }

        if input.action != self.config.provider.action || !ctx.flags.movement() {
            return vec![];
        }
        let InputData::Dual(direction) = input.data else {
            return vec![];
        };

        let speed = if self.is_running(input.source) {
            self.config.running_speed
        } else {
            self.config.speed
        };
        ctx.target.move_planar(direction, speed, ctx.delta_time);
        vec![Intent::Moved { source: input.source, motion: Motion { direction, speed } }]
    }
}
