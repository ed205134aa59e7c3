//! Configuration profiles and the TOML profile loader.
//!
//! # File format
//!
//! ```toml
//! [service]
//! locomotion_startup    = "auto-start"
//! movement_startup      = "auto-start"
//! teleportation_startup = "auto-start"
//! teleport_cooldown     = 1.0
//!
//! [validation]
//! anchors_only           = false
//! valid_layers           = 1
//! invalid_layers         = 4
//! up_direction_threshold = 0.2
//! max_distance           = 10.0
//! max_height_delta       = 10.0
//!
//! [dash_teleport]
//! name          = "dash"
//! startup       = "auto-start"
//! action        = 1
//! dash_duration = 0.25
//!
//! [smooth]
//! name    = "smooth"
//! startup = "auto-start"
//! action  = 2
//!
//! [[zones]]
//! name                  = "lobby"
//! teleportation_enabled = false
//! ```
//!
//! Every field has a default, so any section or key may be omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, EnableFlags, InputAction, LayerMask, StartupPolicy};

/// Longest cooldown a profile may configure, in seconds.
pub const MAX_TELEPORT_COOLDOWN: f32 = 10.0;

// ── ServiceConfig ─────────────────────────────────────────────────────────────

/// Coordinator-wide settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Initial state of the master switch.
    pub locomotion_startup: StartupPolicy,

    /// Initial state of free movement.
    pub movement_startup: StartupPolicy,

    /// Initial state of teleportation.
    pub teleportation_startup: StartupPolicy,

    /// Seconds after a completed teleport before another may be requested.
    pub teleport_cooldown: f32,
}

impl ServiceConfig {
    /// Flags the coordinator starts with.
    pub fn initial_flags(&self) -> EnableFlags {
        EnableFlags::new(
            self.locomotion_startup.is_auto(),
            self.movement_startup.is_auto(),
            self.teleportation_startup.is_auto(),
        )
    }

    /// Cooldown clamped to `[0, MAX_TELEPORT_COOLDOWN]`.
    pub fn cooldown_secs(&self) -> f32 {
        if self.teleport_cooldown.is_nan() {
            return 0.0;
        }
        self.teleport_cooldown.clamp(0.0, MAX_TELEPORT_COOLDOWN)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            locomotion_startup:    StartupPolicy::AutoStart,
            movement_startup:      StartupPolicy::AutoStart,
            teleportation_startup: StartupPolicy::AutoStart,
            teleport_cooldown:     1.0,
        }
    }
}

// ── Provider profiles ─────────────────────────────────────────────────────────

/// Settings shared by every provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Display name used in logs.
    pub name: String,

    /// Whether the provider activates on registration.
    pub startup: StartupPolicy,

    /// The input action that drives the provider.
    pub action: InputAction,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, startup: StartupPolicy, action: InputAction) -> Self {
        Self { name: name.into(), startup, action }
    }
}

/// Settings for teleport providers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    #[serde(flatten)]
    pub provider: ProviderConfig,

    /// Analog value an axis must exceed to count as pressed.
    pub input_threshold: f32,

    /// Half-width in degrees of the thumbstick cone that requests a teleport.
    pub teleport_activation_angle: f32,

    /// Degrees added to the raw thumbstick angle so that 0 means "forward".
    pub angle_offset: f32,

    /// Width in degrees of the sideways cones that trigger a quick rotation.
    pub rotate_activation_angle: f32,

    /// Degrees turned per quick rotation.
    pub rotation_amount: f32,
}

impl TeleportConfig {
    pub fn new(provider: ProviderConfig) -> Self {
        Self { provider, ..Self::default() }
    }
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            provider:                  ProviderConfig::default(),
            input_threshold:           0.5,
            teleport_activation_angle: 45.0,
            angle_offset:              0.0,
            rotate_activation_angle:   22.5,
            rotation_amount:           90.0,
        }
    }
}

/// Settings for the animated dash teleport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    #[serde(flatten)]
    pub teleport: TeleportConfig,

    /// Seconds the dash takes from start to target.
    pub dash_duration: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self { teleport: TeleportConfig::default(), dash_duration: 0.25 }
    }
}

/// Settings for smooth free movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothConfig {
    #[serde(flatten)]
    pub provider: ProviderConfig,

    /// Walking speed in metres per second.  Minimum 1.
    pub speed: f32,

    /// Speed while `run_action` is held.  Minimum 1.
    pub running_speed: f32,

    /// Digital action that switches to running speed while held.
    pub run_action: Option<InputAction>,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            provider:      ProviderConfig::default(),
            speed:         3.0,
            running_speed: 5.0,
            run_action:    None,
        }
    }
}

// ── ValidationConfig ──────────────────────────────────────────────────────────

/// Settings for the teleport validation policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Only enabled anchors are acceptable destinations.
    pub anchors_only: bool,

    /// Surfaces on these layers may be teleported onto.
    pub valid_layers: LayerMask,

    /// Surfaces on these layers are explicitly rejected.
    pub invalid_layers: LayerMask,

    /// Minimum `dot(normal, up)` for a free-form surface to count as floor.
    pub up_direction_threshold: f32,

    /// Maximum planar distance from the viewer, in metres.
    pub max_distance: f32,

    /// Maximum height difference from the viewer, in metres.
    pub max_height_delta: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            anchors_only:           false,
            valid_layers:           LayerMask(1),
            invalid_layers:         LayerMask::NONE,
            up_direction_threshold: 0.2,
            max_distance:           10.0,
            max_height_delta:       10.0,
        }
    }
}

// ── ZoneConfig ────────────────────────────────────────────────────────────────

/// A region that reconfigures locomotion when the target enters it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub name: String,

    pub locomotion_enabled: bool,

    pub movement_enabled: bool,

    pub teleportation_enabled: bool,

    /// Kind label of the free provider to enable on entry, if any.
    pub free_provider: Option<String>,

    /// Kind label of the teleport provider to enable on entry, if any.
    pub teleport_provider: Option<String>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            name:                  String::new(),
            locomotion_enabled:    true,
            movement_enabled:      true,
            teleportation_enabled: true,
            free_provider:         None,
            teleport_provider:     None,
        }
    }
}

// ── LocomotionProfile ─────────────────────────────────────────────────────────

/// A complete profile as loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionProfile {
    pub service: ServiceConfig,

    pub validation: ValidationConfig,

    pub instant_teleport: Option<TeleportConfig>,

    pub dash_teleport: Option<DashConfig>,

    pub smooth: Option<SmoothConfig>,

    pub zones: Vec<ZoneConfig>,
}

impl LocomotionProfile {
    /// Parse a profile from TOML text.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let profile: LocomotionProfile = toml::from_str(text)?;
        profile.check()?;
        Ok(profile)
    }

    /// Read and parse a profile file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values no component could work with.
    fn check(&self) -> CoreResult<()> {
        if let Some(dash) = &self.dash_teleport {
            if !(dash.dash_duration > 0.0) {
                return Err(CoreError::Config(format!(
                    "dash_duration must be positive, got {}",
                    dash.dash_duration
                )));
            }
        }
        if self.service.teleport_cooldown > MAX_TELEPORT_COOLDOWN {
            tracing::warn!(
                requested = self.service.teleport_cooldown,
                max = MAX_TELEPORT_COOLDOWN,
                "teleport cooldown above maximum; it will be clamped"
            );
        }
        let mut seen = std::collections::HashSet::new();
        for zone in &self.zones {
            if !zone.name.is_empty() && !seen.insert(zone.name.as_str()) {
                return Err(CoreError::Config(format!("duplicate zone name {:?}", zone.name)));
            }
        }
        Ok(())
    }

    /// Look up a zone by name.
    pub fn zone(&self, name: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.name == name)
    }
}
