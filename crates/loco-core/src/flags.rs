//! Global enable flags, startup policy, and provider groups.

use serde::{Deserialize, Serialize};

/// The three independently switchable locomotion domains.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Domain {
    /// Master switch.  Gates both other domains.
    Locomotion,
    /// Free (continuous) movement.
    Movement,
    /// Teleportation.
    Teleportation,
}

/// Whether something switches itself on at the first opportunity or waits to
/// be enabled explicitly.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartupPolicy {
    AutoStart,
    #[default]
    ManualStart,
}

impl StartupPolicy {
    #[inline]
    pub fn is_auto(self) -> bool {
        matches!(self, StartupPolicy::AutoStart)
    }
}

/// Mutual-exclusion group of a provider.
///
/// At most one provider per group is active at a time.  Providers with no
/// group are exempt.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderGroup {
    Free,
    Teleport,
}

impl ProviderGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderGroup::Free     => "free",
            ProviderGroup::Teleport => "teleport",
        }
    }
}

impl std::fmt::Display for ProviderGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three global flags.
///
/// The raw fields store what was last set; the accessors apply the master
/// switch, so `movement()` is `locomotion && movement`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EnableFlags {
    locomotion:    bool,
    movement:      bool,
    teleportation: bool,
}

impl EnableFlags {
    pub fn new(locomotion: bool, movement: bool, teleportation: bool) -> Self {
        Self { locomotion, movement, teleportation }
    }

    /// Pure state mutation; no other side effects.
    pub fn set(&mut self, domain: Domain, value: bool) {
        match domain {
            Domain::Locomotion    => self.locomotion = value,
            Domain::Movement      => self.movement = value,
            Domain::Teleportation => self.teleportation = value,
        }
    }

    #[inline]
    pub fn locomotion(&self) -> bool {
        self.locomotion
    }

    #[inline]
    pub fn movement(&self) -> bool {
        self.locomotion && self.movement
    }

    #[inline]
    pub fn teleportation(&self) -> bool {
        self.locomotion && self.teleportation
    }

    /// Effective value for `domain`.
    pub fn get(&self, domain: Domain) -> bool {
        match domain {
            Domain::Locomotion    => self.locomotion(),
            Domain::Movement      => self.movement(),
            Domain::Teleportation => self.teleportation(),
        }
    }
}

impl Default for EnableFlags {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}
