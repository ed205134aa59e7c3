//! Fluent builder for constructing a [`Locomotion`].

use loco_core::{
    LocomotionProfile, LocomotionTarget, ServiceConfig, ValidationConfig, ZoneConfig,
};
use loco_provider::{
    DashTeleportProvider, InstantTeleportProvider, LocomotionListener, LocomotionProvider,
    SmoothProvider, TargetAgent,
};
use loco_validation::{Anchor, ValidationPolicy};

use crate::{Locomotion, LocomotionResult};

type Registration = Box<dyn FnOnce(&mut Locomotion) -> LocomotionResult<()>>;

/// Fluent builder for [`Locomotion`].
///
/// # Required inputs
///
/// - `T: LocomotionTarget` — the base target pose updates go to
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                  |
/// |----------------------|------------------------------------------|
/// | `.service(c)`        | `ServiceConfig::default()`               |
/// | `.validation(c)`     | No policy: agents never answer           |
/// | `.profile(p)`        | Nothing registered                       |
/// | `.provider(p)`       | —                                        |
/// | `.agent(a)`          | —                                        |
/// | `.listener(l)`       | —                                        |
/// | `.anchor(a)`         | —                                        |
/// | `.zone(z)`           | —                                        |
///
/// Providers, agents and listeners are registered in the order the builder
/// methods were called, which is also their broadcast order.
///
/// # Example
///
/// ```rust,ignore
/// let mut loco = LocomotionBuilder::new(RigTarget::default())
///     .profile(&LocomotionProfile::load(path)?)
///     .agent(PointerAgent::new(SourceId(0), query))
///     .build()?;
/// loco.tick(1.0 / 90.0);
/// ```
pub struct LocomotionBuilder<T: LocomotionTarget + 'static> {
    target:        T,
    service:       ServiceConfig,
    validation:    Option<ValidationConfig>,
    anchors:       Vec<Anchor>,
    zones:         Vec<ZoneConfig>,
    registrations: Vec<Registration>,
}

impl<T: LocomotionTarget + 'static> LocomotionBuilder<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            service:       ServiceConfig::default(),
            validation:    None,
            anchors:       Vec::new(),
            zones:         Vec::new(),
            registrations: Vec::new(),
        }
    }

    pub fn service(mut self, config: ServiceConfig) -> Self {
        self.service = config;
        self
    }

    /// Install a validation policy built from `config`.
    pub fn validation(mut self, config: ValidationConfig) -> Self {
        self.validation = Some(config);
        self
    }

    /// Take the service and validation settings from `profile`, queue its
    /// providers (instant, then dash, then smooth) and record its zones.
    pub fn profile(mut self, profile: &LocomotionProfile) -> Self {
        self.service = profile.service.clone();
        self.validation = Some(profile.validation.clone());
        self.zones.extend(profile.zones.iter().cloned());

        if let Some(config) = profile.instant_teleport.clone() {
            self = self.provider(InstantTeleportProvider::instant(config));
        }
        if let Some(config) = profile.dash_teleport.clone() {
            self.registrations.push(Box::new(move |loco| {
                loco.register_provider(DashTeleportProvider::dash(config)?)?;
                Ok(())
            }));
        }
        if let Some(config) = profile.smooth.clone() {
            self = self.provider(SmoothProvider::new(config));
        }
        self
    }

    pub fn provider<P: LocomotionProvider>(mut self, provider: P) -> Self {
        self.registrations.push(Box::new(move |loco| {
            loco.register_provider(provider)?;
            Ok(())
        }));
        self
    }

    pub fn agent<A: TargetAgent>(mut self, agent: A) -> Self {
        self.registrations.push(Box::new(move |loco| {
            loco.register_agent(agent);
            Ok(())
        }));
        self
    }

    pub fn listener<L: LocomotionListener + 'static>(mut self, listener: L) -> Self {
        self.registrations.push(Box::new(move |loco| {
            loco.register_listener(listener);
            Ok(())
        }));
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    pub fn zone(mut self, zone: ZoneConfig) -> Self {
        self.zones.push(zone);
        self
    }

    /// Register everything in call order and return the coordinator.
    ///
    /// Fails on the first registration that fails: a provider whose group
    /// contradicts its kind, an invalid dash duration, or a second anchor on
    /// the same entity.
    pub fn build(self) -> LocomotionResult<Locomotion> {
        let mut loco = Locomotion::new(&self.service, self.target);

        if let Some(config) = self.validation {
            loco.set_validation_policy(ValidationPolicy::new(config));
        }
        for anchor in self.anchors {
            loco.add_anchor(anchor)?;
        }
        for zone in self.zones {
            loco.add_zone(zone);
        }
        for register in self.registrations {
            register(&mut loco)?;
        }

        tracing::debug!(
            providers = loco.providers.len(),
            agents = loco.agents.len(),
            listeners = loco.listeners.len(),
            anchors = loco.anchors.len(),
            "locomotion built"
        );
        Ok(loco)
    }
}
