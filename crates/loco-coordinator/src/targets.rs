//! The movable target and its optional override.

use loco_core::LocomotionTarget;

/// The base target plus at most one installed override.
///
/// While an override is installed every pose update goes to it and the base
/// target is left untouched.
pub(crate) struct Targets {
    base:    Box<dyn LocomotionTarget>,
    overlay: Option<Box<dyn LocomotionTarget>>,
}

impl Targets {
    pub fn new(base: Box<dyn LocomotionTarget>) -> Self {
        Self { base, overlay: None }
    }

    /// The target pose updates go to.
    pub fn active(&mut self) -> &mut dyn LocomotionTarget {
        match &mut self.overlay {
            Some(target) => target.as_mut(),
            None => self.base.as_mut(),
        }
    }

    pub fn active_ref(&self) -> &dyn LocomotionTarget {
        match &self.overlay {
            Some(target) => target.as_ref(),
            None => self.base.as_ref(),
        }
    }

    pub fn base(&self) -> &dyn LocomotionTarget {
        self.base.as_ref()
    }

    pub fn has_override(&self) -> bool {
        self.overlay.is_some()
    }

    /// Install `target`, handing it back if one is already installed.
    pub fn install(&mut self, target: Box<dyn LocomotionTarget>) -> Result<(), Box<dyn LocomotionTarget>> {
        if self.overlay.is_some() {
            return Err(target);
        }
        self.overlay = Some(target);
        Ok(())
    }

    pub fn remove(&mut self) -> Option<Box<dyn LocomotionTarget>> {
        self.overlay.take()
    }
}
