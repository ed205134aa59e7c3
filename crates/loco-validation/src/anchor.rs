//! Teleport anchors — fixed, named destinations.

use std::collections::HashMap;
use std::fmt;

use loco_core::math::normalize_yaw;
use loco_core::na::Vector3;
use loco_core::{AnchorId, EntityId};

use crate::{AnchorError, AnchorResult};

type TargetedCallback = Box<dyn FnMut(bool)>;
type ActivatedCallback = Box<dyn FnMut()>;

/// A fixed teleport destination bound to a scene entity.
///
/// Usable as a destination only while enabled.  Landing on an anchor puts
/// the target exactly at [`position`][Self::position]; the yaw is replaced
/// by [`target_yaw`][Self::target_yaw] only when the anchor overrides
/// orientation.
pub struct Anchor {
    pub name: String,

    entity:               EntityId,
    enabled:              bool,
    position:             Vector3<f32>,
    normal:               Vector3<f32>,
    override_orientation: bool,
    target_yaw:           f32,
    targeted:             bool,

    on_targeted:  Vec<TargetedCallback>,
    on_activated: Vec<ActivatedCallback>,
}

impl Anchor {
    /// An enabled anchor at `position` with an upward normal and no
    /// orientation override.
    pub fn new(name: impl Into<String>, entity: EntityId, position: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            entity,
            enabled: true,
            position,
            normal: Vector3::y(),
            override_orientation: false,
            target_yaw: 0.0,
            targeted: false,
            on_targeted: Vec::new(),
            on_activated: Vec::new(),
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal;
        self
    }

    /// Face `yaw` degrees after landing here, whatever was aimed.
    pub fn with_orientation(mut self, yaw: f32) -> Self {
        self.override_orientation = true;
        self.target_yaw = normalize_yaw(yaw);
        self
    }

    /// Record the anchor's yaw without overriding the aimed one.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.target_yaw = normalize_yaw(yaw);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    #[inline]
    pub fn overrides_orientation(&self) -> bool {
        self.override_orientation
    }

    #[inline]
    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    #[inline]
    pub fn is_targeted(&self) -> bool {
        self.targeted
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Enable or disable the anchor.  A disabled anchor is never targeted.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.set_targeted(false);
        }
    }

    /// Update the targeted state.
    ///
    /// Observers fire only on an actual change.  Returns `true` if the state
    /// changed.
    pub fn set_targeted(&mut self, targeted: bool) -> bool {
        if self.targeted == targeted {
            return false;
        }
        self.targeted = targeted;
        for callback in &mut self.on_targeted {
            callback(targeted);
        }
        true
    }

    /// Fire the activation observers.
    pub fn activate(&mut self) {
        tracing::debug!(anchor = %self.name, "anchor activated");
        for callback in &mut self.on_activated {
            callback();
        }
    }

    // ── Observers ─────────────────────────────────────────────────────────

    /// Called with the new state whenever the targeted state changes.
    pub fn on_targeted_changed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.on_targeted.push(Box::new(callback));
    }

    /// Called whenever a completed teleport lands on this anchor.
    pub fn on_activated(&mut self, callback: impl FnMut() + 'static) {
        self.on_activated.push(Box::new(callback));
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anchor")
            .field("name", &self.name)
            .field("entity", &self.entity)
            .field("enabled", &self.enabled)
            .field("position", &self.position)
            .field("override_orientation", &self.override_orientation)
            .field("target_yaw", &self.target_yaw)
            .field("targeted", &self.targeted)
            .finish_non_exhaustive()
    }
}

// ── AnchorSet ─────────────────────────────────────────────────────────────────

/// All anchors in the scene, indexed by [`AnchorId`] and by entity.
#[derive(Debug, Default)]
pub struct AnchorSet {
    anchors:   Vec<Anchor>,
    by_entity: HashMap<EntityId, AnchorId>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor.  Each entity may declare at most one anchor.
    pub fn insert(&mut self, anchor: Anchor) -> AnchorResult<AnchorId> {
        if self.by_entity.contains_key(&anchor.entity) {
            return Err(AnchorError::DuplicateEntity(anchor.entity));
        }
        let id = AnchorId(self.anchors.len() as u32);
        self.by_entity.insert(anchor.entity, id);
        self.anchors.push(anchor);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.get_mut(id.index())
    }

    /// The anchor declared by `entity`, enabled or not.
    pub fn for_entity(&self, entity: EntityId) -> Option<AnchorId> {
        self.by_entity.get(&entity).copied()
    }

    /// Enable or disable the anchor `id`.
    pub fn set_enabled(&mut self, id: AnchorId, enabled: bool) -> AnchorResult<()> {
        let anchor = self.get_mut(id).ok_or(AnchorError::UnknownAnchor(id))?;
        anchor.set_enabled(enabled);
        Ok(())
    }

    /// Set the targeted state of `id`.  Unknown ids are ignored.
    pub fn set_targeted(&mut self, id: AnchorId, targeted: bool) -> bool {
        self.get_mut(id).is_some_and(|a| a.set_targeted(targeted))
    }

    /// Activate the anchor a completed teleport landed on, if any.
    pub fn notify_completed(&mut self, anchor: Option<AnchorId>) {
        if let Some(a) = anchor.and_then(|id| self.get_mut(id)) {
            a.activate();
        }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors
            .iter()
            .enumerate()
            .map(|(i, a)| (AnchorId(i as u32), a))
    }
}
