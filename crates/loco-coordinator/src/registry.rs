//! Provider registry and per-group activation bookkeeping.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};

use loco_core::{ProviderGroup, ProviderId};
use loco_provider::LocomotionProvider;

/// One registered provider.
pub struct ProviderSlot {
    pub provider: Box<dyn LocomotionProvider>,
    /// Concrete type, for enable-by-type.
    pub type_id:  TypeId,
    pub active:   bool,
}

/// Every provider the coordinator owns, in registration order.
///
/// Activation state lives here twice: the `active` flag on each slot, and
/// the set of active providers per group.  Both are only ever changed
/// together through [`set_active`][Self::set_active].
#[derive(Default)]
pub struct ProviderRegistry {
    slots:           Vec<ProviderSlot>,
    active_by_group: BTreeMap<ProviderGroup, BTreeSet<ProviderId>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inactive provider and return its id.
    pub fn push(&mut self, provider: Box<dyn LocomotionProvider>, type_id: TypeId) -> ProviderId {
        let id = ProviderId(self.slots.len() as u32);
        self.slots.push(ProviderSlot { provider, type_id, active: false });
        id
    }

    #[inline]
    pub fn get(&self, id: ProviderId) -> Option<&ProviderSlot> {
        self.slots.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: ProviderId) -> Option<&mut ProviderSlot> {
        self.slots.get_mut(id.index())
    }

    pub fn is_active(&self, id: ProviderId) -> bool {
        self.get(id).is_some_and(|s| s.active)
    }

    /// Flip the active flag and keep the group sets in step.
    ///
    /// Returns `false` if `id` is unknown or already in that state.
    pub fn set_active(&mut self, id: ProviderId, active: bool) -> bool {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return false;
        };
        if slot.active == active {
            return false;
        }
        slot.active = active;
        if let Some(group) = slot.provider.group() {
            let members = self.active_by_group.entry(group).or_default();
            if active {
                members.insert(id);
            } else {
                members.remove(&id);
            }
        }
        true
    }

    /// Active providers in `group`, ascending by id.
    pub fn active_in_group(&self, group: ProviderGroup) -> Vec<ProviderId> {
        self.active_by_group
            .get(&group)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All active providers in registration order.
    pub fn active(&self) -> Vec<ProviderId> {
        self.ids().filter(|&id| self.is_active(id)).collect()
    }

    pub fn first_of_type(&self, type_id: TypeId) -> Option<ProviderId> {
        self.ids().find(|&id| self.slots[id.index()].type_id == type_id)
    }

    pub fn all_of_type(&self, type_id: TypeId) -> Vec<ProviderId> {
        self.ids().filter(|&id| self.slots[id.index()].type_id == type_id).collect()
    }

    pub fn first_of_kind(&self, kind: &str) -> Option<ProviderId> {
        self.ids().find(|&id| self.slots[id.index()].provider.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ProviderId> + '_ {
        (0..self.slots.len() as u32).map(ProviderId)
    }
}
