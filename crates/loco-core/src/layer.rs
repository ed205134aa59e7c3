//! Surface layers and layer masks.

use serde::{Deserialize, Serialize};

/// A surface layer index in `0..32`, as tagged on hit entities.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Layer(pub u8);

/// A 32-bit set of layers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL:  LayerMask = LayerMask(u32::MAX);

    /// Mask containing exactly the given layers.
    pub fn of(layers: &[Layer]) -> Self {
        LayerMask(layers.iter().fold(0, |bits, l| bits | Self::bit(*l)))
    }

    /// `true` if `layer` is in the mask.  Layers outside `0..32` never match.
    #[inline]
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & Self::bit(layer) != 0
    }

    #[inline]
    fn bit(layer: Layer) -> u32 {
        1u32.checked_shl(layer.0 as u32).unwrap_or(0)
    }
}
