//! Spatial query results and the query trait agents aim with.

use loco_core::na::Vector3;
use loco_core::{EntityId, Layer, SourceId};

/// Result of one aiming query for one input source.
///
/// Produced by the host's raycaster (straight ray, parabola, whatever the
/// pointer uses); the engine never casts rays itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QueryResult {
    /// Where the query ended: the hit point, or the far end of the curve.
    pub endpoint: Vector3<f32>,

    /// The entity that was hit, if any.
    pub hit_entity: Option<EntityId>,

    /// Surface normal at the hit point.
    pub surface_normal: Vector3<f32>,

    /// Layer of the hit surface, if the hit entity has one.
    pub layer: Option<Layer>,

    /// Length of the query path up to the hit, for guide rendering.
    pub partial_path_length: f32,
}

impl QueryResult {
    /// A hit on `entity` at `endpoint` with an upward normal.
    pub fn hit(entity: EntityId, endpoint: Vector3<f32>, layer: Layer) -> Self {
        Self {
            endpoint,
            hit_entity: Some(entity),
            surface_normal: Vector3::y(),
            layer: Some(layer),
            partial_path_length: 0.0,
        }
    }

    /// A query that hit nothing.
    pub fn miss(endpoint: Vector3<f32>) -> Self {
        Self {
            endpoint,
            hit_entity: None,
            surface_normal: Vector3::y(),
            layer: None,
            partial_path_length: 0.0,
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.surface_normal = normal;
        self
    }

    pub fn with_path_length(mut self, length: f32) -> Self {
        self.partial_path_length = length;
        self
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit_entity.is_some()
    }
}

/// Supplies the latest aiming result for an input source.
///
/// Called once per engine step for every agent that is targeting.  Hosts
/// that raycast on another thread marshal their latest result here.
pub trait SpatialQuery {
    fn query(&mut self, source: SourceId) -> Option<QueryResult>;
}

/// A [`SpatialQuery`] that always returns the last result it was given.
///
/// Lets hosts push results instead of being polled.
#[derive(Clone, Debug, Default)]
pub struct LatchedQuery {
    pub latest: Option<QueryResult>,
}

impl LatchedQuery {
    pub fn new(latest: Option<QueryResult>) -> Self {
        Self { latest }
    }
}

impl SpatialQuery for LatchedQuery {
    fn query(&mut self, _source: SourceId) -> Option<QueryResult> {
        self.latest
    }
}

impl<F> SpatialQuery for F
where
    F: FnMut(SourceId) -> Option<QueryResult>,
{
    fn query(&mut self, source: SourceId) -> Option<QueryResult> {
        self(source)
    }
}
