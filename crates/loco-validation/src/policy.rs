//! The teleport validation policy.

use loco_core::math::{height_delta, planar_distance, up};
use loco_core::na::Vector3;
use loco_core::{AnchorId, ValidationConfig};

use crate::{Anchor, AnchorSet, QueryResult, ValidationResult};

/// Classifies spatial query results as teleport destinations.
///
/// Stateless apart from its configuration: the same query, anchor and viewer
/// always give the same answer.
///
/// The checks run in a fixed order and the first one that decides wins:
///
/// 1. planar distance or height delta from the viewer out of range → `Invalid`
/// 2. anchors-only mode with no enabled anchor → `Invalid`
/// 3. valid layer → `Anchor` if an enabled anchor is present, otherwise
///    `Valid` when the surface faces up steeply enough, else `Invalid`
/// 4. invalid layer → `Invalid`
/// 5. anything else → `None`
#[derive(Clone, Debug, Default)]
pub struct ValidationPolicy {
    config: ValidationConfig,
}

impl ValidationPolicy {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Switch anchors-only mode at runtime.
    pub fn set_anchors_only(&mut self, anchors_only: bool) {
        self.config.anchors_only = anchors_only;
    }

    /// Classify `query` as seen from `viewer`.
    ///
    /// `anchor` is the anchor declared by the hit entity, if any.  Disabled
    /// anchors are treated as absent.
    pub fn validate(
        &self,
        query:  &QueryResult,
        anchor: Option<&Anchor>,
        viewer: &Vector3<f32>,
    ) -> ValidationResult {
        let cfg = &self.config;

        if planar_distance(&query.endpoint, viewer) > cfg.max_distance
            || height_delta(&query.endpoint, viewer) > cfg.max_height_delta
        {
            return ValidationResult::Invalid;
        }

        let anchor = anchor.filter(|a| a.is_enabled());
        if cfg.anchors_only && anchor.is_none() {
            return ValidationResult::Invalid;
        }

        let Some(layer) = query.layer else {
            return ValidationResult::None;
        };

        if cfg.valid_layers.contains(layer) {
            if anchor.is_some() {
                return ValidationResult::Anchor;
            }
            let alignment = query
                .surface_normal
                .try_normalize(f32::EPSILON)
                .map_or(0.0, |n| n.dot(&up()));
            return if alignment > cfg.up_direction_threshold {
                ValidationResult::Valid
            } else {
                ValidationResult::Invalid
            };
        }

        if cfg.invalid_layers.contains(layer) {
            return ValidationResult::Invalid;
        }

        ValidationResult::None
    }

    /// Like [`validate`][Self::validate], resolving the anchor from the hit
    /// entity through `anchors`.
    ///
    /// The returned anchor id is `Some` only when the result is `Anchor`.
    pub fn classify(
        &self,
        query:   &QueryResult,
        anchors: &AnchorSet,
        viewer:  &Vector3<f32>,
    ) -> (ValidationResult, Option<AnchorId>) {
        let id = query.hit_entity.and_then(|e| anchors.for_entity(e));
        let anchor = id.and_then(|id| anchors.get(id));
        let result = self.validate(query, anchor, viewer);
        match result {
            ValidationResult::Anchor => (result, id),
            _ => (result, None),
        }
    }
}
