//! Overlap queries

use crate::body::RigidBodyHandle;
use crate::collider::{ColliderHandle, ColliderShape};
use crate::layers::{CollisionGroups, CollisionLayer};
use glam::Vec2;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Box probe placed relative to a body to detect ground underneath it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundProbe {
    /// Probe centre relative to the body centre
    pub offset: Vec2,
    /// Probe half-extents
    pub half_extents: Vec2,
    /// Which colliders count as ground
    pub groups: CollisionGroups,
}

impl GroundProbe {
    /// A thin probe just below a box of the given half-extents
    pub fn below(body_half_extents: Vec2, depth: f32) -> Self {
        Self {
            offset: Vec2::new(0.0, -body_half_extents.y),
            half_extents: Vec2::new(body_half_extents.x * 0.9, depth.max(0.01)),
            groups: CollisionGroups::query(&[CollisionLayer::WORLD]),
        }
    }
}

/// Read-only query interface over the world
pub(crate) struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
}

impl<'a> PhysicsQuery<'a> {
    /// All solid colliders overlapping `shape` at `position`
    pub(crate) fn overlap_shape(
        &self,
        shape: &ColliderShape,
        position: Vec2,
        groups: CollisionGroups,
        exclude_body: Option<RigidBodyHandle>,
    ) -> Vec<ColliderHandle> {
        let rapier_shape = shape.to_rapier();
        let pos = rapier::Isometry::translation(position.x, position.y);

        let mut filter = rapier::QueryFilter::new()
            .groups(groups.to_rapier())
            .exclude_sensors();
        if let Some(body) = exclude_body {
            filter = filter.exclude_rigid_body(body.0);
        }

        let mut results = Vec::new();
        self.query_pipeline.intersections_with_shape(
            self.bodies,
            self.colliders,
            &pos,
            rapier_shape.as_ref(),
            filter,
            |handle| {
                results.push(ColliderHandle(handle));
                true
            },
        );
        results.sort_by_key(|h| h.sort_key());
        results
    }

    /// First collider (sensor or solid) containing `point`
    pub(crate) fn point_inside(&self, point: Vec2, groups: CollisionGroups) -> Option<ColliderHandle> {
        let point = rapier::Point::new(point.x, point.y);
        let filter = rapier::QueryFilter::new().groups(groups.to_rapier());

        let mut result = None;
        self.query_pipeline.intersections_with_point(
            self.bodies,
            self.colliders,
            &point,
            filter,
            |handle| {
                result = Some(ColliderHandle(handle));
                false
            },
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_below() {
        let probe = GroundProbe::below(Vec2::new(0.4, 0.9), 0.1);
        assert_eq!(probe.offset, Vec2::new(0.0, -0.9));
        assert!(probe.half_extents.x < 0.4);
        assert_eq!(probe.half_extents.y, 0.1);
    }
}
