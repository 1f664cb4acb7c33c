//! Collider types

use crate::layers::CollisionGroups;
use crate::material::PhysicsMaterial;
use glam::Vec2;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::ColliderHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ColliderHandle {
        self.0
    }

    /// Stable ordering key (arena index, generation)
    pub fn sort_key(&self) -> (u32, u32) {
        self.0.into_raw_parts()
    }
}

/// Collision shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Circle with radius
    Ball { radius: f32 },
    /// Box with half-extents
    Cuboid { half_extents: Vec2 },
    /// Capsule aligned along Y axis
    CapsuleY { half_height: f32, radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Cuboid {
            half_extents: Vec2::splat(0.5),
        }
    }
}

impl ColliderShape {
    /// Create a circle shape
    pub fn ball(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32) -> Self {
        Self::Cuboid {
            half_extents: Vec2::new(hx, hy),
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY {
            half_height,
            radius,
        }
    }

    /// Half extents of the shape's bounding box
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Self::Ball { radius } => Vec2::splat(*radius),
            Self::Cuboid { half_extents } => *half_extents,
            Self::CapsuleY {
                half_height,
                radius,
            } => Vec2::new(*radius, half_height + radius),
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Ball { radius } => rapier::SharedShape::ball(*radius),
            Self::Cuboid { half_extents } => {
                rapier::SharedShape::cuboid(half_extents.x, half_extents.y)
            }
            Self::CapsuleY {
                half_height,
                radius,
            } => rapier::SharedShape::capsule_y(*half_height, *radius),
        }
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Offset from the parent body, or world position for parentless colliders
    pub position_offset: Vec2,
    /// Sensors report overlaps but produce no contact response
    pub is_sensor: bool,
    /// Physics material
    pub material: PhysicsMaterial,
    /// Collision groups
    pub collision_groups: CollisionGroups,
    /// Report started/stopped events for this collider
    pub collision_events: bool,
    /// User data (entity bits)
    pub user_data: u128,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            position_offset: Vec2::ZERO,
            is_sensor: false,
            material: PhysicsMaterial::default(),
            collision_groups: CollisionGroups::ALL,
            collision_events: true,
            user_data: 0,
        }
    }
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Create a sensor
    pub fn sensor(shape: ColliderShape) -> Self {
        Self {
            shape,
            is_sensor: true,
            ..Default::default()
        }
    }

    /// Set position offset
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.position_offset = Vec2::new(x, y);
        self
    }

    /// Set material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set collision groups
    pub fn with_collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set user data
    pub fn with_user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }

    /// Enable or disable collision event reporting
    pub fn with_collision_events(mut self, enabled: bool) -> Self {
        self.collision_events = enabled;
        self
    }

    /// Build a Rapier collider builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::ColliderBuilder {
        let mut builder = rapier::ColliderBuilder::new(self.shape.to_rapier())
            .translation(rapier::Vector::new(
                self.position_offset.x,
                self.position_offset.y,
            ))
            .sensor(self.is_sensor)
            .friction(self.material.friction)
            .restitution(self.material.restitution)
            .density(self.material.density)
            .collision_groups(self.collision_groups.to_rapier())
            .user_data(self.user_data);

        if self.collision_events {
            builder = builder.active_events(rapier::ActiveEvents::COLLISION_EVENTS);
        }

        if self.is_sensor {
            // Sensors must also see kinematic and fixed partners
            builder = builder.active_collision_types(rapier::ActiveCollisionTypes::all());
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_extents() {
        assert_eq!(ColliderShape::ball(0.5).half_extents(), Vec2::splat(0.5));
        assert_eq!(
            ColliderShape::capsule(0.5, 0.25).half_extents(),
            Vec2::new(0.25, 0.75)
        );
    }

    #[test]
    fn test_sensor_desc() {
        let desc = ColliderDesc::sensor(ColliderShape::cuboid(1.0, 1.0)).with_user_data(42);
        assert!(desc.is_sensor);
        assert!(desc.collision_events);
        assert_eq!(desc.user_data, 42);
    }
}
