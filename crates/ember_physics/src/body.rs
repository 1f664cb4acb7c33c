//! Rigid body types

use crate::collider::ColliderHandle;
use glam::Vec2;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

impl RigidBodyHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::RigidBodyHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// A body together with its primary collider
///
/// This is what gameplay components hold on to. It is only a pair of
/// handles; the world owns the actual body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyRef {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RigidBodyType {
    /// Never moves
    Fixed,
    /// Fully simulated
    #[default]
    Dynamic,
    /// Moved by setting its next position
    KinematicPositionBased,
}

impl From<RigidBodyType> for rapier::RigidBodyType {
    fn from(t: RigidBodyType) -> Self {
        match t {
            RigidBodyType::Fixed => rapier::RigidBodyType::Fixed,
            RigidBodyType::Dynamic => rapier::RigidBodyType::Dynamic,
            RigidBodyType::KinematicPositionBased => rapier::RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    /// Type of rigid body
    pub body_type: RigidBodyType,
    /// Initial position
    pub position: Vec2,
    /// Initial linear velocity
    pub linear_velocity: Vec2,
    /// Gravity scale (0 = no gravity)
    pub gravity_scale: f32,
    /// Linear damping
    pub linear_damping: f32,
    /// Prevent the body from rotating (characters)
    pub lock_rotation: bool,
    /// Enable continuous collision detection
    pub ccd_enabled: bool,
    /// Can this body sleep when inactive
    pub can_sleep: bool,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Vec2::ZERO,
            linear_velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            lock_rotation: false,
            ccd_enabled: false,
            can_sleep: true,
        }
    }
}

impl RigidBodyDesc {
    /// Create a fixed body description
    pub fn fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            ..Default::default()
        }
    }

    /// Create a dynamic body description
    pub fn dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            ..Default::default()
        }
    }

    /// Create a kinematic body description
    pub fn kinematic() -> Self {
        Self {
            body_type: RigidBodyType::KinematicPositionBased,
            gravity_scale: 0.0,
            ..Default::default()
        }
    }

    /// A dynamic, non-rotating, never-sleeping body for players and enemies
    pub fn character() -> Self {
        Self {
            lock_rotation: true,
            can_sleep: false,
            ..Self::dynamic()
        }
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Set linear velocity
    pub fn with_linear_velocity(mut self, x: f32, y: f32) -> Self {
        self.linear_velocity = Vec2::new(x, y);
        self
    }

    /// Set gravity scale
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set linear damping
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Lock rotation
    pub fn with_locked_rotation(mut self) -> Self {
        self.lock_rotation = true;
        self
    }

    /// Enable CCD
    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd_enabled = enabled;
        self
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        let mut builder = rapier::RigidBodyBuilder::new(self.body_type.into())
            .translation(rapier::Vector::new(self.position.x, self.position.y))
            .linvel(rapier::Vector::new(
                self.linear_velocity.x,
                self.linear_velocity.y,
            ))
            .gravity_scale(self.gravity_scale)
            .linear_damping(self.linear_damping)
            .ccd_enabled(self.ccd_enabled)
            .can_sleep(self.can_sleep);

        if self.lock_rotation {
            builder = builder.lock_rotations();
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_preset() {
        let desc = RigidBodyDesc::character().with_position(1.0, 2.0);
        assert_eq!(desc.body_type, RigidBodyType::Dynamic);
        assert!(desc.lock_rotation);
        assert!(!desc.can_sleep);
        assert_eq!(desc.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_kinematic_ignores_gravity() {
        assert_eq!(RigidBodyDesc::kinematic().gravity_scale, 0.0);
    }
}
