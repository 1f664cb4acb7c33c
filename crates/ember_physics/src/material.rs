//! Surface materials

use serde::{Deserialize, Serialize};

/// Friction, restitution and density of a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0 = frictionless)
    pub friction: f32,
    /// Bounciness (0 = no bounce)
    pub restitution: f32,
    /// Density used for mass computation
    pub density: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }
}

impl PhysicsMaterial {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
            ..Default::default()
        }
    }

    /// No friction. Characters use this so they slide along walls instead
    /// of sticking to them while pushing sideways.
    pub fn frictionless() -> Self {
        Self {
            friction: 0.0,
            ..Default::default()
        }
    }

    /// Slippery ice platforms
    pub fn ice() -> Self {
        Self {
            friction: 0.02,
            restitution: 0.0,
            density: 0.9,
        }
    }

    /// Regular stone platforms
    pub fn stone() -> Self {
        Self {
            friction: 0.7,
            restitution: 0.0,
            density: 2.5,
        }
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set density
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density.max(0.001);
        self
    }
}
