//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector, y points up
    pub gravity: [f32; 2],

    /// Fixed timestep for the simulation
    pub timestep: f32,

    /// Maximum number of substeps per `step` call
    pub max_substeps: u32,

    /// Solver iterations
    pub solver_iterations: usize,

    /// Enable continuous collision detection on dynamic bodies by default
    pub ccd_enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -30.0],
            timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 4,
            ccd_enabled: false,
        }
    }
}

impl PhysicsConfig {
    /// Configuration for tighter contacts at a higher cost
    pub fn high_precision() -> Self {
        Self {
            solver_iterations: 8,
            max_substeps: 8,
            ccd_enabled: true,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32) -> Self {
        self.gravity = [x, y];
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the substep cap
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Check the configuration can drive a simulation
    pub fn validate(&self) -> Result<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".to_string(),
            ));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(PhysicsError::InvalidConfig("gravity must be finite".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
        assert!(PhysicsConfig::high_precision().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PhysicsConfig::default().with_timestep(0.0).validate().is_err());
        assert!(PhysicsConfig::default().with_timestep(f32::NAN).validate().is_err());
        assert!(PhysicsConfig::default().with_max_substeps(0).validate().is_err());
        assert!(PhysicsConfig::default()
            .with_gravity(0.0, f32::INFINITY)
            .validate()
            .is_err());
    }
}
