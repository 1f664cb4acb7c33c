//! Error types for the physics world

use thiserror::Error;

/// Physics errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Rigid body not found
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(crate::body::RigidBodyHandle),

    /// Collider not found
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(crate::collider::ColliderHandle),

    /// Invalid configuration, reported once when the world is built
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
