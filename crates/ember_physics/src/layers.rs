//! Collision layers and filtering

use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Static level geometry (platforms, walls)
    pub const WORLD: Self = Self(0);
    /// Player body (also the player's hurtbox)
    pub const PLAYER: Self = Self(1);
    /// Enemy bodies (also their hurtboxes)
    pub const ENEMY: Self = Self(2);
    /// Hitboxes spawned by the player
    pub const PLAYER_ATTACK: Self = Self(3);
    /// Hitboxes spawned by enemies and bosses
    pub const ENEMY_ATTACK: Self = Self(4);
    /// Damaging regions
    pub const HAZARD: Self = Self(5);
    /// Region sensors
    pub const TRIGGER: Self = Self(6);
    /// Player feet sensor
    pub const FEET: Self = Self(7);

    /// Create a custom layer
    pub const fn custom(id: u32) -> Self {
        Self(id)
    }

    /// Get the layer as a bitmask
    pub fn as_mask(&self) -> u32 {
        1 << self.0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Collision groups for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    /// Which groups this object belongs to
    pub memberships: u32,
    /// Which groups this object can collide with
    pub filter: u32,
}

impl CollisionGroups {
    /// Collide with everything
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Collide with nothing
    pub const NONE: Self = Self {
        memberships: 0,
        filter: 0,
    };

    pub fn new(memberships: u32, filter: u32) -> Self {
        Self {
            memberships,
            filter,
        }
    }

    /// Create from a single layer that collides with specific layers
    pub fn from_layer(layer: CollisionLayer, collides_with: &[CollisionLayer]) -> Self {
        let memberships = layer.as_mask();
        let filter = collides_with.iter().fold(0u32, |acc, l| acc | l.as_mask());
        Self {
            memberships,
            filter,
        }
    }

    /// Query groups that match any collider on the given layers
    pub fn query(targets: &[CollisionLayer]) -> Self {
        Self {
            memberships: u32::MAX,
            filter: targets.iter().fold(0u32, |acc, l| acc | l.as_mask()),
        }
    }

    /// Check if two groups can collide
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }

    pub(crate) fn to_rapier(self) -> rapier::InteractionGroups {
        rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(self.memberships),
            rapier::Group::from_bits_truncate(self.filter),
        )
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::ALL
    }
}

/// Collision matrix defining which layers collide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionMatrix {
    /// Collision rules: layer -> list of layers it collides with
    rules: HashMap<CollisionLayer, Vec<CollisionLayer>>,
}

impl Default for CollisionMatrix {
    fn default() -> Self {
        let mut matrix = Self::new();

        matrix.set_collides_with(
            CollisionLayer::WORLD,
            &[
                CollisionLayer::PLAYER,
                CollisionLayer::ENEMY,
                CollisionLayer::FEET,
            ],
        );

        matrix.set_collides_with(
            CollisionLayer::PLAYER,
            &[
                CollisionLayer::WORLD,
                CollisionLayer::ENEMY,
                CollisionLayer::ENEMY_ATTACK,
                CollisionLayer::HAZARD,
                CollisionLayer::TRIGGER,
            ],
        );

        matrix.set_collides_with(
            CollisionLayer::ENEMY,
            &[
                CollisionLayer::WORLD,
                CollisionLayer::PLAYER,
                CollisionLayer::PLAYER_ATTACK,
            ],
        );

        matrix.set_collides_with(CollisionLayer::PLAYER_ATTACK, &[CollisionLayer::ENEMY]);
        matrix.set_collides_with(CollisionLayer::ENEMY_ATTACK, &[CollisionLayer::PLAYER]);
        matrix.set_collides_with(CollisionLayer::HAZARD, &[CollisionLayer::PLAYER]);
        matrix.set_collides_with(CollisionLayer::TRIGGER, &[CollisionLayer::PLAYER]);
        matrix.set_collides_with(CollisionLayer::FEET, &[CollisionLayer::WORLD]);

        matrix
    }
}

impl CollisionMatrix {
    /// Create an empty collision matrix
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Set which layers a given layer collides with
    pub fn set_collides_with(&mut self, layer: CollisionLayer, collides_with: &[CollisionLayer]) {
        self.rules.insert(layer, collides_with.to_vec());
    }

    /// Get collision groups for a layer
    pub fn groups(&self, layer: CollisionLayer) -> CollisionGroups {
        let filter = self
            .rules
            .get(&layer)
            .map(|layers| layers.iter().fold(0u32, |acc, l| acc | l.as_mask()))
            .unwrap_or(u32::MAX);

        CollisionGroups {
            memberships: layer.as_mask(),
            filter,
        }
    }

    /// Check if two layers can collide
    pub fn can_collide(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        self.groups(a).can_collide(&self.groups(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_groups() {
        let player = CollisionGroups::from_layer(
            CollisionLayer::PLAYER,
            &[CollisionLayer::ENEMY, CollisionLayer::WORLD],
        );
        let enemy = CollisionGroups::from_layer(
            CollisionLayer::ENEMY,
            &[CollisionLayer::PLAYER, CollisionLayer::PLAYER_ATTACK],
        );

        assert!(player.can_collide(&enemy));
        assert!(!player.can_collide(&CollisionGroups::NONE));
    }

    #[test]
    fn test_platformer_matrix() {
        let matrix = CollisionMatrix::default();

        assert!(matrix.can_collide(CollisionLayer::PLAYER_ATTACK, CollisionLayer::ENEMY));
        assert!(matrix.can_collide(CollisionLayer::ENEMY_ATTACK, CollisionLayer::PLAYER));
        assert!(matrix.can_collide(CollisionLayer::FEET, CollisionLayer::WORLD));
        assert!(matrix.can_collide(CollisionLayer::HAZARD, CollisionLayer::PLAYER));

        // Attacks never hit their own side
        assert!(!matrix.can_collide(CollisionLayer::PLAYER_ATTACK, CollisionLayer::PLAYER));
        assert!(!matrix.can_collide(CollisionLayer::ENEMY_ATTACK, CollisionLayer::ENEMY));
        // Feet only care about level geometry
        assert!(!matrix.can_collide(CollisionLayer::FEET, CollisionLayer::ENEMY));
    }

    #[test]
    fn test_query_groups_match_layer() {
        let matrix = CollisionMatrix::default();
        let query = CollisionGroups::query(&[CollisionLayer::WORLD]);
        assert!(query.can_collide(&matrix.groups(CollisionLayer::WORLD)));
        assert!(!query.can_collide(&matrix.groups(CollisionLayer::ENEMY)));
    }
}
