//! Read-only per-tick views for the renderer

use ember_ai::{AiState, EnemySnapshot};
use ember_core::EntityId;
use ember_player::{MovementState, PlayerSnapshot};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the renderer needs for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub time: f32,
    /// Leftover fraction of a tick, for interpolating between snapshots
    pub alpha: f32,
    pub paused: bool,
    pub level: Option<String>,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub hitboxes: Vec<HitboxView>,
}

impl RenderSnapshot {
    pub fn enemy(&self, id: EntityId) -> Option<&EnemyView> {
        self.enemies.iter().find(|e| e.enemy.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub player: PlayerSnapshot,
    /// Seconds spent in the current movement state
    pub animation_time: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    #[serde(flatten)]
    pub enemy: EnemySnapshot,
    /// Seconds spent in the current AI state
    pub animation_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxView {
    pub id: EntityId,
    pub owner: EntityId,
    pub position: Vec2,
    pub remaining_ticks: u32,
}

/// Time spent in the current state, restarted on every state change
#[derive(Debug, Clone, Copy, Default)]
pub struct StateTimer<S> {
    state: Option<S>,
    elapsed: f32,
}

impl<S: Copy + PartialEq> StateTimer<S> {
    pub fn observe(&mut self, state: S, dt: f32) -> f32 {
        if self.state == Some(state) {
            self.elapsed += dt;
        } else {
            self.state = Some(state);
            self.elapsed = 0.0;
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Animation clocks for every rendered entity
#[derive(Debug, Default)]
pub struct AnimationClocks {
    player: StateTimer<MovementState>,
    enemies: HashMap<EntityId, StateTimer<AiState>>,
}

impl AnimationClocks {
    pub fn observe_player(&mut self, state: MovementState, dt: f32) -> f32 {
        self.player.observe(state, dt)
    }

    pub fn observe_enemy(&mut self, enemy: EntityId, state: AiState, dt: f32) -> f32 {
        self.enemies.entry(enemy).or_default().observe(state, dt)
    }

    pub fn player(&self) -> f32 {
        self.player.elapsed()
    }

    pub fn enemy(&self, enemy: EntityId) -> f32 {
        self.enemies.get(&enemy).map_or(0.0, StateTimer::elapsed)
    }

    pub fn forget_enemy(&mut self, enemy: EntityId) {
        self.enemies.remove(&enemy);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_timer_restarts_on_change() {
        let mut timer = StateTimer::default();
        assert_eq!(timer.observe(MovementState::Idle, 0.5), 0.0);
        assert_eq!(timer.observe(MovementState::Idle, 0.5), 0.5);
        assert_eq!(timer.observe(MovementState::Idle, 0.25), 0.75);
        assert_eq!(timer.observe(MovementState::Running, 0.5), 0.0);
    }
}
