//! Patrol / chase / attack decision making

use crate::state_machine::{State, StateChange, StateMachine};
use crate::stats::EnemyStats;
use ember_core::Countdown;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Chase is abandoned only beyond the detection radius times this factor,
/// so an enemy at the boundary does not flap between patrol and chase.
pub const LOSE_INTEREST_FACTOR: f32 = 1.5;

/// Enemy AI states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Patrol,
    Chase,
    Attack,
    Dead,
}

impl State for AiState {
    fn is_terminal(&self) -> bool {
        matches!(self, AiState::Dead)
    }
}

/// What the AI wants its body to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiIntent {
    /// Move horizontally; `direction` is -1 or +1
    Move { direction: f32, speed: f32 },
    /// Stand still
    Hold,
    /// Swing at the player
    Attack { facing: f32 },
    /// Dead, do nothing
    None,
}

/// What the AI knows at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub position: Vec2,
    /// The player's position; `None` when there is no living player
    pub player: Option<Vec2>,
}

struct AiContext {
    distance: f32,
    dead: bool,
    attack_done: bool,
}

/// Per-enemy decision making.
///
/// Reads positions, never writes them: the owner turns the returned
/// [`AiIntent`] into physics requests.
#[derive(Debug)]
pub struct EnemyAi {
    fsm: StateMachine<AiState, AiContext>,
    patrol_origin: Vec2,
    patrol_distance: f32,
    patrol_direction: f32,
    patrol_speed: f32,
    chase_speed: f32,
    attack_cooldown: Countdown,
    attacked_this_state: bool,
    dead: bool,
}

impl EnemyAi {
    pub fn new(stats: &EnemyStats, patrol_origin: Vec2) -> Self {
        let mut fsm = StateMachine::new(AiState::Patrol);

        let detection = stats.detection_radius;
        let attack = stats.attack_radius;
        let lose = detection * LOSE_INTEREST_FACTOR;

        fsm.add_global_transition(AiState::Dead, |ctx: &AiContext| ctx.dead);
        fsm.add_transition(AiState::Patrol, AiState::Chase, move |ctx: &AiContext| {
            ctx.distance < detection
        });
        fsm.add_transition_priority(
            AiState::Chase,
            AiState::Attack,
            move |ctx: &AiContext| ctx.distance < attack,
            1,
        );
        fsm.add_transition(AiState::Chase, AiState::Patrol, move |ctx: &AiContext| {
            ctx.distance > lose
        });
        fsm.add_transition(AiState::Attack, AiState::Chase, move |ctx: &AiContext| {
            ctx.attack_done || ctx.distance > attack * LOSE_INTEREST_FACTOR
        });

        Self {
            fsm,
            patrol_origin,
            patrol_distance: stats.patrol_distance.max(0.0),
            patrol_direction: 1.0,
            patrol_speed: stats.patrol_speed,
            chase_speed: stats.move_speed,
            attack_cooldown: Countdown::idle(),
            attacked_this_state: false,
            dead: false,
        }
    }

    pub fn state(&self) -> AiState {
        self.fsm.current()
    }

    /// Mark the enemy dead; the next [`think`](Self::think) moves to `Dead`
    /// and nothing leaves it afterwards.
    pub fn kill(&mut self) -> Option<StateChange<AiState>> {
        self.dead = true;
        self.fsm.force_transition(AiState::Dead)
    }

    /// Start the attack cooldown after an attack was executed
    pub fn start_cooldown(&mut self, seconds: f32) {
        self.attack_cooldown.start(seconds);
    }

    pub fn attack_ready(&self) -> bool {
        !self.attack_cooldown.is_active()
    }

    /// Advance one tick. Takes at most one state transition and returns
    /// the intent for the state the AI ends up in.
    pub fn think(
        &mut self,
        dt: f32,
        perception: &Perception,
        speed_multiplier: f32,
    ) -> (AiIntent, Option<StateChange<AiState>>) {
        self.attack_cooldown.tick(dt);

        let distance = perception
            .player
            .map(|player| player.distance(perception.position))
            .unwrap_or(f32::INFINITY);
        let context = AiContext {
            distance,
            dead: self.dead,
            attack_done: self.attacked_this_state,
        };

        let change = self.fsm.update(&context);
        if change.is_some() {
            self.attacked_this_state = false;
        }

        let intent = match self.fsm.current() {
            AiState::Dead => AiIntent::None,
            AiState::Patrol => self.patrol(perception.position, speed_multiplier),
            AiState::Chase => match perception.player {
                Some(player) => AiIntent::Move {
                    direction: direction_to(perception.position, player),
                    speed: self.chase_speed * speed_multiplier,
                },
                None => AiIntent::Hold,
            },
            AiState::Attack => {
                if !self.attacked_this_state && self.attack_ready() {
                    self.attacked_this_state = true;
                    let facing = perception
                        .player
                        .map(|player| direction_to(perception.position, player))
                        .unwrap_or(self.patrol_direction);
                    AiIntent::Attack { facing }
                } else {
                    AiIntent::Hold
                }
            }
        };

        (intent, change)
    }

    fn patrol(&mut self, position: Vec2, speed_multiplier: f32) -> AiIntent {
        if self.patrol_distance <= 0.0 {
            return AiIntent::Hold;
        }
        let offset = position.x - self.patrol_origin.x;
        if offset >= self.patrol_distance {
            self.patrol_direction = -1.0;
        } else if offset <= -self.patrol_distance {
            self.patrol_direction = 1.0;
        }
        AiIntent::Move {
            direction: self.patrol_direction,
            speed: self.patrol_speed * speed_multiplier,
        }
    }
}

fn direction_to(from: Vec2, to: Vec2) -> f32 {
    if to.x < from.x {
        -1.0
    } else {
        1.0
    }
}
