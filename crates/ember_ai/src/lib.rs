//! Ember AI - enemy and boss behaviour
//!
//! Enemies run a small table-driven state machine:
//!
//! ```text
//!            d < detect            d < attack
//!   Patrol ─────────────▶ Chase ─────────────▶ Attack
//!     ▲                    │  ▲                  │
//!     └────────────────────┘  └──────────────────┘
//!        d > detect × 1.5        swing executed
//!
//!   any ──(health reaches zero)──▶ Dead (terminal)
//! ```
//!
//! At most one transition is taken per tick. Bosses add a phase index that
//! only ever advances as health falls through configured thresholds, and a
//! round-robin cycle over the current phase's attack patterns.

pub mod boss;
pub mod brain;
pub mod catalog;
pub mod enemy;
pub mod state_machine;
pub mod stats;

pub mod prelude {
    pub use crate::boss::{BossAi, BossConfig, BossPhase, PhaseChange};
    pub use crate::brain::{AiIntent, AiState, EnemyAi, Perception, LOSE_INTEREST_FACTOR};
    pub use crate::catalog::{EnemyCatalog, EnemyKind};
    pub use crate::enemy::{Enemy, EnemyEvent, EnemySnapshot};
    pub use crate::state_machine::{State, StateChange, StateMachine, Transition};
    pub use crate::stats::{EnemyStats, StatOverrides};
}

pub use prelude::*;
