//! Trigger definitions and runtime state

use crate::action::TriggerAction;
use crate::condition::TriggerCondition;
use crate::host::TriggerHost;
use ember_core::{Aabb, Countdown};
use glam::Vec2;
use serde::{Deserialize, Serialize};

fn default_once() -> bool {
    true
}

/// What activates a trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerRegion {
    /// The player's position inside a box
    Area(Aabb),
    /// An explicit notification naming this target, e.g. `"defeated:frost_warden"`
    Target(String),
}

/// Trigger as described by level data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDef {
    pub id: String,
    pub region: TriggerRegion,
    #[serde(default)]
    pub condition: TriggerCondition,
    pub action: TriggerAction,
    /// Fire at most once per level session
    #[serde(default = "default_once")]
    pub once: bool,
    /// Minimum time between firings of a repeatable trigger
    #[serde(default)]
    pub cooldown: f32,
}

impl TriggerDef {
    /// A one-shot area trigger
    pub fn area(id: impl Into<String>, area: Aabb, action: TriggerAction) -> Self {
        Self {
            id: id.into(),
            region: TriggerRegion::Area(area),
            condition: TriggerCondition::Always,
            action,
            once: true,
            cooldown: 0.0,
        }
    }

    /// A one-shot target trigger
    pub fn target(id: impl Into<String>, target: impl Into<String>, action: TriggerAction) -> Self {
        Self {
            id: id.into(),
            region: TriggerRegion::Target(target.into()),
            condition: TriggerCondition::Always,
            action,
            once: true,
            cooldown: 0.0,
        }
    }

    pub fn with_condition(mut self, condition: TriggerCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Make the trigger repeatable with the given cooldown
    pub fn repeatable(mut self, cooldown: f32) -> Self {
        self.once = false;
        self.cooldown = cooldown.max(0.0);
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && match &self.region {
                TriggerRegion::Area(area) => area.is_valid(),
                TriggerRegion::Target(target) => !target.is_empty(),
            }
    }
}

/// A live trigger
#[derive(Debug, Clone)]
pub struct Trigger {
    def: TriggerDef,
    fired: bool,
    fire_count: u32,
    player_inside: bool,
    cooldown: Countdown,
}

impl Trigger {
    pub fn new(def: TriggerDef) -> Self {
        Self {
            def,
            fired: false,
            fire_count: 0,
            player_inside: false,
            cooldown: Countdown::idle(),
        }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn def(&self) -> &TriggerDef {
        &self.def
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn fire_count(&self) -> u32 {
        self.fire_count
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown.tick(dt);
    }

    /// Test an area trigger against the player's position and fire it if
    /// everything matches. One-shot triggers fire whenever the player is
    /// inside; repeatable ones only on entry and outside their cooldown.
    /// Entry is recorded once the condition holds, so a condition met while
    /// already inside still counts as entering.
    pub fn check<H: TriggerHost + ?Sized>(&mut self, player_pos: Vec2, host: &mut H) -> bool {
        if self.def.once && self.fired {
            return false;
        }
        let TriggerRegion::Area(area) = &self.def.region else {
            return false;
        };

        if !area.contains(player_pos) {
            self.player_inside = false;
            return false;
        }
        if !self.def.condition.evaluate(&*host) {
            return false;
        }
        let entered = !self.player_inside;
        self.player_inside = true;
        if !self.def.once && (!entered || self.cooldown.is_active()) {
            return false;
        }

        self.fire(host);
        true
    }

    /// Fire a target trigger if `target` names it
    pub fn check_target<H: TriggerHost + ?Sized>(&mut self, target: &str, host: &mut H) -> bool {
        if self.def.once && self.fired {
            return false;
        }
        match &self.def.region {
            TriggerRegion::Target(name) if name == target => {}
            _ => return false,
        }
        if self.cooldown.is_active() || !self.def.condition.evaluate(&*host) {
            return false;
        }

        self.fire(host);
        true
    }

    fn fire<H: TriggerHost + ?Sized>(&mut self, host: &mut H) {
        self.fired = true;
        self.fire_count += 1;
        self.cooldown.start(self.def.cooldown);
        log::debug!("Trigger '{}' fired", self.def.id);
        self.def.action.execute(host);
    }
}
