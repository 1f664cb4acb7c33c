//! Trigger system for a level session

use crate::host::TriggerHost;
use crate::trigger::{Trigger, TriggerDef};
use glam::Vec2;

/// Owns every trigger of the current level
#[derive(Debug, Default)]
pub struct TriggerSystem {
    triggers: Vec<Trigger>,
    torn_down: bool,
}

impl TriggerSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger. Invalid or duplicate definitions are skipped with
    /// a warning.
    pub fn add(&mut self, def: TriggerDef) -> bool {
        if !def.is_valid() {
            log::warn!("Skipping invalid trigger '{}'", def.id);
            return false;
        }
        if self.get(&def.id).is_some() {
            log::warn!("Skipping duplicate trigger '{}'", def.id);
            return false;
        }
        self.torn_down = false;
        self.triggers.push(Trigger::new(def));
        true
    }

    /// Register many triggers, returning how many were accepted
    pub fn load(&mut self, defs: impl IntoIterator<Item = TriggerDef>) -> usize {
        defs.into_iter().filter(|def| self.add(def.clone())).count()
    }

    /// Advance trigger cooldowns
    pub fn tick(&mut self, dt: f32) {
        for trigger in &mut self.triggers {
            trigger.tick(dt);
        }
    }

    /// Check every area trigger against the player position, in registration
    /// order. Returns the ids that fired.
    pub fn check<H: TriggerHost + ?Sized>(&mut self, player_pos: Vec2, host: &mut H) -> Vec<String> {
        if self.torn_down {
            return Vec::new();
        }
        self.triggers
            .iter_mut()
            .filter_map(|trigger| {
                trigger
                    .check(player_pos, host)
                    .then(|| trigger.id().to_string())
            })
            .collect()
    }

    /// Fire target triggers listening for `target`
    pub fn notify_target<H: TriggerHost + ?Sized>(
        &mut self,
        target: &str,
        host: &mut H,
    ) -> Vec<String> {
        if self.torn_down {
            return Vec::new();
        }
        self.triggers
            .iter_mut()
            .filter_map(|trigger| {
                trigger
                    .check_target(target, host)
                    .then(|| trigger.id().to_string())
            })
            .collect()
    }

    /// Drop every trigger and its timers. Nothing fires afterwards until new
    /// triggers are added.
    pub fn teardown(&mut self) {
        log::debug!("Tearing down {} triggers", self.triggers.len());
        self.triggers.clear();
        self.torn_down = true;
    }

    pub fn get(&self, id: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id() == id)
    }

    pub fn has_fired(&self, id: &str) -> bool {
        self.get(id).is_some_and(Trigger::has_fired)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
