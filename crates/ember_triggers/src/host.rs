//! Capability interfaces the trigger system runs against

use glam::Vec2;

/// Read-only world facts that trigger conditions test
pub trait WorldState {
    fn has_flag(&self, flag: &str) -> bool;
    fn is_quest_active(&self, quest: &str) -> bool;
    fn is_quest_completed(&self, quest: &str) -> bool;
    fn has_ability(&self, ability: &str) -> bool;
}

/// Everything a trigger action can ask of its host.
///
/// Methods that name something by id return `false` when the id is unknown;
/// the caller logs it and carries on.
pub trait TriggerHost: WorldState {
    fn show_toast(&mut self, message: &str, duration: f32);
    fn play_sound(&mut self, sound: &str);
    fn start_quest(&mut self, quest: &str) -> bool;
    fn update_objective(&mut self, quest: &str, objective: &str, amount: u32) -> bool;
    fn complete_quest(&mut self, quest: &str) -> bool;
    fn set_flag(&mut self, flag: &str, value: bool);
    fn set_checkpoint(&mut self, checkpoint: &str, position: Option<Vec2>) -> bool;
    fn unlock_ability(&mut self, ability: &str);
    fn spawn_enemy(&mut self, kind: &str, position: Vec2) -> bool;
    fn start_dialogue(&mut self, dialogue: &str) -> bool;
    fn change_chapter(&mut self, chapter: &str) -> bool;
}
