//! Table-driven finite state machine

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A state in the state machine
pub trait State: Copy + Eq + Hash + fmt::Debug {
    /// Terminal states have no way out, not even through global transitions
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Transition condition
pub type TransitionCondition<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// A state transition
pub struct Transition<S, C> {
    /// Target state
    pub to: S,
    /// Condition function
    pub condition: TransitionCondition<C>,
    /// Priority (higher = checked first)
    pub priority: i32,
}

impl<S, C> Transition<S, C> {
    /// Create a new transition
    pub fn new<F>(to: S, condition: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            to,
            condition: Box::new(condition),
            priority: 0,
        }
    }

    /// Set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Check if transition should occur
    pub fn should_transition(&self, context: &C) -> bool {
        (self.condition)(context)
    }
}

/// A transition that actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<S> {
    pub from: S,
    pub to: S,
}

/// Finite state machine.
///
/// Each [`update`](Self::update) takes at most one transition, so an
/// intermediate state is always observed for at least one update.
pub struct StateMachine<S, C>
where
    S: State,
{
    current: S,
    previous: Option<S>,
    transitions: HashMap<S, Vec<Transition<S, C>>>,
    global_transitions: Vec<Transition<S, C>>,
    /// Updates spent in the current state
    updates_in_state: u32,
}

impl<S, C> StateMachine<S, C>
where
    S: State,
{
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            transitions: HashMap::new(),
            global_transitions: Vec::new(),
            updates_in_state: 0,
        }
    }

    /// Add a transition
    pub fn add_transition<F>(&mut self, from: S, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.add_transition_priority(from, to, condition, 0);
    }

    /// Add a transition with priority. Transitions of equal priority are
    /// checked in insertion order.
    pub fn add_transition_priority<F>(&mut self, from: S, to: S, condition: F, priority: i32)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        let list = self.transitions.entry(from).or_default();
        list.push(Transition::new(to, condition).with_priority(priority));
        list.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Add a global transition (can occur from any non-terminal state)
    pub fn add_global_transition<F>(&mut self, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.global_transitions.push(Transition::new(to, condition));
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    pub fn updates_in_state(&self) -> u32 {
        self.updates_in_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Force a transition, bypassing conditions. Ignored from a terminal
    /// state.
    pub fn force_transition(&mut self, to: S) -> Option<StateChange<S>> {
        if self.current.is_terminal() || self.current == to {
            return None;
        }
        let change = StateChange {
            from: self.current,
            to,
        };
        self.previous = Some(self.current);
        self.current = to;
        self.updates_in_state = 0;
        Some(change)
    }

    /// Evaluate transitions once. Global transitions are checked first.
    pub fn update(&mut self, context: &C) -> Option<StateChange<S>> {
        if self.current.is_terminal() {
            return None;
        }
        self.updates_in_state = self.updates_in_state.saturating_add(1);

        let target = self
            .global_transitions
            .iter()
            .find(|t| t.to != self.current && t.should_transition(context))
            .or_else(|| {
                self.transitions
                    .get(&self.current)
                    .and_then(|list| list.iter().find(|t| t.should_transition(context)))
            })
            .map(|t| t.to);

        target.and_then(|to| self.force_transition(to))
    }
}

impl<S, C> fmt::Debug for StateMachine<S, C>
where
    S: State,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("updates_in_state", &self.updates_in_state)
            .finish_non_exhaustive()
    }
}
