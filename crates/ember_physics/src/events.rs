//! Collision events

use crate::collider::ColliderHandle;

/// Type of collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CollisionEventType {
    /// Contact or overlap started
    Started,
    /// Contact or overlap ended
    Stopped,
}

/// A collision event between two colliders
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// First collider
    pub collider1: ColliderHandle,
    /// Second collider
    pub collider2: ColliderHandle,
    /// Event type
    pub event_type: CollisionEventType,
    /// Whether either collider is a sensor
    pub is_sensor: bool,
    /// User data from collider 1 (0 if it was removed)
    pub user_data1: u128,
    /// User data from collider 2 (0 if it was removed)
    pub user_data2: u128,
}

impl CollisionEvent {
    /// Check if this is a start event
    pub fn is_started(&self) -> bool {
        self.event_type == CollisionEventType::Started
    }

    /// Check if this is a stop event
    pub fn is_stopped(&self) -> bool {
        self.event_type == CollisionEventType::Stopped
    }

    /// Whether the event involves `collider`
    pub fn involves(&self, collider: ColliderHandle) -> bool {
        self.collider1 == collider || self.collider2 == collider
    }

    /// The other collider of the pair, if `collider` is one of them
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        if self.collider1 == collider {
            Some(self.collider2)
        } else if self.collider2 == collider {
            Some(self.collider1)
        } else {
            None
        }
    }

    /// Order-independent key of the collider pair
    pub fn pair_key(&self) -> ((u32, u32), (u32, u32)) {
        let a = self.collider1.sort_key();
        let b = self.collider2.sort_key();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Buffer of events gathered over one or more internal steps
#[derive(Debug, Default)]
pub(crate) struct EventBuffer {
    events: Vec<CollisionEvent>,
}

impl EventBuffer {
    pub(crate) fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    /// Take all events, ordered by collider pair. The sort is stable, so the
    /// started/stopped history of one pair keeps its chronological order.
    pub(crate) fn drain_sorted(&mut self) -> Vec<CollisionEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.sort_by_key(|e| e.pair_key());
        events
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}
