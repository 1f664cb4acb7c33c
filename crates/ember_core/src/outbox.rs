//! Ordered event outbox

use std::collections::VecDeque;

/// Queue of events produced by the simulation and drained by a collaborator
/// (UI, audio, persistence). Events come out in the order they were pushed.
#[derive(Debug, Clone)]
pub struct Outbox<E> {
    queue: VecDeque<E>,
}

impl<E> Outbox<E> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.queue.push_back(event);
    }

    /// Pop the oldest event
    pub fn pop(&mut self) -> Option<E> {
        self.queue.pop_front()
    }

    /// Take every pending event
    pub fn drain(&mut self) -> Vec<E> {
        self.queue.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<E> Default for Outbox<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Extend<E> for Outbox<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}
