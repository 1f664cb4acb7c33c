//! Generational entity identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a simulated entity (player, enemy, hitbox, hazard)
///
/// Lower 32 bits hold the index, upper 32 bits the generation. The
/// generation changes whenever the owning allocator is reset at level
/// teardown, so ids handed out for a previous level never compare equal to
/// ids of the current one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    bits: u64,
}

impl EntityId {
    /// Create an id from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// The null id, never issued by an allocator
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }

    /// Raw bits, suitable for physics collider user data
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

/// Hands out sequential ids for one game session
///
/// Owned by the session rather than shared globally, so two sessions (or two
/// tests) never interfere with each other's numbering.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_index: u32,
    generation: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next_index, self.generation);
        self.next_index = self.next_index.wrapping_add(1);
        id
    }

    /// Start a new generation; previously issued ids become stale
    pub fn reset(&mut self) {
        self.next_index = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Current generation
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether `id` was issued by the current generation
    pub fn is_current(&self, id: EntityId) -> bool {
        !id.is_null() && id.generation() == self.generation && id.index() < self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parts() {
        let id = EntityId::new(7, 3);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert_eq!(EntityId::from_bits(id.to_bits()), id);
        assert!(EntityId::null().is_null());
        assert!(!id.is_null());
    }

    #[test]
    fn test_allocator_sequential() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(ids.is_current(a));
    }

    #[test]
    fn test_reset_invalidates_previous_ids() {
        let mut ids = IdAllocator::new();
        let old = ids.allocate();
        ids.reset();
        let new = ids.allocate();

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(!ids.is_current(old));
        assert!(ids.is_current(new));
    }
}
