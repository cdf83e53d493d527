use std::fmt;

/// A lightweight entity identifier.
///
/// Entities are plain indices handed out by [`World::create`](crate::World::create)
/// in increasing order, starting at 0. Ids are never reused within a world's
/// lifetime; there is no generation counter. `u32::MAX` is reserved as the
/// tombstone sentinel of the sparse-set storage and is never a valid entity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Reserved sentinel; marks empty slots in sparse index arrays.
    pub(crate) const TOMBSTONE: Entity = Entity(u32::MAX);

    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Create an entity from a raw index (mainly for testing).
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The index of this entity.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
