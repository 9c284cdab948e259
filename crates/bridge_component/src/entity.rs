//! Host-minted entity identifiers.
//!
//! Only the host's [`EntityAllocator`] creates an [`Entity`]. A guest sees
//! entities in query rows and spawn results and may hand them back to the
//! host, but has no way to make one up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to one entity in a host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Build a handle from a raw value without allocating it.
    ///
    /// Meant for tests and mock hosts; a real world never resolves a handle
    /// it did not allocate.
    #[doc(hidden)]
    #[must_use]
    pub const fn from_test_id(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value, for logs.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out entity handles for one world, starting at 1 and never reusing a
/// value, so a stale handle kept by a guest cannot alias a newer entity.
#[derive(Debug)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Mint the next handle.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
