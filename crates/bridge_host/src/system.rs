//! System registry: the ordered table of guest systems.
//!
//! Each entry binds a system name, unique within its guest instance, to the
//! queries it declared. The registry keeps registration order because the
//! dispatcher invokes systems in exactly that order every tick.

use std::collections::HashSet;

use bridge_component::{BridgeError, GuestId, QueryDescriptor};
use tracing::info;

/// A system registered by a guest.
#[derive(Debug, Clone)]
pub struct RegisteredSystem {
    /// The guest instance that exports the system.
    pub guest: GuestId,
    /// The exported system name.
    pub name: String,
    /// Compiled queries, in declaration order.
    pub queries: Vec<QueryDescriptor>,
}

/// Registry of all systems known to one host.
#[derive(Debug, Default)]
pub struct SystemRegistry {
    /// Systems in registration order.
    systems: Vec<RegisteredSystem>,
    /// `(guest, name)` pairs already taken.
    names: HashSet<(GuestId, String)>,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system for `guest`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::DuplicateSystemName`] if this guest already
    /// registered `name`; the existing entry is kept.
    pub fn register(
        &mut self,
        guest: GuestId,
        guest_name: &str,
        name: &str,
        queries: Vec<QueryDescriptor>,
    ) -> Result<(), BridgeError> {
        if !self.names.insert((guest, name.to_string())) {
            return Err(BridgeError::DuplicateSystemName {
                guest: guest_name.to_string(),
                name: name.to_string(),
            });
        }
        info!(
            guest = guest_name,
            system = name,
            queries = queries.len(),
            "registered system"
        );
        self.systems.push(RegisteredSystem {
            guest,
            name: name.to_string(),
            queries,
        });
        Ok(())
    }

    /// Remove every system registered by `guest`.
    ///
    /// Returns the number of systems removed.
    pub fn remove_guest(&mut self, guest: GuestId) -> usize {
        let before = self.systems.len();
        self.systems.retain(|s| s.guest != guest);
        self.names.retain(|(owner, _)| *owner != guest);
        before - self.systems.len()
    }

    /// Returns the system at `index` in registration order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RegisteredSystem> {
        self.systems.get(index)
    }

    /// Returns an iterator over all systems in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSystem> {
        self.systems.iter()
    }

    /// Returns the systems of one guest, in registration order.
    pub fn systems_of(&self, guest: GuestId) -> impl Iterator<Item = &RegisteredSystem> {
        self.systems.iter().filter(move |s| s.guest == guest)
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
