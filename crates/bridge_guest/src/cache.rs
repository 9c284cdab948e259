//! Lazy path → ID cache.
//!
//! The guest never invents IDs; it asks the host once per path and remembers
//! the answer. IDs are stable for the host process lifetime, so a cached
//! entry never goes stale.

use std::collections::HashMap;

use bridge_component::{BridgeError, ComponentTypeId, HostEcs};

/// Remembers the IDs the host handed out for each path.
#[derive(Debug, Default)]
pub struct ComponentCache {
    ids: HashMap<String, ComponentTypeId>,
}

impl ComponentCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` with the host, or return the cached ID.
    ///
    /// # Errors
    ///
    /// Propagates the host's error (e.g. registration after setup).
    pub fn register(&mut self, host: &mut dyn HostEcs, path: &str) -> Result<ComponentTypeId, BridgeError> {
        if let Some(&id) = self.ids.get(path) {
            return Ok(id);
        }
        let id = host.register_component(path)?;
        self.ids.insert(path.to_string(), id);
        Ok(id)
    }

    /// Resolve `path` through the host without registering it.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownComponentPath`] if the host does not
    /// know the path.
    pub fn resolve(&mut self, host: &dyn HostEcs, path: &str) -> Result<ComponentTypeId, BridgeError> {
        if let Some(&id) = self.ids.get(path) {
            return Ok(id);
        }
        let id = host
            .resolve_component(path)
            .ok_or_else(|| BridgeError::UnknownComponentPath(path.to_string()))?;
        self.ids.insert(path.to_string(), id);
        Ok(id)
    }

    /// Returns the cached ID for `path` without asking the host.
    #[must_use]
    pub fn cached(&self, path: &str) -> Option<ComponentTypeId> {
        self.ids.get(path).copied()
    }

    /// Returns the number of cached paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
