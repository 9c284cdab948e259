//! Component registry: the host-authoritative path ↔ ID table.
//!
//! One registry is created at host startup and shared (`Arc`) by every
//! [`Host`](crate::Host) in the process, so it is the only state visible to
//! more than one guest instance.
//!
//! Reads are lock-free lookups in a sharded [`DashMap`]. Registration takes a
//! single mutex: the check-then-allocate sequence must be serialised or two
//! threads registering different paths could observe the same next index.

use std::sync::{Mutex, RwLock};

use bridge_component::ComponentTypeId;
use dashmap::DashMap;
use tracing::debug;

/// Maps component type paths to dense [`ComponentTypeId`]s.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// Path → ID. Lock-free reads via sharded concurrent hashmap.
    by_path: DashMap<String, ComponentTypeId>,
    /// ID → path, indexed by `ComponentTypeId::index`. Append-only.
    paths: RwLock<Vec<String>>,
    /// Serialises registration so IDs are allocated densely.
    register_lock: Mutex<()>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` and return its ID.
    ///
    /// Idempotent: a known path returns the ID it already has. New IDs are
    /// visible to [`resolve`](Self::resolve) on every thread as soon as this
    /// returns.
    pub fn register(&self, path: &str) -> ComponentTypeId {
        // Fast path: already registered.
        if let Some(id) = self.by_path.get(path) {
            return *id;
        }

        let _guard = self
            .register_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another thread may have won the race while we waited.
        if let Some(id) = self.by_path.get(path) {
            return *id;
        }

        let mut paths = self
            .paths
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = ComponentTypeId(paths.len() as u32);
        paths.push(path.to_string());
        drop(paths);

        self.by_path.insert(path.to_string(), id);
        debug!(path, id = id.0, "registered component path");
        id
    }

    /// Look up `path` without allocating.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<ComponentTypeId> {
        self.by_path.get(path).map(|id| *id)
    }

    /// Returns the path registered for `id`.
    #[must_use]
    pub fn path_of(&self, id: ComponentTypeId) -> Option<String> {
        let paths = self.paths.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        paths.get(id.index()).cloned()
    }

    /// Returns `true` if `id` was issued by this registry.
    #[must_use]
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        id.index() < self.len()
    }

    /// Returns the number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
