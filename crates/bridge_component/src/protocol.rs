//! The calls each side of the boundary makes on the other.
//!
//! The host drives a guest through [`Guest`]: `setup` once at load time, then
//! one `run_system` per registered system per tick. While inside either call
//! the guest reaches back into the host only through the [`HostEcs`] handle it
//! was given for that call. Every argument and result is an owned value, so
//! nothing borrowed from one side outlives the call that produced it.

use std::fmt;

use uuid::Uuid;

use crate::component::{ComponentTypeId, SerializedComponent};
use crate::entity::Entity;
use crate::error::{BridgeError, GuestError};
use crate::query::{QueryDescriptor, QueryRows};

/// Identifies one loaded guest instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuestId(pub Uuid);

impl GuestId {
    /// Mint a fresh random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Calls a guest makes on the host.
pub trait HostEcs {
    /// Register a component path, returning its ID. Registering a known path
    /// returns the existing ID.
    ///
    /// # Errors
    ///
    /// [`BridgeError::RegistrationClosed`] outside `setup` unless the host
    /// allows late registration.
    fn register_component(&mut self, path: &str) -> Result<ComponentTypeId, BridgeError>;

    /// Look up a path without registering it.
    fn resolve_component(&self, path: &str) -> Option<ComponentTypeId>;

    /// Bind the guest system `name` to its queries, in declaration order.
    ///
    /// # Errors
    ///
    /// [`BridgeError::DuplicateSystemName`], [`BridgeError::UnknownComponentId`],
    /// [`BridgeError::UnsatisfiableQuery`] or [`BridgeError::RegistrationClosed`].
    fn register_system(&mut self, name: &str, queries: Vec<QueryDescriptor>) -> Result<(), BridgeError>;

    /// Create one entity holding all of `components`.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnregisteredSpawnComponent`]; no entity is created.
    fn spawn(&mut self, components: Vec<SerializedComponent>) -> Result<Entity, BridgeError>;

    /// Insert or overwrite one component on a live entity.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownComponentId`] or [`BridgeError::EntityNotFound`];
    /// the entity is left unchanged.
    fn set_component(&mut self, entity: Entity, component: SerializedComponent) -> Result<(), BridgeError>;
}

/// Entry points a guest module exports to the host.
pub trait Guest: Send {
    /// A human-readable module name, used in logs.
    fn name(&self) -> &str;

    /// Called exactly once, before any tick.
    ///
    /// # Errors
    ///
    /// Any error aborts loading of this guest.
    fn setup(&mut self, host: &mut dyn HostEcs) -> Result<(), GuestError>;

    /// Called once per tick for each system the guest registered. `rows`
    /// holds one list per declared query, in declaration order.
    ///
    /// # Errors
    ///
    /// An error aborts this invocation only; other systems still run.
    fn run_system(
        &mut self,
        system: &str,
        rows: Vec<QueryRows>,
        host: &mut dyn HostEcs,
    ) -> Result<(), GuestError>;
}
