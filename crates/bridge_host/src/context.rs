//! Per-call host handle given to a guest.
//!
//! A [`HostContext`] exists only for the duration of one guest entry point
//! (`setup` or one system invocation). It borrows the host state that call
//! may touch and checks every boundary call before anything is mutated.

use bridge_component::{
    BridgeError, ComponentTypeId, Entity, GuestId, HostEcs, QueryDescriptor, SerializedComponent,
};
use tracing::{debug, trace};

use crate::registry::ComponentRegistry;
use crate::system::SystemRegistry;
use crate::world::World;

/// Which guest entry point is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Inside the guest's one-time `setup`.
    Setup,
    /// Inside a per-tick system invocation.
    System,
}

/// The [`HostEcs`] implementation handed to a guest for one call.
#[derive(Debug)]
pub struct HostContext<'a> {
    registry: &'a ComponentRegistry,
    world: &'a mut World,
    systems: &'a mut SystemRegistry,
    guest: GuestId,
    guest_name: &'a str,
    phase: CallPhase,
    allow_late_registration: bool,
    spawned: Vec<Entity>,
}

impl<'a> HostContext<'a> {
    /// Create a context for one call of `guest`.
    #[must_use]
    pub fn new(
        registry: &'a ComponentRegistry,
        world: &'a mut World,
        systems: &'a mut SystemRegistry,
        guest: GuestId,
        guest_name: &'a str,
        phase: CallPhase,
        allow_late_registration: bool,
    ) -> Self {
        Self {
            registry,
            world,
            systems,
            guest,
            guest_name,
            phase,
            allow_late_registration,
            spawned: Vec::new(),
        }
    }

    /// Entities spawned through this context so far.
    #[must_use]
    pub fn spawned(&self) -> &[Entity] {
        &self.spawned
    }

    fn registration_open(&self, call: &'static str) -> Result<(), BridgeError> {
        if self.phase == CallPhase::Setup || self.allow_late_registration {
            Ok(())
        } else {
            Err(BridgeError::RegistrationClosed { call })
        }
    }

    fn check_query(&self, query: &QueryDescriptor) -> Result<(), BridgeError> {
        if let Some(id) = query.referenced_types().find(|&id| !self.registry.contains(id)) {
            return Err(BridgeError::UnknownComponentId(id));
        }
        query.validate()
    }
}

impl HostEcs for HostContext<'_> {
    fn register_component(&mut self, path: &str) -> Result<ComponentTypeId, BridgeError> {
        self.registration_open("register_component")?;
        let id = self.registry.register(path);
        trace!(guest = self.guest_name, path, id = id.0, "register_component");
        Ok(id)
    }

    fn resolve_component(&self, path: &str) -> Option<ComponentTypeId> {
        self.registry.resolve(path)
    }

    fn register_system(&mut self, name: &str, queries: Vec<QueryDescriptor>) -> Result<(), BridgeError> {
        self.registration_open("register_system")?;
        for query in &queries {
            self.check_query(query)?;
        }
        self.systems
            .register(self.guest, self.guest_name, name, queries)
    }

    fn spawn(&mut self, components: Vec<SerializedComponent>) -> Result<Entity, BridgeError> {
        if let Some(component) = components.iter().find(|c| !self.registry.contains(c.id)) {
            return Err(BridgeError::UnregisteredSpawnComponent(component.id));
        }
        let count = components.len();
        let entity = self.world.spawn(components);
        self.spawned.push(entity);
        debug!(guest = self.guest_name, %entity, components = count, "spawn");
        Ok(entity)
    }

    fn set_component(&mut self, entity: Entity, component: SerializedComponent) -> Result<(), BridgeError> {
        if !self.registry.contains(component.id) {
            return Err(BridgeError::UnknownComponentId(component.id));
        }
        self.world.insert(entity, component)
    }
}
