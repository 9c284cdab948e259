//! A recording [`HostEcs`] for unit tests.

use bridge_component::{
    BridgeError, ComponentTypeId, Entity, HostEcs, QueryDescriptor, SerializedComponent,
};

#[derive(Debug, Default)]
pub(crate) struct MockHost {
    pub paths: Vec<String>,
    pub systems: Vec<(String, Vec<QueryDescriptor>)>,
    pub spawned: Vec<Vec<SerializedComponent>>,
    pub writes: Vec<(Entity, SerializedComponent)>,
    pub register_calls: usize,
    pub closed: bool,
}

impl HostEcs for MockHost {
    fn register_component(&mut self, path: &str) -> Result<ComponentTypeId, BridgeError> {
        if self.closed {
            return Err(BridgeError::RegistrationClosed { call: "register_component" });
        }
        self.register_calls += 1;
        let index = match self.paths.iter().position(|p| p == path) {
            Some(index) => index,
            None => {
                self.paths.push(path.to_string());
                self.paths.len() - 1
            }
        };
        Ok(ComponentTypeId(index as u32))
    }

    fn resolve_component(&self, path: &str) -> Option<ComponentTypeId> {
        self.paths
            .iter()
            .position(|p| p == path)
            .map(|index| ComponentTypeId(index as u32))
    }

    fn register_system(&mut self, name: &str, queries: Vec<QueryDescriptor>) -> Result<(), BridgeError> {
        if self.systems.iter().any(|(n, _)| n == name) {
            return Err(BridgeError::DuplicateSystemName {
                guest: "mock".into(),
                name: name.into(),
            });
        }
        self.systems.push((name.to_string(), queries));
        Ok(())
    }

    fn spawn(&mut self, components: Vec<SerializedComponent>) -> Result<Entity, BridgeError> {
        self.spawned.push(components);
        Ok(Entity::from_test_id(self.spawned.len() as u64))
    }

    fn set_component(&mut self, entity: Entity, component: SerializedComponent) -> Result<(), BridgeError> {
        self.writes.push((entity, component));
        Ok(())
    }
}
