//! World state storage for the host.
//!
//! The [`World`] holds the canonical entity and archetype data for one host.
//! It stores component values as the serialised text the guest sent and
//! evaluates query descriptors against archetype type sets.
//!
//! Every mutation completes before the method returns, and queries are only
//! evaluated between guest calls, so no query ever observes a half-built
//! entity.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bridge_component::{
    ArchetypeId, ArchetypeTable, BridgeError, ComponentTypeId, Entity, EntityAllocator,
    QueryDescriptor, QueryResultEntry, QueryRows, SerializedComponent,
};
use tracing::trace;

/// The canonical world state managed by the host.
///
/// Contains entity allocation, archetype storage, and entity-to-archetype
/// mapping.
#[derive(Debug, Default)]
pub struct World {
    /// Entity ID allocator.
    allocator: EntityAllocator,
    /// All archetype tables, indexed by `ArchetypeId`, in creation order.
    archetypes: Vec<ArchetypeTable>,
    /// Maps each live entity to the archetype it belongs to.
    entity_archetype: HashMap<Entity, ArchetypeId>,
    /// Maps component type sets to archetype IDs, for fast lookup.
    type_set_to_archetype: HashMap<BTreeSet<ComponentTypeId>, ArchetypeId>,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity holding `components`.
    ///
    /// The caller is responsible for having checked every ID against the
    /// registry. When the batch names the same type twice the later value
    /// wins.
    pub fn spawn(&mut self, components: Vec<SerializedComponent>) -> Entity {
        let values: BTreeMap<ComponentTypeId, String> =
            components.into_iter().map(|c| (c.id, c.value)).collect();
        let entity = self.allocator.allocate();
        self.place(entity, values);
        trace!(%entity, "spawned entity");
        entity
    }

    /// Insert or overwrite one component on a live entity, moving it to a
    /// new archetype when the type is new to it.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::EntityNotFound`] if the entity is not live.
    pub fn insert(&mut self, entity: Entity, component: SerializedComponent) -> Result<(), BridgeError> {
        let (archetype, row) = self
            .locate(entity)
            .ok_or(BridgeError::EntityNotFound(entity))?;
        let table = &mut self.archetypes[archetype.index()];

        if table.set(row, component.id, component.value.clone()) {
            return Ok(());
        }

        let Some((_, previous)) = table.swap_remove(row) else {
            return Err(BridgeError::EntityNotFound(entity));
        };
        let mut values: BTreeMap<ComponentTypeId, String> =
            previous.into_iter().map(|c| (c.id, c.value)).collect();
        values.insert(component.id, component.value);
        self.place(entity, values);
        trace!(%entity, id = component.id.0, "moved entity to a wider archetype");
        Ok(())
    }

    /// Destroy an entity, removing it from its archetype.
    ///
    /// This is host authority only; guests cannot despawn.
    ///
    /// Returns `true` if the entity existed and was removed.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Some((archetype, row)) = self.locate(entity) else {
            return false;
        };
        self.archetypes[archetype.index()].swap_remove(row);
        self.entity_archetype.remove(&entity);
        true
    }

    /// Returns `true` if the entity is live.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_archetype.contains_key(&entity)
    }

    /// Returns the serialised value of one component of an entity.
    #[must_use]
    pub fn get(&self, entity: Entity, id: ComponentTypeId) -> Option<&str> {
        let (archetype, row) = self.locate(entity)?;
        self.archetypes[archetype.index()].get(row, id)
    }

    /// Evaluate a query against the current state.
    ///
    /// Rows come out in archetype creation order, then row order within each
    /// table, so the result is stable as long as the world is not mutated.
    #[must_use]
    pub fn query(&self, descriptor: &QueryDescriptor) -> QueryRows {
        let mut rows = Vec::new();
        for table in self
            .archetypes
            .iter()
            .filter(|table| descriptor.matches(|id| table.has_component(id)))
        {
            rows.extend((0..table.len()).filter_map(|row| {
                Some(QueryResultEntry {
                    entity: table.entities[row],
                    components: table.row_values(row, &descriptor.components)?,
                })
            }));
        }
        rows
    }

    /// Returns the archetype ID for a given entity.
    #[must_use]
    pub fn entity_archetype(&self, entity: Entity) -> Option<ArchetypeId> {
        self.entity_archetype.get(&entity).copied()
    }

    /// Returns the total number of entities in the world.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_archetype.len()
    }

    /// Returns the number of archetypes in the world.
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    fn locate(&self, entity: Entity) -> Option<(ArchetypeId, usize)> {
        let archetype = *self.entity_archetype.get(&entity)?;
        let row = self.archetypes[archetype.index()].entity_row(entity)?;
        Some((archetype, row))
    }

    fn place(&mut self, entity: Entity, values: BTreeMap<ComponentTypeId, String>) {
        let types: BTreeSet<ComponentTypeId> = values.keys().copied().collect();
        let archetype = self.get_or_create_archetype(types);
        let pushed = self.archetypes[archetype.index()].push(entity, values);
        debug_assert!(pushed, "row key set must equal the archetype's type set");
        self.entity_archetype.insert(entity, archetype);
    }

    /// Get or create an archetype for the given set of component types.
    fn get_or_create_archetype(&mut self, component_types: BTreeSet<ComponentTypeId>) -> ArchetypeId {
        if let Some(&id) = self.type_set_to_archetype.get(&component_types) {
            return id;
        }

        let id = ArchetypeId(self.archetypes.len() as u32);
        self.archetypes
            .push(ArchetypeTable::new(id, component_types.clone()));
        self.type_set_to_archetype.insert(component_types, id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ComponentTypeId = ComponentTypeId(0);
    const B: ComponentTypeId = ComponentTypeId(1);
    const C: ComponentTypeId = ComponentTypeId(2);

    fn comp(id: ComponentTypeId, value: &str) -> SerializedComponent {
        SerializedComponent::new(id, value)
    }

    #[test]
    fn test_spawn_with_components() {
        let mut world = World::new();
        let e = world.spawn(vec![comp(A, "1"), comp(B, "2")]);
        assert_eq!(world.entity_archetype(e), Some(ArchetypeId(0)));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.archetype_count(), 1);
        assert_eq!(world.get(e, A), Some("1"));
        assert_eq!(world.get(e, C), None);
    }

    #[test]
    fn test_spawn_empty_batch() {
        let mut world = World::new();
        let e = world.spawn(Vec::new());
        assert!(world.contains(e));
        assert_eq!(world.query(&QueryDescriptor::new()).len(), 1);
    }

    #[test]
    fn test_spawn_duplicate_type_last_value_wins() {
        let mut world = World::new();
        let e = world.spawn(vec![comp(A, "1"), comp(A, "2")]);
        assert_eq!(world.get(e, A), Some("2"));
    }

    #[test]
    fn test_same_type_set_shares_archetype() {
        let mut world = World::new();
        let e1 = world.spawn(vec![comp(A, "1"), comp(B, "2")]);
        let e2 = world.spawn(vec![comp(B, "3"), comp(A, "4")]);
        assert_eq!(world.entity_archetype(e1), world.entity_archetype(e2));
        assert_eq!(world.archetype_count(), 1);
    }

    #[test]
    fn test_despawn() {
        let mut world = World::new();
        let e = world.spawn(vec![comp(A, "1")]);
        assert!(world.despawn(e));
        assert!(!world.despawn(e));
        assert_eq!(world.entity_count(), 0);
        assert!(world.query(&QueryDescriptor::new().component(A)).is_empty());
    }

    #[test]
    fn test_query_filters_and_orders_columns() {
        let mut world = World::new();
        let ab = world.spawn(vec![comp(A, "a1"), comp(B, "b1")]);
        let _a = world.spawn(vec![comp(A, "a2")]);
        let _abc = world.spawn(vec![comp(A, "a3"), comp(B, "b3"), comp(C, "c3")]);

        let q = QueryDescriptor::new().component(B).component(A).without(C);
        let rows = world.query(&q);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, ab);
        assert_eq!(rows[0].components, vec![comp(B, "b1"), comp(A, "a1")]);
    }

    #[test]
    fn test_query_with_is_not_returned() {
        let mut world = World::new();
        world.spawn(vec![comp(A, "a"), comp(B, "b")]);
        let rows = world.query(&QueryDescriptor::new().component(A).with(B));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].components, vec![comp(A, "a")]);
    }

    #[test]
    fn test_query_order_is_stable() {
        let mut world = World::new();
        for i in 0..5 {
            world.spawn(vec![comp(A, &i.to_string())]);
            world.spawn(vec![comp(A, &i.to_string()), comp(B, "x")]);
        }
        let q = QueryDescriptor::new().component(A);
        let first = world.query(&q);
        let second = world.query(&q);
        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut world = World::new();
        let e = world.spawn(vec![comp(A, "1")]);
        world.insert(e, comp(A, "2")).unwrap();
        assert_eq!(world.get(e, A), Some("2"));
        assert_eq!(world.archetype_count(), 1);
    }

    #[test]
    fn test_insert_new_type_moves_entity() {
        let mut world = World::new();
        let e1 = world.spawn(vec![comp(A, "1")]);
        let e2 = world.spawn(vec![comp(A, "2")]);
        world.insert(e1, comp(B, "b")).unwrap();

        assert_eq!(world.archetype_count(), 2);
        assert_eq!(world.get(e1, A), Some("1"));
        assert_eq!(world.get(e1, B), Some("b"));
        assert_eq!(world.get(e2, A), Some("2"));
        assert_eq!(world.query(&QueryDescriptor::new().component(B)).len(), 1);
        assert_eq!(world.query(&QueryDescriptor::new().component(A)).len(), 2);
    }

    #[test]
    fn test_insert_on_missing_entity() {
        let mut world = World::new();
        assert_eq!(
            world.insert(Entity::from_test_id(42), comp(A, "1")),
            Err(BridgeError::EntityNotFound(Entity::from_test_id(42)))
        );
    }
}
