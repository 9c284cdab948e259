//! Archetype definitions and storage.
//!
//! An archetype is a unique combination of component types. Entities sharing
//! the same set of components are grouped into the same table, one column
//! per type. Columns hold the serialised text of each value exactly as the
//! guest produced it; storage never interprets a payload.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::component::{ComponentTypeId, SerializedComponent};
use crate::entity::Entity;

/// Identifies an archetype table by its creation index.
///
/// Tables are never removed, so iterating them by ID visits them in creation
/// order, which keeps query results stable between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchetypeId(pub u32);

impl ArchetypeId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A column in an archetype table, storing values of a single type.
#[derive(Debug, Clone)]
pub struct Column {
    /// The component type stored in this column.
    pub type_id: ComponentTypeId,
    /// Serialised values, one per entity row.
    pub values: Vec<String>,
}

impl Column {
    /// Create a new empty column for the given component type.
    #[must_use]
    pub fn new(type_id: ComponentTypeId) -> Self {
        Self {
            type_id,
            values: Vec::new(),
        }
    }

    /// Returns the number of values stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if this column contains no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A table of entities sharing the same archetype (set of component types).
///
/// Data is stored in struct-of-arrays layout: one [`Column`] per component
/// type, with entity IDs stored in a parallel vector.
#[derive(Debug, Clone)]
pub struct ArchetypeTable {
    /// The archetype identifier.
    pub id: ArchetypeId,
    /// Sorted set of component type IDs that define this archetype.
    pub component_types: BTreeSet<ComponentTypeId>,
    /// Entity IDs in row order. `entities[i]` corresponds to row `i` in
    /// every column.
    pub entities: Vec<Entity>,
    /// One column per component type, in the same order as `component_types`.
    pub columns: Vec<Column>,
}

impl ArchetypeTable {
    /// Create a new, empty archetype table.
    #[must_use]
    pub fn new(id: ArchetypeId, component_types: BTreeSet<ComponentTypeId>) -> Self {
        let columns = component_types.iter().copied().map(Column::new).collect();
        Self {
            id,
            component_types,
            entities: Vec::new(),
            columns,
        }
    }

    /// Returns the number of entities in this archetype table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if this table has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns `true` if this archetype contains the given component type.
    #[must_use]
    pub fn has_component(&self, type_id: ComponentTypeId) -> bool {
        self.component_types.contains(&type_id)
    }

    /// Returns the column index for the given component type, if present.
    #[must_use]
    pub fn column_index(&self, type_id: ComponentTypeId) -> Option<usize> {
        self.columns.binary_search_by_key(&type_id, |c| c.type_id).ok()
    }

    /// Find the row index for a given entity.
    #[must_use]
    pub fn entity_row(&self, entity: Entity) -> Option<usize> {
        self.entities.iter().position(|&e| e == entity)
    }

    /// Append a row.
    ///
    /// `values` must hold exactly one entry per type of this archetype.
    /// Returns `false` and leaves the table untouched otherwise.
    pub fn push(&mut self, entity: Entity, mut values: BTreeMap<ComponentTypeId, String>) -> bool {
        if values.len() != self.columns.len()
            || !values.keys().all(|id| self.component_types.contains(id))
        {
            return false;
        }
        self.entities.push(entity);
        for column in &mut self.columns {
            if let Some(value) = values.remove(&column.type_id) {
                column.values.push(value);
            }
        }
        true
    }

    /// Remove a row by swapping the last row into its place.
    ///
    /// Returns the removed entity and its values in column order.
    pub fn swap_remove(&mut self, row: usize) -> Option<(Entity, Vec<SerializedComponent>)> {
        if row >= self.entities.len() {
            return None;
        }
        let entity = self.entities.swap_remove(row);
        let values = self
            .columns
            .iter_mut()
            .map(|column| SerializedComponent::new(column.type_id, column.values.swap_remove(row)))
            .collect();
        Some((entity, values))
    }

    /// Returns the serialised value of `type_id` at `row`.
    #[must_use]
    pub fn get(&self, row: usize, type_id: ComponentTypeId) -> Option<&str> {
        let column = &self.columns[self.column_index(type_id)?];
        column.values.get(row).map(String::as_str)
    }

    /// Overwrite the value of `type_id` at `row`. Returns `false` if the
    /// table has no such column or row.
    pub fn set(&mut self, row: usize, type_id: ComponentTypeId, value: String) -> bool {
        let Some(index) = self.column_index(type_id) else {
            return false;
        };
        match self.columns[index].values.get_mut(row) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy out the values of `row` for `types`, in the order given.
    ///
    /// Returns `None` if the row is out of range or a type is missing.
    #[must_use]
    pub fn row_values(&self, row: usize, types: &[ComponentTypeId]) -> Option<Vec<SerializedComponent>> {
        types
            .iter()
            .map(|&id| Some(SerializedComponent::new(id, self.get(row, id)?)))
            .collect()
    }
}
