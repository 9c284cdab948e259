//! ID-resolved query descriptors and the rows they produce.
//!
//! A [`QueryDescriptor`] is what the host scheduler understands. It has three
//! relations:
//!
//! - `components`: positional data returned in every row, in this order.
//! - `with`: required but not returned.
//! - `without`: excluded.
//!
//! An entity matches iff it holds every type in `components` and `with` and
//! none in `without`. The descriptor itself never filters anything.

use serde::{Deserialize, Serialize};

use crate::component::{ComponentTypeId, SerializedComponent};
use crate::entity::Entity;
use crate::error::BridgeError;

/// Describes which entities a system wants and which of their values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Component types returned positionally in every row.
    pub components: Vec<ComponentTypeId>,
    /// Component types the entity must hold (not returned).
    pub with: Vec<ComponentTypeId>,
    /// Component types the entity must not hold.
    pub without: Vec<ComponentTypeId>,
}

impl QueryDescriptor {
    /// Create a new empty query descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a returned component.
    #[must_use]
    pub fn component(mut self, id: ComponentTypeId) -> Self {
        self.components.push(id);
        self
    }

    /// Append a required, not returned component.
    #[must_use]
    pub fn with(mut self, id: ComponentTypeId) -> Self {
        self.with.push(id);
        self
    }

    /// Append an excluded component.
    #[must_use]
    pub fn without(mut self, id: ComponentTypeId) -> Self {
        self.without.push(id);
        self
    }

    /// Every ID the descriptor mentions, across all three relations.
    pub fn referenced_types(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.components
            .iter()
            .chain(&self.with)
            .chain(&self.without)
            .copied()
    }

    /// Returns the required component types (`components` then `with`).
    #[must_use]
    pub fn required_types(&self) -> Vec<ComponentTypeId> {
        let mut types = Vec::with_capacity(self.components.len() + self.with.len());
        types.extend_from_slice(&self.components);
        types.extend_from_slice(&self.with);
        types
    }

    /// Rejects descriptors that can never match anything.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsatisfiableQuery`] naming the first `without`
    /// ID that also appears in `components` or `with`.
    pub fn validate(&self) -> Result<(), BridgeError> {
        match self
            .without
            .iter()
            .find(|id| self.components.contains(id) || self.with.contains(id))
        {
            Some(&id) => Err(BridgeError::UnsatisfiableQuery { id }),
            None => Ok(()),
        }
    }

    /// Evaluate the matching rule against an entity's type set.
    pub fn matches(&self, has: impl Fn(ComponentTypeId) -> bool) -> bool {
        self.components.iter().all(|&id| has(id))
            && self.with.iter().all(|&id| has(id))
            && !self.without.iter().any(|&id| has(id))
    }
}

/// One matched entity.
///
/// `components` is positionally aligned with the query's `components` list:
/// same length, same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResultEntry {
    /// The matched entity.
    pub entity: Entity,
    /// Values in query order.
    pub components: Vec<SerializedComponent>,
}

impl QueryResultEntry {
    /// Returns the component at `position` in query order.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&SerializedComponent> {
        self.components.get(position)
    }
}

/// All rows matched by one query during one tick.
pub type QueryRows = Vec<QueryResultEntry>;
