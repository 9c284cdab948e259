//! Path-level query declarations.
//!
//! Guests declare what a system wants in terms of component paths; the
//! compiler below turns that into an ID-resolved [`QueryDescriptor`] the host
//! understands. Every path must already be known to the host.

use bridge_component::{BridgeError, Component, ComponentTypeId, QueryDescriptor};

/// A query written against component paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathQuery {
    /// Paths returned positionally in every row.
    pub components: Vec<String>,
    /// Paths the entity must hold.
    pub with: Vec<String>,
    /// Paths the entity must not hold.
    pub without: Vec<String>,
}

impl PathQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a returned component by path.
    #[must_use]
    pub fn component(mut self, path: impl Into<String>) -> Self {
        self.components.push(path.into());
        self
    }

    /// Append a required component by path.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>) -> Self {
        self.with.push(path.into());
        self
    }

    /// Append an excluded component by path.
    #[must_use]
    pub fn without(mut self, path: impl Into<String>) -> Self {
        self.without.push(path.into());
        self
    }

    /// Append a returned component by its Rust type.
    #[must_use]
    pub fn component_of<T: Component>(self) -> Self {
        self.component(T::type_path())
    }

    /// Append a required component by its Rust type.
    #[must_use]
    pub fn with_of<T: Component>(self) -> Self {
        self.with(T::type_path())
    }

    /// Append an excluded component by its Rust type.
    #[must_use]
    pub fn without_of<T: Component>(self) -> Self {
        self.without(T::type_path())
    }

    /// Resolve every path and produce a validated descriptor.
    ///
    /// Positional order of `components` is preserved.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownComponentPath`] for the first path `resolve`
    /// cannot map, or [`BridgeError::UnsatisfiableQuery`] when a path is both
    /// required and excluded.
    pub fn compile(
        &self,
        mut resolve: impl FnMut(&str) -> Option<ComponentTypeId>,
    ) -> Result<QueryDescriptor, BridgeError> {
        let mut lookup = |paths: &[String]| -> Result<Vec<ComponentTypeId>, BridgeError> {
            paths
                .iter()
                .map(|path| resolve(path.as_str()).ok_or_else(|| BridgeError::UnknownComponentPath(path.clone())))
                .collect()
        };

        let descriptor = QueryDescriptor {
            components: lookup(&self.components)?,
            with: lookup(&self.with)?,
            without: lookup(&self.without)?,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}
