//! What a guest sees while inside one of its entry points.
//!
//! [`GuestContext`] wraps the host handle for the current call together with
//! the guest's path cache. [`SetupContext`] adds system registration on top of
//! it; [`SystemCall`] adds the rows the host resolved for this invocation.
//! Both deref to [`GuestContext`], so spawning and component writes look the
//! same in either phase.

use std::ops::{Deref, DerefMut};

use bridge_component::{
    BridgeError, Component, ComponentTypeId, Entity, GuestError, HostEcs, QueryDescriptor,
    QueryResultEntry, QueryRows, SerializedComponent,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::ComponentCache;
use crate::module::{SystemFn, SystemTable};
use crate::query::PathQuery;
use crate::spawn::SpawnBatch;

/// Host access shared by setup and system calls.
pub struct GuestContext<'a> {
    host: &'a mut dyn HostEcs,
    cache: &'a mut ComponentCache,
}

impl<'a> GuestContext<'a> {
    pub(crate) fn new(host: &'a mut dyn HostEcs, cache: &'a mut ComponentCache) -> Self {
        Self { host, cache }
    }

    /// Register `T` under its type path.
    ///
    /// # Errors
    ///
    /// Propagates the host's error.
    pub fn register<T: Component>(&mut self) -> Result<ComponentTypeId, BridgeError> {
        self.register_path(T::type_path())
    }

    /// Register a component path.
    ///
    /// # Errors
    ///
    /// Propagates the host's error.
    pub fn register_path(&mut self, path: &str) -> Result<ComponentTypeId, BridgeError> {
        self.cache.register(&mut *self.host, path)
    }

    /// Look up the ID of `T` without registering it.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownComponentPath`] if nobody registered `T`.
    pub fn resolve<T: Component>(&mut self) -> Result<ComponentTypeId, BridgeError> {
        self.resolve_path(T::type_path())
    }

    /// Look up the ID of a path without registering it.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownComponentPath`] if the path is unknown.
    pub fn resolve_path(&mut self, path: &str) -> Result<ComponentTypeId, BridgeError> {
        self.cache.resolve(&*self.host, path)
    }

    /// Compile a path-level query against the host's registry.
    ///
    /// # Errors
    ///
    /// See [`PathQuery::compile`].
    pub fn compile(&mut self, query: &PathQuery) -> Result<QueryDescriptor, BridgeError> {
        let Self { host, cache } = self;
        query.compile(|path| cache.resolve(&**host, path).ok())
    }

    /// Spawn one entity from a typed batch.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownComponentPath`] if a path in the batch is not
    /// registered; no entity is created.
    pub fn spawn(&mut self, batch: SpawnBatch) -> Result<Entity, BridgeError> {
        let mut components = Vec::with_capacity(batch.len());
        for (path, value) in batch.into_entries() {
            let id = self.resolve_path(&path)?;
            components.push(SerializedComponent::new(id, value));
        }
        self.host.spawn(components)
    }

    /// Spawn one entity from already serialised components.
    ///
    /// # Errors
    ///
    /// Propagates the host's error.
    pub fn spawn_serialized(&mut self, components: Vec<SerializedComponent>) -> Result<Entity, BridgeError> {
        self.host.spawn(components)
    }

    /// Encode `value` and write it onto `entity`.
    ///
    /// # Errors
    ///
    /// Fails if `T` is unregistered, cannot be encoded, or `entity` is gone.
    pub fn set<T: Component>(&mut self, entity: Entity, value: &T) -> Result<(), GuestError> {
        let id = self.resolve::<T>()?;
        let component = SerializedComponent::encode(id, value)?;
        self.host.set_component(entity, component)?;
        Ok(())
    }

    /// The raw host handle for this call.
    pub fn host(&mut self) -> &mut dyn HostEcs {
        &mut *self.host
    }
}

/// Context handed to a guest's setup closure.
pub struct SetupContext<'a> {
    ctx: GuestContext<'a>,
    systems: &'a mut SystemTable,
}

impl<'a> SetupContext<'a> {
    pub(crate) fn new(ctx: GuestContext<'a>, systems: &'a mut SystemTable) -> Self {
        Self { ctx, systems }
    }

    /// Declare a system: compile its queries, register it with the host and
    /// remember the closure to run when the host invokes `name`.
    ///
    /// # Errors
    ///
    /// Any query compile error, or the host's rejection of the registration.
    pub fn add_system<F>(
        &mut self,
        name: &str,
        queries: impl IntoIterator<Item = PathQuery>,
        system: F,
    ) -> Result<(), GuestError>
    where
        F: FnMut(&mut SystemCall<'_>) -> Result<(), GuestError> + Send + 'static,
    {
        let descriptors = queries
            .into_iter()
            .map(|query| self.ctx.compile(&query))
            .collect::<Result<Vec<_>, _>>()?;
        let query_count = descriptors.len();

        self.ctx.host.register_system(name, descriptors)?;

        let system: SystemFn = Box::new(system);
        self.systems.insert(name.to_string(), system);
        debug!(system = name, queries = query_count, "System declared");
        Ok(())
    }
}

impl<'a> Deref for SetupContext<'a> {
    type Target = GuestContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for SetupContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

/// One invocation of a guest system.
pub struct SystemCall<'a> {
    ctx: GuestContext<'a>,
    system: &'a str,
    rows: Vec<QueryRows>,
}

impl<'a> SystemCall<'a> {
    pub(crate) fn new(system: &'a str, rows: Vec<QueryRows>, ctx: GuestContext<'a>) -> Self {
        Self { ctx, system, rows }
    }

    /// The system name the host invoked.
    #[must_use]
    pub fn name(&self) -> &str {
        self.system
    }

    /// All query results, in declaration order.
    #[must_use]
    pub fn queries(&self) -> &[QueryRows] {
        &self.rows
    }

    /// Rows of the query declared at `index`.
    ///
    /// # Errors
    ///
    /// Fails if the system declared fewer queries.
    pub fn query(&self, index: usize) -> Result<&[QueryResultEntry], GuestError> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| GuestError::failed(format!("system `{}` has no query {index}", self.system)))
    }

    /// Decode column `position` of query `index` for every row.
    ///
    /// # Errors
    ///
    /// [`GuestError::Decode`] on the first value that does not decode into
    /// `T`, which aborts the invocation when propagated with `?`.
    pub fn decode_column<T: DeserializeOwned>(
        &self,
        index: usize,
        position: usize,
    ) -> Result<Vec<(Entity, T)>, GuestError> {
        self.query(index)?
            .iter()
            .map(|row| {
                let component = row.get(position).ok_or_else(|| {
                    GuestError::failed(format!("query {index} has no column {position}"))
                })?;
                Ok((row.entity, component.decode::<T>()?))
            })
            .collect()
    }
}

impl<'a> Deref for SystemCall<'a> {
    type Target = GuestContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for SystemCall<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}
