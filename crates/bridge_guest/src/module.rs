//! Closure-backed guest modules.

use std::collections::HashMap;
use std::fmt;

use bridge_component::{Guest, GuestError, HostEcs, QueryRows};
use tracing::trace;

use crate::cache::ComponentCache;
use crate::context::{GuestContext, SetupContext, SystemCall};

type SetupFn = Box<dyn FnOnce(&mut SetupContext<'_>) -> Result<(), GuestError> + Send>;
pub(crate) type SystemFn = Box<dyn FnMut(&mut SystemCall<'_>) -> Result<(), GuestError> + Send>;
pub(crate) type SystemTable = HashMap<String, SystemFn>;

/// A guest built from a setup closure.
///
/// The setup closure runs once, when the host calls [`Guest::setup`]. Every
/// system it declares with [`SetupContext::add_system`] is registered with
/// the host and dispatched by name afterwards.
pub struct GuestModule {
    name: String,
    setup: Option<SetupFn>,
    systems: SystemTable,
    cache: ComponentCache,
}

impl GuestModule {
    /// Create a module named `name` whose setup is `setup`.
    pub fn new<F>(name: impl Into<String>, setup: F) -> Self
    where
        F: FnOnce(&mut SetupContext<'_>) -> Result<(), GuestError> + Send + 'static,
    {
        Self {
            name: name.into(),
            setup: Some(Box::new(setup)),
            systems: HashMap::new(),
            cache: ComponentCache::new(),
        }
    }

    /// Names of the systems declared so far, sorted.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.systems.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The path → ID cache this module has built up.
    #[must_use]
    pub fn cache(&self) -> &ComponentCache {
        &self.cache
    }
}

impl fmt::Debug for GuestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuestModule")
            .field("name", &self.name)
            .field("setup_pending", &self.setup.is_some())
            .field("systems", &self.system_names())
            .finish_non_exhaustive()
    }
}

impl Guest for GuestModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, host: &mut dyn HostEcs) -> Result<(), GuestError> {
        let setup = self
            .setup
            .take()
            .ok_or_else(|| GuestError::failed(format!("setup of `{}` already ran", self.name)))?;

        let result = {
            let mut ctx = SetupContext::new(GuestContext::new(host, &mut self.cache), &mut self.systems);
            setup(&mut ctx)
        };
        // The host drops whatever this guest registered when setup fails.
        if result.is_err() {
            self.systems.clear();
        }
        result
    }

    fn run_system(
        &mut self,
        system: &str,
        rows: Vec<QueryRows>,
        host: &mut dyn HostEcs,
    ) -> Result<(), GuestError> {
        let Some(run) = self.systems.get_mut(system) else {
            return Err(GuestError::UnknownSystem(system.to_string()));
        };
        trace!(guest = self.name.as_str(), system, "Running system");

        let mut call = SystemCall::new(system, rows, GuestContext::new(host, &mut self.cache));
        run(&mut call)
    }
}
