//! The host: guest loading and the tick loop.
//!
//! Each tick walks the system registry in registration order. For every
//! system it first resolves all of the system's queries against the current
//! world, then invokes the owning guest exactly once with the nested result.
//! A system that fails is logged and recorded; the tick carries on with the
//! next system.

use std::sync::Arc;
use std::time::Instant;

use bridge_component::{BridgeError, Guest, GuestId, QueryRows};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::HostConfig;
use crate::context::{CallPhase, HostContext};
use crate::error::HostError;
use crate::registry::ComponentRegistry;
use crate::report::{InvocationOutcome, SystemInvocation, TickReport};
use crate::system::SystemRegistry;
use crate::world::World;

/// Lifecycle of a guest instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestState {
    /// Added, `setup` not yet called.
    Loaded,
    /// `setup` succeeded; its systems are dispatched every tick.
    Ready,
    /// `setup` failed; the instance is never called again.
    Failed,
}

struct GuestInstance {
    id: GuestId,
    name: String,
    guest: Box<dyn Guest>,
    state: GuestState,
}

/// One host: a world, its systems, and the guests that registered them.
pub struct Host {
    registry: Arc<ComponentRegistry>,
    world: World,
    systems: SystemRegistry,
    guests: Vec<GuestInstance>,
    config: HostConfig,
    tick_id: u64,
}

impl Host {
    /// Create a host sharing the process-wide component `registry`.
    #[must_use]
    pub fn new(registry: Arc<ComponentRegistry>, config: HostConfig) -> Self {
        Self {
            registry,
            world: World::new(),
            systems: SystemRegistry::new(),
            guests: Vec::new(),
            config,
            tick_id: 0,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the shared component registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world, for host-native lifecycle
    /// operations such as despawning.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns a reference to the system registry.
    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Returns the host configuration.
    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Returns the state of a guest instance.
    #[must_use]
    pub fn guest_state(&self, id: GuestId) -> Option<GuestState> {
        self.guests.iter().find(|g| g.id == id).map(|g| g.state)
    }

    /// Returns the number of guest instances, including failed ones.
    #[must_use]
    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    /// Add a guest instance without running its `setup`.
    pub fn add_guest(&mut self, guest: Box<dyn Guest>) -> GuestId {
        let id = GuestId::new();
        let name = guest.name().to_string();
        debug!(guest = name.as_str(), %id, "guest added");
        self.guests.push(GuestInstance {
            id,
            name,
            guest,
            state: GuestState::Loaded,
        });
        id
    }

    /// Run the one-time `setup` of a guest added with [`add_guest`](Self::add_guest).
    ///
    /// On failure every system the guest registered is removed and the guest
    /// is marked [`GuestState::Failed`].
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownGuest`], [`BridgeError::SetupAlreadyRun`], or
    /// [`HostError::Setup`] carrying the guest's error.
    pub fn setup_guest(&mut self, id: GuestId) -> Result<(), HostError> {
        let instance = self
            .guests
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(BridgeError::UnknownGuest(id))?;
        if instance.state != GuestState::Loaded {
            return Err(BridgeError::SetupAlreadyRun(id).into());
        }

        let GuestInstance {
            name, guest, state, ..
        } = instance;
        let mut ctx = HostContext::new(
            &self.registry,
            &mut self.world,
            &mut self.systems,
            id,
            name,
            CallPhase::Setup,
            self.config.allow_late_registration,
        );
        let result = guest.setup(&mut ctx);
        let spawned = ctx.spawned().len();

        match result {
            Ok(()) => {
                *state = GuestState::Ready;
                info!(
                    guest = name.as_str(),
                    %id,
                    systems = self.systems.systems_of(id).count(),
                    spawned,
                    "guest loaded"
                );
                Ok(())
            }
            Err(source) => {
                *state = GuestState::Failed;
                let removed = self.systems.remove_guest(id);
                error!(guest = name.as_str(), %id, removed, error = %source, "guest setup failed");
                Err(HostError::Setup {
                    guest: name.clone(),
                    source,
                })
            }
        }
    }

    /// Add a guest and run its `setup`.
    ///
    /// # Errors
    ///
    /// [`HostError::Setup`] if the guest's `setup` fails; the instance stays
    /// in the host as [`GuestState::Failed`].
    pub fn load(&mut self, guest: Box<dyn Guest>) -> Result<GuestId, HostError> {
        let id = self.add_guest(guest);
        self.setup_guest(id)?;
        Ok(id)
    }

    /// Run one tick: every registered system of every ready guest, in
    /// registration order.
    pub fn tick(&mut self) -> TickReport {
        self.tick_id += 1;
        let mut report = TickReport::new(self.tick_id);

        // Systems registered during this tick run from the next one.
        let count = self.systems.len();
        debug!(tick_id = self.tick_id, systems = count, "tick start");

        for index in 0..count {
            let Some(system) = self.systems.get(index) else {
                break;
            };
            let guest_id = system.guest;
            let system_name = system.name.clone();

            let Some(instance) = self
                .guests
                .iter_mut()
                .find(|g| g.id == guest_id && g.state == GuestState::Ready)
            else {
                continue;
            };

            let rows: Vec<QueryRows> = system
                .queries
                .iter()
                .map(|query| self.world.query(query))
                .collect();
            let row_counts: Vec<usize> = rows.iter().map(Vec::len).collect();

            let GuestInstance { name, guest, .. } = instance;
            let mut ctx = HostContext::new(
                &self.registry,
                &mut self.world,
                &mut self.systems,
                guest_id,
                name,
                CallPhase::System,
                self.config.allow_late_registration,
            );
            let result = guest.run_system(&system_name, rows, &mut ctx);
            let spawned = ctx.spawned().len();

            let outcome = match result {
                Ok(()) => InvocationOutcome::Completed,
                Err(err) => {
                    warn!(
                        tick_id = self.tick_id,
                        guest = name.as_str(),
                        system = system_name.as_str(),
                        error = %err,
                        "system invocation failed"
                    );
                    InvocationOutcome::failed(&err)
                }
            };

            report.invocations.push(SystemInvocation {
                guest: guest_id,
                guest_name: name.clone(),
                system: system_name,
                rows: row_counts,
                spawned,
                outcome,
            });
        }

        report
    }

    /// Run the tick loop for the configured number of ticks, or indefinitely.
    ///
    /// This is a blocking loop; see [`run_async`](Self::run_async) for the
    /// tokio-driven variant.
    pub fn run(&mut self) {
        let tick_duration = self.config.tick.period();
        let max_ticks = self.config.tick.max_ticks;
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick.tick_rate,
            max_ticks, "starting tick loop"
        );

        loop {
            let start = Instant::now();
            self.tick();

            tick_count += 1;
            if max_ticks > 0 && tick_count >= max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }

    /// Drive the tick loop from a tokio interval.
    ///
    /// Returns after `max_ticks` ticks, or never when `max_ticks` is 0.
    pub async fn run_async(&mut self) {
        let max_ticks = self.config.tick.max_ticks;
        let mut interval = tokio::time::interval(self.config.tick.period());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick.tick_rate,
            max_ticks, "starting async tick loop"
        );

        loop {
            interval.tick().await;
            let report = self.tick();
            if report.failure_count() > 0 {
                debug!(
                    tick_id = report.tick_id,
                    failures = report.failure_count(),
                    "tick finished with failures"
                );
            }

            tick_count += 1;
            if max_ticks > 0 && tick_count >= max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("tick_id", &self.tick_id)
            .field("guests", &self.guests.len())
            .field("systems", &self.systems.len())
            .field("entities", &self.world.entity_count())
            .finish()
    }
}
