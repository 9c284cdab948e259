//! # bridge_host
//!
//! The host side of the ECS bridge. It owns entity storage and the tick
//! loop, and answers the boundary calls guests make.
//!
//! ## Startup sequence
//!
//! 1. Create one [`ComponentRegistry`] for the process and share it (`Arc`).
//! 2. Create a [`Host`] per world and [`load`](Host::load) guests; each
//!    guest's `setup` runs exactly once, registering components and systems.
//! 3. Call [`Host::tick`] (or [`run`](Host::run) / [`run_async`](Host::run_async)).
//!    Every tick invokes each system once, in registration order, with one
//!    row list per declared query.

pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod registry;
pub mod report;
pub mod system;
pub mod world;

pub use config::{HostConfig, TickConfig};
pub use context::{CallPhase, HostContext};
pub use error::HostError;
pub use host::{GuestState, Host};
pub use registry::ComponentRegistry;
pub use report::{InvocationOutcome, SystemInvocation, TickReport};
pub use system::{RegisteredSystem, SystemRegistry};
pub use world::World;
