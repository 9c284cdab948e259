//! # bridge_guest
//!
//! Guest-side SDK for the ECS bridge. It turns closures into a module the
//! host can drive through [`Guest`](bridge_component::Guest):
//!
//! 1. `setup` registers component paths and systems and may spawn entities.
//! 2. Each tick the host calls every registered system with its rows.
//!
//! ## Usage
//!
//! ```rust
//! use bridge_guest::{GuestModule, PathQuery, SpawnBatch};
//!
//! let module = GuestModule::new("snakes", |ctx| {
//!     ctx.register_path("Boa")?;
//!     ctx.add_system("count", [PathQuery::new().component("Boa")], |call| {
//!         tracing::info!(boas = call.query(0)?.len(), "counted");
//!         Ok(())
//!     })?;
//!     ctx.spawn(SpawnBatch::new().with_encoded("Boa", r#"{"kind":"Boa"}"#))?;
//!     Ok(())
//! });
//! assert_eq!(bridge_component::Guest::name(&module), "snakes");
//! ```

pub mod cache;
pub mod context;
pub mod module;
pub mod query;
pub mod spawn;
#[cfg(test)]
mod testing;

pub use bridge_codec::{CodecError, decode, encode};
pub use cache::ComponentCache;
pub use context::{GuestContext, SetupContext, SystemCall};
pub use module::GuestModule;
pub use query::PathQuery;
pub use spawn::SpawnBatch;
