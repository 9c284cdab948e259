//! # bridge_component
//!
//! The vocabulary shared by both sides of the host/guest boundary. Nothing in
//! here holds a live reference into the other side: every cross-boundary value
//! is an opaque ID plus an opaque serialised payload.
//!
//! This crate provides:
//!
//! - [`ComponentTypeId`]: dense, host-assigned component type identifiers.
//! - [`Component`]: the guest-side trait naming a component shape by path.
//! - [`SerializedComponent`]: `{ id, value }` as it crosses the boundary.
//! - [`Entity`] / [`EntityAllocator`]: host-minted entity identifiers.
//! - [`QueryDescriptor`] / [`QueryResultEntry`]: ID-resolved queries and rows.
//! - [`ArchetypeTable`]: column storage of serialised values.
//! - [`HostEcs`] / [`Guest`]: the calls each side makes on the other.

pub mod archetype;
pub mod component;
pub mod entity;
pub mod error;
pub mod protocol;
pub mod query;

pub use archetype::{ArchetypeId, ArchetypeTable, Column};
pub use component::{Component, ComponentTypeId, SerializedComponent};
pub use entity::{Entity, EntityAllocator};
pub use error::{BridgeError, GuestError};
pub use protocol::{Guest, GuestId, HostEcs};
pub use query::{QueryDescriptor, QueryResultEntry, QueryRows};
