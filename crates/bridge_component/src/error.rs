//! Error types shared by both sides of the boundary.
//!
//! [`BridgeError`] covers failures of a boundary call: they are raised by the
//! host (or by the guest-side query compiler) and are always surfaced
//! synchronously to the caller. [`GuestError`] is what a guest entry point
//! returns to the host; it wraps a [`BridgeError`] when the guest simply
//! propagated one with `?`.

use bridge_codec::CodecError;

use crate::component::ComponentTypeId;
use crate::entity::Entity;
use crate::protocol::GuestId;

/// Errors raised by a boundary call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// A path was referenced before being registered.
    #[error("unknown component path `{0}`")]
    UnknownComponentPath(String),

    /// A query descriptor references an ID the registry never issued.
    #[error("unknown component id {0}")]
    UnknownComponentId(ComponentTypeId),

    /// A guest instance registered the same system name twice.
    #[error("system `{name}` is already registered by guest `{guest}`")]
    DuplicateSystemName {
        /// Name of the registering guest instance.
        guest: String,
        /// The conflicting system name.
        name: String,
    },

    /// An ID is both required and excluded by the same query.
    #[error("query both requires and excludes {id}")]
    UnsatisfiableQuery {
        /// The conflicting component type.
        id: ComponentTypeId,
    },

    /// A spawn batch references an ID the registry never issued.
    #[error("spawn references unregistered {0}")]
    UnregisteredSpawnComponent(ComponentTypeId),

    /// A registration call arrived after the guest finished `setup`.
    #[error("`{call}` is only accepted during setup")]
    RegistrationClosed {
        /// The rejected boundary call.
        call: &'static str,
    },

    /// The entity does not exist (never spawned or already despawned).
    #[error("{0} not found")]
    EntityNotFound(Entity),

    /// No guest instance with this ID is loaded.
    #[error("guest {0} is not loaded")]
    UnknownGuest(GuestId),

    /// `setup` was requested a second time for the same instance.
    #[error("setup already ran for guest {0}")]
    SetupAlreadyRun(GuestId),
}

/// Errors returned by a guest entry point (`setup` or a system).
#[derive(Debug, thiserror::Error)]
pub enum GuestError {
    /// A received value did not decode into the expected shape.
    #[error(transparent)]
    Decode(#[from] CodecError),

    /// A boundary call made by the guest failed.
    #[error(transparent)]
    Host(#[from] BridgeError),

    /// The host invoked a system name the guest does not export.
    #[error("guest exports no system named `{0}`")]
    UnknownSystem(String),

    /// Any other failure reported by guest code.
    #[error("{0}")]
    Failed(String),
}

impl GuestError {
    /// Build a [`GuestError::Failed`] from any message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Returns `true` if this error came from decoding a received value.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
