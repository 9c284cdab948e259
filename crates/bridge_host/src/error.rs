//! Host-level error types.

use bridge_component::{BridgeError, GuestError};

/// Errors raised while loading a guest instance.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The guest's `setup` returned an error; the guest was not loaded.
    #[error("setup of guest `{guest}` failed: {source}")]
    Setup {
        /// Name of the failing guest.
        guest: String,
        #[source]
        source: GuestError,
    },

    /// A host-side precondition failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
