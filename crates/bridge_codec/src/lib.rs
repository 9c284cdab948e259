//! # bridge_codec
//!
//! Guest-local codec for component values. A value crosses the host/guest
//! boundary as a self-describing JSON string; the host transports it verbatim
//! and never parses it.
//!
//! - [`encode`] / [`decode`]: JSON text helpers.
//! - [`CodecError`]: encode and decode failures.

pub mod codec;
pub mod error;

pub use codec::{decode, encode};
pub use error::CodecError;
