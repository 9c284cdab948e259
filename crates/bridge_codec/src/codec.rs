//! JSON text codec helpers.
//!
//! Thin wrappers around `serde_json`. Every component value exchanged at the
//! boundary is a JSON document, so the producer and the consumer only have to
//! agree on the shape, never on a binary layout.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Encode a value to its boundary text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails (for example a map
/// with non-string keys).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(CodecError::Encode)
}

/// Decode boundary text into the shape `T`.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the text is not valid JSON or does not
/// match `T`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(|source| CodecError::Decode {
        expected: std::any::type_name::<T>(),
        source,
    })
}
