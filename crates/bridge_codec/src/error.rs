//! Codec error types.

/// Errors raised while converting a value to or from its boundary text.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failed to encode a value to JSON text.
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// The payload does not match the shape the receiver expected.
    #[error("failed to decode payload as `{expected}`: {source}")]
    Decode {
        /// Rust type name the receiver asked for.
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
