//! Typed spawn batches.

use bridge_codec::CodecError;
use bridge_component::Component;

/// Components for one entity, keyed by path and already encoded.
///
/// Paths are resolved to IDs only when the batch is handed to the host, so a
/// batch can be built before the context that spawns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnBatch {
    entries: Vec<(String, String)>,
}

impl SpawnBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `value` and add it under its type path.
    ///
    /// # Errors
    ///
    /// Returns the codec error if `value` cannot be encoded.
    pub fn with<T: Component>(mut self, value: &T) -> Result<Self, CodecError> {
        let encoded = bridge_codec::encode(value)?;
        self.entries.push((T::type_path().to_string(), encoded));
        Ok(self)
    }

    /// Add an already encoded value under `path`.
    #[must_use]
    pub fn with_encoded(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((path.into(), value.into()));
        self
    }

    /// Returns the `(path, value)` pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the batch holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}
