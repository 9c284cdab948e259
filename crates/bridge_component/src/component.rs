//! Component identity and the boundary representation of a component value.
//!
//! ## Identity across the boundary
//!
//! The guest names component shapes with a type path string. The host owns
//! the translation of each path into a dense [`ComponentTypeId`]; the guest
//! only ever learns IDs by asking the host. Each path maps to exactly one ID
//! and each ID to exactly one path for the lifetime of the host process.

use std::fmt;

use bridge_codec::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A host-assigned component type identifier.
///
/// IDs are dense (`0, 1, 2, …`) in registration order, stable for the
/// lifetime of the host process and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentTypeId(pub u32);

impl ComponentTypeId {
    /// Create an ID from a raw index.
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

/// A component shape known to the guest.
///
/// Implementors are plain serde types; the host never sees them, only their
/// encoded text and the ID registered for [`Component::type_path`].
///
/// # Examples
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use bridge_component::Component;
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_path() -> &'static str { "demo::Health" }
/// }
/// ```
pub trait Component: Serialize + DeserializeOwned + 'static {
    /// The path this shape is registered under.
    ///
    /// Defaults to the Rust type name, which is unique within one build but
    /// not guaranteed stable across compiler versions. Override it when other
    /// guests must agree on the path.
    fn type_path() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One component value as it crosses the boundary.
///
/// `value` is opaque to the bridge: only the producer and the consumer know
/// how to decode it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedComponent {
    /// The registered type of the value.
    pub id: ComponentTypeId,
    /// The encoded value.
    pub value: String,
}

impl SerializedComponent {
    /// Pair an already-encoded value with its type ID.
    #[must_use]
    pub fn new(id: ComponentTypeId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }

    /// Encode a typed component value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the value cannot be serialised.
    pub fn encode<T: Component>(id: ComponentTypeId, value: &T) -> Result<Self, CodecError> {
        Ok(Self {
            id,
            value: bridge_codec::encode(value)?,
        })
    }

    /// Decode the payload as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        bridge_codec::decode(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_path() -> &'static str {
            "test::Health"
        }
    }

    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Unnamed;

    impl Component for Unnamed {}

    #[test]
    fn test_explicit_type_path() {
        assert_eq!(Health::type_path(), "test::Health");
    }

    #[test]
    fn test_default_type_path_is_type_name() {
        assert!(Unnamed::type_path().ends_with("Unnamed"));
    }

    #[test]
    fn test_serialized_component_typed_roundtrip() {
        let health = Health {
            current: 80.0,
            max: 100.0,
        };
        let component = SerializedComponent::encode(ComponentTypeId(3), &health).unwrap();
        assert_eq!(component.id, ComponentTypeId(3));
        assert_eq!(component.decode::<Health>().unwrap(), health);
    }

    #[test]
    fn test_serialized_component_decode_wrong_shape() {
        let component = SerializedComponent::new(ComponentTypeId(0), r#"{"kind":"Boa"}"#);
        assert!(component.decode::<Health>().is_err());
    }

    #[test]
    fn test_component_type_id_display() {
        assert_eq!(ComponentTypeId(7).to_string(), "ComponentTypeId(7)");
        assert_eq!(ComponentTypeId::from_raw(7).index(), 7);
    }
}
