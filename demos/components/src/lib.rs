//! Component definitions used by the demo guests.
//!
//! Each type names itself with a stable path so that independently compiled
//! guests agree on the same component ID.

use bridge_component::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A tagged snake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Boa {
    /// Species label.
    pub kind: String,
}

impl Boa {
    /// Create a new boa of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl Component for Boa {
    fn type_path() -> &'static str {
        "Boa"
    }
}

/// First half of the minimal two-component demo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirstComponent {
    pub first: usize,
}

impl Component for FirstComponent {
    fn type_path() -> &'static str {
        "demo::FirstComponent"
    }
}

/// Second half of the minimal two-component demo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecondComponent {
    pub second: usize,
}

impl Component for SecondComponent {
    fn type_path() -> &'static str {
        "demo::SecondComponent"
    }
}

/// A 3D velocity component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    /// Linear velocity in world units per tick.
    pub linear: Vec3,
}

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self { linear: Vec3::ZERO };

    /// Create a new velocity.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Component for Velocity {
    fn type_path() -> &'static str {
        "demo::Velocity"
    }
}

/// A simple name tag for debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Name {
    /// The entity's display name.
    pub value: String,
}

impl Name {
    /// Create a new name component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl Component for Name {
    fn type_path() -> &'static str {
        "demo::Name"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boa_wire_form() {
        let text = bridge_codec::encode(&Boa::new("Boa")).unwrap();
        assert_eq!(text, r#"{"kind":"Boa"}"#);
        let back: Boa = bridge_codec::decode(&text).unwrap();
        assert_eq!(back, Boa::new("Boa"));
    }

    #[test]
    fn test_velocity_serialization() {
        let v = Velocity::new(1.0, 2.0, 3.0);
        let text = bridge_codec::encode(&v).unwrap();
        let restored: Velocity = bridge_codec::decode(&text).unwrap();
        assert_eq!(v, restored);
    }

    #[test]
    fn test_paths_are_distinct() {
        let mut paths = vec![
            Boa::type_path(),
            FirstComponent::type_path(),
            SecondComponent::type_path(),
            Velocity::type_path(),
            Name::type_path(),
        ];
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), 5);
    }

    #[test]
    fn test_first_component_does_not_decode_as_second() {
        let text = bridge_codec::encode(&FirstComponent { first: 18 }).unwrap();
        assert!(bridge_codec::decode::<SecondComponent>(&text).is_err());
    }
}
