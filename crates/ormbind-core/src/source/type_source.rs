//! Declared type information for an attribute.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A named type parameter.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct TypeParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value as written.
    pub value: String,
}

/// Type information as declared by the mapping source.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct TypeSource {
    /// Explicit type name overriding the host type default.
    #[serde(default)]
    pub explicit_type_name: Option<String>,
    /// Host type name, e.g. `String` or `HashSet<String>`.
    pub host_type: String,
    /// Ordered type parameters.
    #[serde(default)]
    pub parameters: Vec<TypeParameter>,
}

impl TypeSource {
    /// Type inferred from the host type.
    pub fn host(host_type: impl Into<String>) -> Self {
        Self {
            explicit_type_name: None,
            host_type: host_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Type named explicitly.
    pub fn explicit(type_name: impl Into<String>, host_type: impl Into<String>) -> Self {
        Self {
            explicit_type_name: Some(type_name.into()),
            host_type: host_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a type parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(TypeParameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}
