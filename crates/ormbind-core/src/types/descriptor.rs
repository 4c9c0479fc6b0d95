//! Attribute type descriptors.

use indexmap::IndexMap;

use super::TypeMapping;

/// The resolved type of one attribute, collection key or element.
///
/// Equality compares every field, which is what key/identifier agreement
/// checks rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub(crate) explicit_type_name: Option<String>,
    pub(crate) host_type_name: String,
    pub(crate) type_parameters: IndexMap<String, String>,
    pub(crate) resolved_mapping: TypeMapping,
    pub(crate) to_one: bool,
}

impl TypeDescriptor {
    /// Type name given explicitly by the mapping, if any.
    pub fn explicit_type_name(&self) -> Option<&str> {
        self.explicit_type_name.as_deref()
    }

    /// Declared host type name.
    pub fn host_type_name(&self) -> &str {
        &self.host_type_name
    }

    /// Type parameters in declared order.
    pub fn type_parameters(&self) -> &IndexMap<String, String> {
        &self.type_parameters
    }

    /// The resolved mapping.
    pub fn resolved_mapping(&self) -> &TypeMapping {
        &self.resolved_mapping
    }

    /// Whether the attribute is a to-one association.
    pub fn is_to_one(&self) -> bool {
        self.to_one
    }
}
