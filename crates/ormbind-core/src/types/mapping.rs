//! Resolved type mappings.

use crate::binding::PluralAttributeNature;
use crate::relational::SqlType;

/// A scalar type known to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicType {
    /// Registered name, e.g. `string`.
    pub name: String,
    /// Host type this is the default mapping for, e.g. `String`.
    pub host_type: String,
    /// Column data type.
    pub sql_type: SqlType,
}

impl BasicType {
    /// Create a basic type.
    pub fn new(name: impl Into<String>, host_type: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            host_type: host_type.into(),
            sql_type,
        }
    }
}

/// A collection type bound to one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionType {
    /// Collection nature this type implements.
    pub nature: PluralAttributeNature,
    /// Role string `<Entity>.<attribute>`.
    pub role: String,
}

/// The mapping an attribute's type resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeMapping {
    /// A scalar mapping.
    Basic(BasicType),
    /// A collection mapping.
    Collection(CollectionType),
}

impl TypeMapping {
    /// Column data type, for scalar mappings.
    pub fn sql_type(&self) -> Option<SqlType> {
        match self {
            TypeMapping::Basic(basic) => Some(basic.sql_type),
            TypeMapping::Collection(_) => None,
        }
    }

    /// Collection nature, for collection mappings.
    pub fn collection_nature(&self) -> Option<PluralAttributeNature> {
        match self {
            TypeMapping::Basic(_) => None,
            TypeMapping::Collection(collection) => Some(collection.nature),
        }
    }

    /// Collection role, for collection mappings.
    pub fn role(&self) -> Option<&str> {
        match self {
            TypeMapping::Basic(_) => None,
            TypeMapping::Collection(collection) => Some(&collection.role),
        }
    }

    /// Check if this is a collection mapping.
    pub fn is_collection_type(&self) -> bool {
        matches!(self, TypeMapping::Collection(_))
    }

    /// Check if this is a component (embedded) mapping. Always false for now.
    pub fn is_component_type(&self) -> bool {
        false
    }
}
