//! Entity bindings.

use indexmap::IndexMap;

use super::PluralAttributeId;
use crate::relational::{ColumnId, TableId};
use crate::types::TypeDescriptor;

/// The resolved binding of one mapped entity.
#[derive(Debug, Clone)]
pub struct EntityBinding {
    pub(crate) name: String,
    pub(crate) primary_table: TableId,
    pub(crate) identifier: EntityIdentifier,
    pub(crate) attributes: IndexMap<String, AttributeBinding>,
}

impl EntityBinding {
    /// Entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entity's primary table.
    pub fn primary_table(&self) -> TableId {
        self.primary_table
    }

    /// The identifier binding.
    pub fn entity_identifier(&self) -> &EntityIdentifier {
        &self.identifier
    }

    /// Find an attribute binding by name. The identifier is included.
    pub fn locate_attribute_binding(&self, name: &str) -> Option<&AttributeBinding> {
        self.attributes.get(name)
    }

    /// Attribute bindings in declaration order, identifier first.
    pub fn attribute_bindings(&self) -> impl Iterator<Item = (&str, &AttributeBinding)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// The key attribute of an entity, bound to its primary key columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityIdentifier {
    pub(crate) attribute: SingularAttributeBinding,
}

impl EntityIdentifier {
    /// The identifier attribute's binding.
    pub fn value_binding(&self) -> &SingularAttributeBinding {
        &self.attribute
    }

    /// Shorthand for the identifier attribute's type.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.attribute.type_descriptor
    }

    /// Primary key columns, in key order.
    pub fn columns(&self) -> &[ColumnId] {
        &self.attribute.columns
    }
}

/// A scalar attribute bound to columns of its owner's primary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SingularAttributeBinding {
    pub(crate) name: String,
    pub(crate) columns: Vec<ColumnId>,
    pub(crate) type_descriptor: TypeDescriptor,
}

impl SingularAttributeBinding {
    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing columns in declared order.
    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Resolved type.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.type_descriptor
    }
}

/// Any attribute bound on an entity.
///
/// Plural attributes are held by handle; equal handles mean the same
/// collection binding.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeBinding {
    /// A scalar attribute.
    Singular(SingularAttributeBinding),
    /// A collection-valued attribute.
    Plural(PluralAttributeId),
}

impl AttributeBinding {
    /// The singular binding, if this is one.
    pub fn as_singular(&self) -> Option<&SingularAttributeBinding> {
        match self {
            AttributeBinding::Singular(binding) => Some(binding),
            AttributeBinding::Plural(_) => None,
        }
    }

    /// The plural handle, if this is one.
    pub fn as_plural(&self) -> Option<PluralAttributeId> {
        match self {
            AttributeBinding::Singular(_) => None,
            AttributeBinding::Plural(id) => Some(*id),
        }
    }
}
