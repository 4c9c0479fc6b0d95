//! Collection bindings.

use super::{PluralAttributeElementNature, PluralAttributeNature};
use crate::relational::{ColumnId, ForeignKeyId, TableId};
use crate::types::TypeDescriptor;

/// Handle to a collection binding within one [`Metadata`](super::Metadata).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluralAttributeId(pub(crate) usize);

/// The resolved binding of one collection-valued attribute.
#[derive(Debug, Clone)]
pub struct PluralAttributeBinding {
    pub(crate) id: PluralAttributeId,
    pub(crate) role: String,
    pub(crate) owner: String,
    pub(crate) attribute_name: String,
    pub(crate) nature: PluralAttributeNature,
    pub(crate) collection_table: TableId,
    pub(crate) key: PluralAttributeKeyBinding,
    pub(crate) element: PluralAttributeElementBinding,
    pub(crate) type_descriptor: TypeDescriptor,
}

impl PluralAttributeBinding {
    /// This binding's handle.
    pub fn id(&self) -> PluralAttributeId {
        self.id
    }

    /// Role string `<Entity>.<attribute>`.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Owning entity name.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Attribute name.
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Collection nature.
    pub fn nature(&self) -> PluralAttributeNature {
        self.nature
    }

    /// The table holding collection rows.
    pub fn collection_table(&self) -> TableId {
        self.collection_table
    }

    /// The key linking rows back to the owner.
    pub fn key_binding(&self) -> &PluralAttributeKeyBinding {
        &self.key
    }

    /// The element binding.
    pub fn element_binding(&self) -> &PluralAttributeElementBinding {
        &self.element
    }

    /// The collection's resolved type.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.type_descriptor
    }
}

/// Foreign-key side of a collection binding.
#[derive(Debug, Clone, PartialEq)]
pub struct PluralAttributeKeyBinding {
    pub(crate) plural_attribute: PluralAttributeId,
    pub(crate) foreign_key: ForeignKeyId,
    pub(crate) referenced_attribute: String,
    pub(crate) type_descriptor: TypeDescriptor,
    pub(crate) inverse: bool,
}

impl PluralAttributeKeyBinding {
    /// The collection binding this key belongs to.
    pub fn plural_attribute(&self) -> PluralAttributeId {
        self.plural_attribute
    }

    /// The resolved foreign key.
    pub fn foreign_key(&self) -> ForeignKeyId {
        self.foreign_key
    }

    /// Owner attribute the key targets: the identifier or a property reference.
    pub fn referenced_attribute(&self) -> &str {
        &self.referenced_attribute
    }

    /// Equal to the type of the referenced attribute.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.type_descriptor
    }

    /// Whether this side mirrors a relationship owned elsewhere.
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }
}

/// Element side of a collection binding.
#[derive(Debug, Clone, PartialEq)]
pub struct PluralAttributeElementBinding {
    pub(crate) nature: PluralAttributeElementNature,
    pub(crate) columns: Vec<ColumnId>,
    pub(crate) type_descriptor: TypeDescriptor,
}

impl PluralAttributeElementBinding {
    /// Element nature.
    pub fn element_nature(&self) -> PluralAttributeElementNature {
        self.nature
    }

    /// Element columns on the collection table.
    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Element type.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.type_descriptor
    }
}
