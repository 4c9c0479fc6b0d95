//! Collection mapping sources.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use super::TypeSource;
use crate::binding::{PluralAttributeElementNature, PluralAttributeNature};
use crate::relational::ReferentialAction;

/// Default host type for bag collections.
pub const BAG_HOST_TYPE: &str = "Vec";

/// Default host type for set collections.
pub const SET_HOST_TYPE: &str = "HashSet";

/// A collection-valued attribute as described by the mapping source.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct PluralAttributeSource {
    /// Attribute name.
    pub name: String,
    /// Collection nature.
    pub nature: PluralAttributeNature,
    /// Collection table name. Defaults to `<Entity>_<attribute>`.
    #[serde(default)]
    pub table: Option<String>,
    /// The key linking the collection table back to its owner.
    #[serde(default)]
    pub key: KeySource,
    /// Whether this side mirrors a relationship owned elsewhere.
    #[serde(default)]
    pub inverse: bool,
    /// Declared collection type.
    #[serde(rename = "type")]
    pub type_source: TypeSource,
    /// Element description.
    pub element: ElementSource,
}

/// The owning-side key of a collection.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub struct KeySource {
    /// Explicit source column names, positionally matched to the anchor.
    /// Empty means every column name is propagated from the anchor.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Owner attribute to reference instead of the primary key.
    #[serde(default)]
    pub property_ref: Option<String>,
    /// Action on delete of the owner row.
    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,
    /// Action on update of the owner key.
    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
    /// Explicit foreign key name.
    #[serde(default)]
    pub foreign_key_name: Option<String>,
}

/// The element of a collection.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct ElementSource {
    /// Element nature.
    pub nature: PluralAttributeElementNature,
    /// Column name. Defaults per resolver configuration.
    #[serde(default)]
    pub column: Option<String>,
    /// Declared element type.
    #[serde(rename = "type")]
    pub type_source: TypeSource,
}

impl PluralAttributeSource {
    /// Create a collection with the given nature and element.
    pub fn new(
        name: impl Into<String>,
        nature: PluralAttributeNature,
        type_source: TypeSource,
        element: ElementSource,
    ) -> Self {
        Self {
            name: name.into(),
            nature,
            table: None,
            key: KeySource::default(),
            inverse: false,
            type_source,
            element,
        }
    }

    /// Create a bag held in a `Vec`.
    pub fn bag(name: impl Into<String>, element: ElementSource) -> Self {
        Self::new(
            name,
            PluralAttributeNature::Bag,
            TypeSource::host(BAG_HOST_TYPE),
            element,
        )
    }

    /// Create a set held in a `HashSet`.
    pub fn set(name: impl Into<String>, element: ElementSource) -> Self {
        Self::new(
            name,
            PluralAttributeNature::Set,
            TypeSource::host(SET_HOST_TYPE),
            element,
        )
    }

    /// Override the declared collection type.
    pub fn with_type(mut self, type_source: TypeSource) -> Self {
        self.type_source = type_source;
        self
    }

    /// Set an explicit collection table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set explicit key column names.
    pub fn with_key_columns(
        mut self,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.key.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Reference a unique owner attribute instead of the primary key.
    pub fn with_property_ref(mut self, property: impl Into<String>) -> Self {
        self.key.property_ref = Some(property.into());
        self
    }

    /// Set the delete action.
    pub fn with_on_delete(mut self, action: ReferentialAction) -> Self {
        self.key.on_delete = Some(action);
        self
    }

    /// Set the update action.
    pub fn with_on_update(mut self, action: ReferentialAction) -> Self {
        self.key.on_update = Some(action);
        self
    }

    /// Set an explicit foreign key name.
    pub fn with_foreign_key_name(mut self, name: impl Into<String>) -> Self {
        self.key.foreign_key_name = Some(name.into());
        self
    }

    /// Mark as the inverse side.
    pub fn inverse(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// The collection table name, explicit or `<entity>_<attribute>`.
    pub fn table_name(&self, entity: &str) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| format!("{}_{}", entity, self.name))
    }
}

impl ElementSource {
    /// A scalar element of the given host type.
    pub fn basic(host_type: impl Into<String>) -> Self {
        Self {
            nature: PluralAttributeElementNature::Basic,
            column: None,
            type_source: TypeSource::host(host_type),
        }
    }

    /// A scalar element with explicit type information.
    pub fn basic_typed(type_source: TypeSource) -> Self {
        Self {
            nature: PluralAttributeElementNature::Basic,
            column: None,
            type_source,
        }
    }

    /// Set the column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}
