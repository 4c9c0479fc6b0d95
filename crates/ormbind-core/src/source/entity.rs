//! Entity mapping sources.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use super::{PluralAttributeSource, TypeSource};

/// An entity as described by the mapping source.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct EntitySource {
    /// Entity name (unique within the bundle).
    pub name: String,
    /// Primary table name. Defaults to the entity name.
    #[serde(default)]
    pub table: Option<String>,
    /// Identifier attribute.
    pub identifier: IdentifierSource,
    /// Singular basic attributes.
    #[serde(default)]
    pub attributes: Vec<BasicAttributeSource>,
    /// Collection-valued attributes.
    #[serde(default)]
    pub plural_attributes: Vec<PluralAttributeSource>,
}

/// The identifier attribute of an entity.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct IdentifierSource {
    /// Attribute name.
    pub name: String,
    /// Column name. Defaults to the attribute name.
    #[serde(default)]
    pub column: Option<String>,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_source: TypeSource,
}

/// A singular scalar attribute.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct BasicAttributeSource {
    /// Attribute name.
    pub name: String,
    /// Column name. Defaults to the attribute name.
    #[serde(default)]
    pub column: Option<String>,
    /// Whether the column is unique.
    #[serde(default)]
    pub unique: bool,
    /// Whether the column accepts nulls.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_source: TypeSource,
}

fn default_nullable() -> bool {
    true
}

impl EntitySource {
    /// Create an entity with its identifier.
    pub fn new(name: impl Into<String>, identifier: IdentifierSource) -> Self {
        Self {
            name: name.into(),
            table: None,
            identifier,
            attributes: Vec::new(),
            plural_attributes: Vec::new(),
        }
    }

    /// Set an explicit primary table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add a singular attribute.
    pub fn with_attribute(mut self, attribute: BasicAttributeSource) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a collection-valued attribute.
    pub fn with_plural_attribute(mut self, attribute: PluralAttributeSource) -> Self {
        self.plural_attributes.push(attribute);
        self
    }

    /// The primary table name, explicit or defaulted.
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// Get a singular attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&BasicAttributeSource> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

impl IdentifierSource {
    /// Create an identifier source.
    pub fn new(name: impl Into<String>, type_source: TypeSource) -> Self {
        Self {
            name: name.into(),
            column: None,
            type_source,
        }
    }

    /// Set the column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// The column name, explicit or defaulted.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

impl BasicAttributeSource {
    /// Create a nullable, non-unique attribute.
    pub fn new(name: impl Into<String>, type_source: TypeSource) -> Self {
        Self {
            name: name.into(),
            column: None,
            unique: false,
            nullable: true,
            type_source,
        }
    }

    /// Set the column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as not nullable.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// The column name, explicit or defaulted.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}
