//! ORMBind Core - Entity and collection binding resolution.
//!
//! This crate turns logical mapping sources (entities, attributes and
//! collections) into a relational model of tables, columns, primary keys
//! and foreign keys, plus the bindings linking the two.

pub mod binder;
pub mod binding;
pub mod config;
pub mod error;
pub mod relational;
pub mod source;
pub mod types;

pub use binder::{
    EntityHierarchyBinder, ForeignKeyRequest, ForeignKeyResolver, KeyAnchor, MetadataBuilder,
    PluralAttributeBinder,
};
pub use binding::{
    AttributeBinding, EntityBinding, EntityIdentifier, Metadata, PluralAttributeBinding,
    PluralAttributeElementBinding, PluralAttributeElementNature, PluralAttributeId,
    PluralAttributeKeyBinding, PluralAttributeNature, PrimaryKeyPolicy, SingularAttributeBinding,
};
pub use config::{ForeignKeyNaming, IdentifierCase, ResolverConfig};
pub use error::{BindingError, Error, Result};
pub use relational::{
    Column, ColumnId, ForeignKey, ForeignKeyId, Identifier, PrimaryKey, ReferentialAction,
    SchemaRegistry, SqlType, Table, TableId,
};
pub use source::{
    BasicAttributeSource, ElementSource, EntitySource, IdentifierSource, KeySource,
    MappingSources, PluralAttributeSource, TypeParameter, TypeSource,
};
pub use types::{BasicType, CollectionType, TypeDescriptor, TypeMapping, TypeResolver};

/// Resolve `sources` with the default type registry.
pub fn resolve(
    sources: &MappingSources,
    config: ResolverConfig,
) -> std::result::Result<Metadata, BindingError> {
    MetadataBuilder::new(config).build(sources)
}
