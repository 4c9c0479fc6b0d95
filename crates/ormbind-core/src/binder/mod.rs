//! The resolution pass.
//!
//! A pass runs in two phases over one [`MappingSources`] bundle:
//!
//! 1. Every entity's primary table, identifier and singular attributes are
//!    bound, so every property-reference target exists before any key is
//!    resolved.
//! 2. Every plural attribute is bound against its fully declared owner.
//!
//! The pass owns a fresh [`SchemaRegistry`]. On error the registry and all
//! partial bindings are dropped; on success they move into [`Metadata`].

mod foreign_key;
mod hierarchy;
mod plural;

pub use foreign_key::{generate_name, ForeignKeyRequest, ForeignKeyResolver, KeyAnchor};
pub use hierarchy::EntityHierarchyBinder;
pub use plural::PluralAttributeBinder;

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{info, instrument};

use crate::binding::{AttributeBinding, Metadata, PluralAttributeId};
use crate::config::ResolverConfig;
use crate::error::BindingError;
use crate::relational::SchemaRegistry;
use crate::source::MappingSources;
use crate::types::TypeResolver;

/// Runs resolution passes.
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    config: ResolverConfig,
    types: TypeResolver,
}

impl MetadataBuilder {
    /// Create a builder with the default type registry.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            types: TypeResolver::default(),
        }
    }

    /// Replace the type registry.
    pub fn with_type_resolver(mut self, types: TypeResolver) -> Self {
        self.types = types;
        self
    }

    /// The type registry in use.
    pub fn type_resolver(&self) -> &TypeResolver {
        &self.types
    }

    /// Resolve every entity in `sources` into one binding graph.
    #[instrument(skip_all, fields(entities = sources.entities.len()))]
    pub fn build(&self, sources: &MappingSources) -> Result<Metadata, BindingError> {
        let mut registry = SchemaRegistry::new(self.config.identifier_case);
        let mut entities = IndexMap::with_capacity(sources.entities.len());

        for source in &sources.entities {
            if entities.contains_key(&source.name) {
                return Err(BindingError::DuplicateEntity {
                    entity: source.name.clone(),
                });
            }
            let binding = EntityHierarchyBinder::new(&mut registry, &self.types).bind(source)?;
            entities.insert(source.name.clone(), binding);
        }

        let mut collections = Vec::new();
        let mut roles = HashMap::new();
        for source in &sources.entities {
            let Some(owner) = entities.get_mut(&source.name) else {
                return Err(BindingError::UnknownEntity {
                    entity: source.name.clone(),
                });
            };
            for attribute in &source.plural_attributes {
                let id = PluralAttributeId(collections.len());
                let binding = PluralAttributeBinder::new(&mut registry, &self.types, &self.config)
                    .bind(owner, attribute, id)?;
                owner
                    .attributes
                    .insert(attribute.name.clone(), AttributeBinding::Plural(id));
                roles.insert(binding.role.clone(), id);
                collections.push(binding);
            }
        }

        info!(
            entities = entities.len(),
            collections = collections.len(),
            tables = registry.table_count(),
            "Resolution pass completed"
        );

        Ok(Metadata {
            config: self.config.clone(),
            schema: registry,
            entities,
            collections,
            roles,
        })
    }
}
