//! The binding graph produced by one resolution pass.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{EntityBinding, PluralAttributeBinding, PluralAttributeId};
use crate::config::ResolverConfig;
use crate::error::BindingError;
use crate::relational::SchemaRegistry;

/// Read-only result of a completed resolution pass.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub(crate) config: ResolverConfig,
    pub(crate) schema: SchemaRegistry,
    pub(crate) entities: IndexMap<String, EntityBinding>,
    pub(crate) collections: Vec<PluralAttributeBinding>,
    pub(crate) roles: HashMap<String, PluralAttributeId>,
}

impl Metadata {
    /// Configuration the pass ran with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The relational schema.
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Get an entity binding by name.
    pub fn entity_binding(&self, name: &str) -> Option<&EntityBinding> {
        self.entities.get(name)
    }

    /// Get an entity binding by name, failing if it is absent.
    pub fn require_entity(&self, name: &str) -> Result<&EntityBinding, BindingError> {
        self.entity_binding(name)
            .ok_or_else(|| BindingError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    /// Get a collection binding by role `<Entity>.<attribute>`.
    pub fn collection(&self, role: &str) -> Option<&PluralAttributeBinding> {
        self.roles.get(role).map(|id| self.plural_attribute(*id))
    }

    /// Get a collection binding by handle.
    pub fn plural_attribute(&self, id: PluralAttributeId) -> &PluralAttributeBinding {
        &self.collections[id.0]
    }

    /// Entity bindings in declaration order.
    pub fn entity_bindings(&self) -> impl Iterator<Item = &EntityBinding> {
        self.entities.values()
    }

    /// Collection bindings in binding order.
    pub fn collections(&self) -> impl Iterator<Item = &PluralAttributeBinding> {
        self.collections.iter()
    }
}
