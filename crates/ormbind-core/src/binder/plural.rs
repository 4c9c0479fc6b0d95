//! Builds the complete binding of one collection-valued attribute.

use tracing::{debug, warn};

use super::foreign_key::{ForeignKeyRequest, ForeignKeyResolver, KeyAnchor};
use super::hierarchy::check_column_type;
use crate::binding::{
    AttributeBinding, EntityBinding, PluralAttributeBinding, PluralAttributeElementBinding,
    PluralAttributeElementNature, PluralAttributeId, PluralAttributeKeyBinding, PrimaryKeyPolicy,
};
use crate::config::ResolverConfig;
use crate::error::BindingError;
use crate::relational::{ColumnId, SchemaRegistry, TableId};
use crate::source::PluralAttributeSource;
use crate::types::{TypeDescriptor, TypeResolver};

/// Binds plural attributes against an already bound owner.
pub struct PluralAttributeBinder<'a> {
    registry: &'a mut SchemaRegistry,
    types: &'a TypeResolver,
    config: &'a ResolverConfig,
}

impl<'a> PluralAttributeBinder<'a> {
    /// Create a binder writing into `registry`.
    pub fn new(
        registry: &'a mut SchemaRegistry,
        types: &'a TypeResolver,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            registry,
            types,
            config,
        }
    }

    /// Bind `source` as a collection of `owner`, under handle `id`.
    ///
    /// The owner is only read; registering the result on the owner and in
    /// the role registry is left to the caller so that a failed pass
    /// publishes nothing.
    pub fn bind(
        &mut self,
        owner: &EntityBinding,
        source: &PluralAttributeSource,
        id: PluralAttributeId,
    ) -> Result<PluralAttributeBinding, BindingError> {
        let entity = owner.name();
        let attribute = source.name.as_str();
        let role = format!("{}.{}", entity, attribute);
        let nature = source.nature;

        if owner.has_attribute(attribute) {
            return Err(BindingError::DuplicateAttributeName {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
            });
        }

        let type_descriptor =
            self.types
                .resolve_collection(entity, attribute, &source.type_source, nature)?;

        let table_name = self.registry.identifier(&source.table_name(entity))?;
        let table = self.registry.locate_or_create_table(&table_name);
        self.registry
            .claim_table(table, &role, source.table.is_some())?;

        let key = self.bind_key(owner, source, table, id)?;
        let key_columns = self
            .registry
            .foreign_key(key.foreign_key)
            .source_columns()
            .to_vec();

        let element = self.bind_element(entity, source, table, &key_columns)?;

        let primary_key: Vec<ColumnId> = match nature.primary_key_policy() {
            PrimaryKeyPolicy::Empty => Vec::new(),
            PrimaryKeyPolicy::KeyThenElements => key_columns
                .iter()
                .chain(element.columns.iter())
                .copied()
                .collect(),
        };
        if !self.registry.settle_primary_key(table, &primary_key) {
            return Err(BindingError::PrimaryKeyConflict {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
                table: table_name.text().to_string(),
            });
        }

        debug!(
            role = %role,
            nature = %nature,
            table = %table_name,
            key_span = key_columns.len(),
            primary_key_span = self.registry.table(table).primary_key().column_span(),
            "Bound collection"
        );

        Ok(PluralAttributeBinding {
            id,
            role,
            owner: entity.to_string(),
            attribute_name: attribute.to_string(),
            nature,
            collection_table: table,
            key,
            element,
            type_descriptor,
        })
    }

    fn bind_key(
        &mut self,
        owner: &EntityBinding,
        source: &PluralAttributeSource,
        table: TableId,
        id: PluralAttributeId,
    ) -> Result<PluralAttributeKeyBinding, BindingError> {
        let (referenced_attribute, anchor, type_descriptor) =
            self.resolve_anchor(owner, source)?;

        let foreign_key = ForeignKeyResolver::new(self.registry, self.config.foreign_key_naming)
            .resolve(&ForeignKeyRequest {
                entity: owner.name(),
                attribute: &source.name,
                source_table: table,
                anchor: &anchor,
                explicit_columns: &source.key.columns,
                explicit_name: source.key.foreign_key_name.as_deref(),
                on_delete: source.key.on_delete,
                on_update: source.key.on_update,
            })?;

        Ok(PluralAttributeKeyBinding {
            plural_attribute: id,
            foreign_key,
            referenced_attribute,
            type_descriptor,
            inverse: source.inverse,
        })
    }

    /// The owner's primary key, or the columns of the referenced property.
    fn resolve_anchor(
        &self,
        owner: &EntityBinding,
        source: &PluralAttributeSource,
    ) -> Result<(String, KeyAnchor, TypeDescriptor), BindingError> {
        let Some(property) = &source.key.property_ref else {
            let identifier = owner.entity_identifier();
            let anchor = KeyAnchor::primary_key(self.registry, owner.primary_table());
            return Ok((
                identifier.value_binding().name().to_string(),
                anchor,
                identifier.type_descriptor().clone(),
            ));
        };

        let target = owner
            .locate_attribute_binding(property)
            .and_then(AttributeBinding::as_singular)
            .ok_or_else(|| BindingError::UnresolvedPropertyReference {
                entity: owner.name().to_string(),
                attribute: source.name.clone(),
                property: property.clone(),
            })?;

        let unique = target.columns().len() == 1
            && self.registry.column(target.columns()[0]).is_unique();
        if !unique {
            warn!(
                entity = owner.name(),
                attribute = %source.name,
                property = %property,
                "Property reference targets columns not declared unique"
            );
        }

        Ok((
            property.clone(),
            KeyAnchor {
                table: owner.primary_table(),
                columns: target.columns().to_vec(),
            },
            target.type_descriptor().clone(),
        ))
    }

    fn bind_element(
        &mut self,
        entity: &str,
        source: &PluralAttributeSource,
        table: TableId,
        key_columns: &[ColumnId],
    ) -> Result<PluralAttributeElementBinding, BindingError> {
        let element = &source.element;
        match element.nature {
            PluralAttributeElementNature::Basic => {
                let (type_descriptor, sql_type) =
                    self.types
                        .resolve_column_type(entity, &source.name, &element.type_source)?;
                let raw = element
                    .column
                    .clone()
                    .unwrap_or_else(|| self.config.element_column_for(&source.name));
                let name = self.registry.identifier(&raw)?;
                let column = self.registry.locate_or_create_column(table, &name, sql_type);

                if key_columns.contains(&column) {
                    return Err(BindingError::RepeatedColumn {
                        entity: entity.to_string(),
                        attribute: source.name.clone(),
                        column: name.text().to_string(),
                    });
                }
                check_column_type(self.registry, entity, &source.name, column, sql_type)?;

                Ok(PluralAttributeElementBinding {
                    nature: element.nature,
                    columns: vec![column],
                    type_descriptor,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::EntityHierarchyBinder;
    use crate::binding::PluralAttributeNature;
    use crate::config::IdentifierCase;
    use crate::relational::SqlType;
    use crate::source::{
        BasicAttributeSource, ElementSource, EntitySource, IdentifierSource, TypeSource,
    };

    struct Fixture {
        registry: SchemaRegistry,
        types: TypeResolver,
        config: ResolverConfig,
        owner: EntityBinding,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
            let types = TypeResolver::default();
            let source = EntitySource::new(
                "Owner",
                IdentifierSource::new("id", TypeSource::host("i64")).with_column("pid"),
            )
            .with_attribute(BasicAttributeSource::new("name", TypeSource::host("String")).unique())
            .with_attribute(BasicAttributeSource::new("nickname", TypeSource::host("String")));
            let owner = EntityHierarchyBinder::new(&mut registry, &types)
                .bind(&source)
                .unwrap();
            Self {
                registry,
                types,
                config: ResolverConfig::default(),
                owner,
            }
        }

        fn bind(
            &mut self,
            source: &PluralAttributeSource,
        ) -> Result<PluralAttributeBinding, BindingError> {
            PluralAttributeBinder::new(&mut self.registry, &self.types, &self.config).bind(
                &self.owner,
                source,
                PluralAttributeId(0),
            )
        }
    }

    #[test]
    fn test_bag_has_no_primary_key() {
        let mut fx = Fixture::new();
        let binding = fx
            .bind(&PluralAttributeSource::bag("items", ElementSource::basic("String")))
            .unwrap();

        assert_eq!(binding.role(), "Owner.items");
        assert_eq!(binding.nature(), PluralAttributeNature::Bag);
        let table = fx.registry.table(binding.collection_table());
        assert_eq!(table.logical_name().text(), "Owner_items");
        assert_eq!(table.primary_key().column_span(), 0);

        let fk = fx.registry.foreign_key(binding.key_binding().foreign_key());
        assert_eq!(fk.target_columns(), fx.owner.entity_identifier().columns());
        assert_eq!(
            fx.registry.column(fk.source_columns()[0]).column_name().text(),
            "pid"
        );
        assert_eq!(binding.key_binding().referenced_attribute(), "id");
        assert_eq!(binding.key_binding().plural_attribute(), PluralAttributeId(0));
        assert!(!binding.key_binding().is_inverse());

        let element = binding.element_binding();
        assert_eq!(element.element_nature(), PluralAttributeElementNature::Basic);
        let column = fx.registry.column(element.columns()[0]);
        assert_eq!(column.column_name().text(), "items");
        assert_eq!(column.data_type(), SqlType::Varchar);
    }

    #[test]
    fn test_set_primary_key_is_key_then_element() {
        let mut fx = Fixture::new();
        let element = ElementSource::basic("String").with_column("tag_value");
        let binding = fx
            .bind(
                &PluralAttributeSource::set("tags", element)
                    .with_on_delete(crate::relational::ReferentialAction::Cascade),
            )
            .unwrap();

        let fk = fx.registry.foreign_key(binding.key_binding().foreign_key());
        let pk = fx.registry.table(binding.collection_table()).primary_key();
        assert_eq!(pk.column_span(), 2);
        assert_eq!(pk.columns()[0], fk.source_columns()[0]);
        assert_eq!(pk.columns()[1], binding.element_binding().columns()[0]);
        assert_eq!(fk.delete_rule(), crate::relational::ReferentialAction::Cascade);

        for column in pk.columns() {
            assert!(!fx.registry.column(*column).is_nullable());
        }
    }

    #[test]
    fn test_property_ref_anchors_on_attribute() {
        let mut fx = Fixture::new();
        let binding = fx
            .bind(
                &PluralAttributeSource::set("codes", ElementSource::basic("i32"))
                    .with_property_ref("name"),
            )
            .unwrap();

        let name = fx
            .owner
            .locate_attribute_binding("name")
            .and_then(AttributeBinding::as_singular)
            .unwrap();
        let fk = fx.registry.foreign_key(binding.key_binding().foreign_key());
        assert_eq!(fk.target_columns(), name.columns());
        assert_eq!(binding.key_binding().type_descriptor(), name.type_descriptor());
        assert_eq!(binding.key_binding().referenced_attribute(), "name");

        let source_column = fx.registry.column(fk.source_columns()[0]);
        assert_eq!(source_column.column_name().text(), "name");
        assert_eq!(source_column.data_type(), SqlType::Varchar);

        let element = fx.registry.column(binding.element_binding().columns()[0]);
        assert_eq!(element.data_type(), SqlType::Integer);
    }

    #[test]
    fn test_property_ref_to_non_unique_attribute_is_allowed() {
        let mut fx = Fixture::new();
        let binding = fx.bind(
            &PluralAttributeSource::bag("aliases", ElementSource::basic("String"))
                .with_property_ref("nickname"),
        );
        assert!(binding.is_ok());
    }

    #[test]
    fn test_unresolved_property_ref() {
        let mut fx = Fixture::new();
        let err = fx
            .bind(
                &PluralAttributeSource::set("codes", ElementSource::basic("i32"))
                    .with_property_ref("missing"),
            )
            .unwrap_err();

        assert_eq!(
            err,
            BindingError::UnresolvedPropertyReference {
                entity: "Owner".into(),
                attribute: "codes".into(),
                property: "missing".into(),
            }
        );
    }

    #[test]
    fn test_element_column_repeats_key_column() {
        let mut fx = Fixture::new();
        let err = fx
            .bind(&PluralAttributeSource::set(
                "tags",
                ElementSource::basic("i64").with_column("pid"),
            ))
            .unwrap_err();
        assert!(matches!(err, BindingError::RepeatedColumn { .. }));
    }

    #[test]
    fn test_name_taken_by_singular_attribute() {
        let mut fx = Fixture::new();
        let err = fx
            .bind(&PluralAttributeSource::bag("nickname", ElementSource::basic("String")))
            .unwrap_err();
        assert!(matches!(err, BindingError::DuplicateAttributeName { .. }));
    }

    #[test]
    fn test_declared_nature_must_match_type() {
        let mut fx = Fixture::new();
        let err = fx
            .bind(
                &PluralAttributeSource::set("tags", ElementSource::basic("String"))
                    .with_type(TypeSource::host("Vec<String>")),
            )
            .unwrap_err();
        assert!(matches!(err, BindingError::CollectionNatureMismatch { .. }));
    }

    fn shared_bag(name: &str) -> PluralAttributeSource {
        PluralAttributeSource::bag(name, ElementSource::basic("String")).with_table("shared")
    }

    fn shared_set(name: &str) -> PluralAttributeSource {
        PluralAttributeSource::set(name, ElementSource::basic("String")).with_table("shared")
    }

    #[test]
    fn test_inverse_side_reaches_key_binding() {
        let mut fx = Fixture::new();
        let binding = fx
            .bind(&PluralAttributeSource::bag("items", ElementSource::basic("String")).inverse())
            .unwrap();
        assert!(binding.key_binding().is_inverse());

        let fk = fx.registry.foreign_key(binding.key_binding().foreign_key());
        assert_eq!(fk.source_table(), binding.collection_table());
    }

    #[test]
    fn test_bag_and_set_cannot_share_table() {
        let mut fx = Fixture::new();
        fx.bind(&shared_bag("a")).unwrap();
        let err = fx.bind(&shared_set("b")).unwrap_err();

        assert_eq!(
            err,
            BindingError::PrimaryKeyConflict {
                entity: "Owner".into(),
                attribute: "b".into(),
                table: "shared".into(),
            }
        );
        let table = fx.registry.locate_table(&fx.registry.identifier("shared").unwrap());
        assert_eq!(fx.registry.table(table.unwrap()).primary_key().column_span(), 0);
    }

    #[test]
    fn test_set_then_bag_cannot_share_table() {
        let mut fx = Fixture::new();
        fx.bind(&shared_set("a")).unwrap();
        let err = fx.bind(&shared_bag("b")).unwrap_err();
        assert!(matches!(err, BindingError::PrimaryKeyConflict { .. }));
    }

    #[test]
    fn test_sets_with_different_elements_cannot_share_table() {
        let mut fx = Fixture::new();
        let first = fx.bind(&shared_set("a")).unwrap();
        let err = fx.bind(&shared_set("b")).unwrap_err();
        assert!(matches!(err, BindingError::PrimaryKeyConflict { .. }));

        let pk = fx.registry.table(first.collection_table()).primary_key();
        assert_eq!(pk.column_span(), 2);
    }

    #[test]
    fn test_sets_with_same_key_share_table() {
        let mut fx = Fixture::new();
        let element = || ElementSource::basic("String").with_column("value");
        let first = fx
            .bind(&PluralAttributeSource::set("a", element()).with_table("shared"))
            .unwrap();
        let second = fx
            .bind(&PluralAttributeSource::set("b", element()).with_table("shared"))
            .unwrap();

        assert_eq!(first.collection_table(), second.collection_table());
        let pk = fx.registry.table(first.collection_table()).primary_key();
        assert_eq!(pk.column_span(), 2);
        assert_eq!(pk.columns()[1], second.element_binding().columns()[0]);
    }

    #[test]
    fn test_default_element_column_from_config() {
        let mut fx = Fixture::new();
        fx.config = ResolverConfig::default().with_default_element_column("elt");
        let binding = fx
            .bind(&PluralAttributeSource::bag("items", ElementSource::basic("String")))
            .unwrap();
        let column = fx.registry.column(binding.element_binding().columns()[0]);
        assert_eq!(column.column_name().text(), "elt");
    }
}
