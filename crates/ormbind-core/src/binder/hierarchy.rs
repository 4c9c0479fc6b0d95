//! Binds an entity's primary table, identifier and singular attributes.

use indexmap::IndexMap;
use tracing::debug;

use crate::binding::{AttributeBinding, EntityBinding, EntityIdentifier, SingularAttributeBinding};
use crate::error::BindingError;
use crate::relational::{ColumnId, SchemaRegistry, SqlType, TableId};
use crate::source::{EntitySource, TypeSource};
use crate::types::{TypeDescriptor, TypeResolver};

/// Binds entity roots.
pub struct EntityHierarchyBinder<'a> {
    registry: &'a mut SchemaRegistry,
    types: &'a TypeResolver,
}

impl<'a> EntityHierarchyBinder<'a> {
    /// Create a binder writing into `registry`.
    pub fn new(registry: &'a mut SchemaRegistry, types: &'a TypeResolver) -> Self {
        Self { registry, types }
    }

    /// Bind the entity's primary table, identifier and singular attributes.
    ///
    /// Plural attributes are left to the plural attribute binder.
    pub fn bind(&mut self, source: &EntitySource) -> Result<EntityBinding, BindingError> {
        let table_name = self.registry.identifier(source.table_name())?;
        let table = self.registry.locate_or_create_table(&table_name);
        self.registry
            .claim_table(table, &source.name, source.table.is_some())?;

        let identifier = self.bind_identifier(source, table)?;

        let mut attributes = IndexMap::new();
        attributes.insert(
            identifier.attribute.name.clone(),
            AttributeBinding::Singular(identifier.attribute.clone()),
        );

        for attribute in &source.attributes {
            if attributes.contains_key(&attribute.name) {
                return Err(BindingError::DuplicateAttributeName {
                    entity: source.name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
            let (column, type_descriptor) = self.bind_column(
                &source.name,
                &attribute.name,
                table,
                attribute.column_name(),
                &attribute.type_source,
            )?;
            self.registry.set_unique(column, attribute.unique);
            self.registry.set_nullable(column, attribute.nullable);

            attributes.insert(
                attribute.name.clone(),
                AttributeBinding::Singular(SingularAttributeBinding {
                    name: attribute.name.clone(),
                    columns: vec![column],
                    type_descriptor,
                }),
            );
        }

        debug!(
            entity = %source.name,
            table = %table_name,
            attributes = attributes.len(),
            "Bound entity"
        );

        Ok(EntityBinding {
            name: source.name.clone(),
            primary_table: table,
            identifier,
            attributes,
        })
    }

    /// Bind the identifier onto the primary key of `table`.
    pub fn bind_identifier(
        &mut self,
        source: &EntitySource,
        table: TableId,
    ) -> Result<EntityIdentifier, BindingError> {
        let id = &source.identifier;
        let (column, type_descriptor) = self.bind_column(
            &source.name,
            &id.name,
            table,
            id.column_name(),
            &id.type_source,
        )?;
        if !self.registry.settle_primary_key(table, &[column]) {
            return Err(BindingError::PrimaryKeyConflict {
                entity: source.name.clone(),
                attribute: id.name.clone(),
                table: self.registry.table(table).logical_name().text().to_string(),
            });
        }

        Ok(EntityIdentifier {
            attribute: SingularAttributeBinding {
                name: id.name.clone(),
                columns: vec![column],
                type_descriptor,
            },
        })
    }

    fn bind_column(
        &mut self,
        entity: &str,
        attribute: &str,
        table: TableId,
        column_name: &str,
        type_source: &TypeSource,
    ) -> Result<(ColumnId, TypeDescriptor), BindingError> {
        let (type_descriptor, sql_type) =
            self.types.resolve_column_type(entity, attribute, type_source)?;
        let name = self.registry.identifier(column_name)?;
        let column = self.registry.locate_or_create_column(table, &name, sql_type);
        check_column_type(self.registry, entity, attribute, column, sql_type)?;
        Ok((column, type_descriptor))
    }
}

/// Fail if a reused column holds a different data type than `expected`.
pub(crate) fn check_column_type(
    registry: &SchemaRegistry,
    entity: &str,
    attribute: &str,
    column: ColumnId,
    expected: SqlType,
) -> Result<(), BindingError> {
    let existing = registry.column(column);
    if existing.data_type() != expected {
        return Err(BindingError::TypeMismatch {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            column: existing.column_name().text().to_string(),
            source_type: existing.data_type(),
            target_type: expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentifierCase;
    use crate::relational::Identifier;
    use crate::source::{BasicAttributeSource, IdentifierSource};

    fn owner() -> EntitySource {
        EntitySource::new(
            "Owner",
            IdentifierSource::new("id", TypeSource::host("i64")).with_column("pid"),
        )
        .with_attribute(BasicAttributeSource::new("name", TypeSource::host("String")).unique())
        .with_attribute(BasicAttributeSource::new("age", TypeSource::host("i32")).not_null())
    }

    #[test]
    fn test_bind_entity() {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let types = TypeResolver::default();
        let binding = EntityHierarchyBinder::new(&mut registry, &types)
            .bind(&owner())
            .unwrap();

        let table = registry.table(binding.primary_table());
        assert_eq!(table.logical_name(), &Identifier::to_identifier("Owner"));

        let pk = table.primary_key().columns();
        assert_eq!(pk, binding.entity_identifier().columns());
        let pid = registry.column(pk[0]);
        assert_eq!(pid.column_name().text(), "pid");
        assert_eq!(pid.data_type(), SqlType::BigInt);
        assert!(!pid.is_nullable());

        let name = binding
            .locate_attribute_binding("name")
            .and_then(|a| a.as_singular())
            .unwrap();
        let name_column = registry.column(name.columns()[0]);
        assert!(name_column.is_unique());
        assert!(name_column.is_nullable());
        assert_eq!(name_column.data_type(), SqlType::Varchar);

        let age = binding.locate_attribute_binding("age").unwrap();
        assert!(!registry.column(age.as_singular().unwrap().columns()[0]).is_nullable());
    }

    #[test]
    fn test_identifier_is_an_attribute() {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let types = TypeResolver::default();
        let binding = EntityHierarchyBinder::new(&mut registry, &types)
            .bind(&owner())
            .unwrap();

        let id = binding.locate_attribute_binding("id").unwrap();
        assert_eq!(
            id.as_singular().unwrap(),
            binding.entity_identifier().value_binding()
        );
        let names: Vec<_> = binding.attribute_bindings().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "name", "age"]);
    }

    #[test]
    fn test_duplicate_attribute() {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let types = TypeResolver::default();
        let source =
            owner().with_attribute(BasicAttributeSource::new("name", TypeSource::host("String")));
        let err = EntityHierarchyBinder::new(&mut registry, &types)
            .bind(&source)
            .unwrap_err();

        assert_eq!(
            err,
            BindingError::DuplicateAttributeName {
                entity: "Owner".into(),
                attribute: "name".into(),
            }
        );
    }

    #[test]
    fn test_shared_column_type_mismatch() {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let types = TypeResolver::default();
        let source = owner().with_attribute(
            BasicAttributeSource::new("label", TypeSource::host("bool")).with_column("name"),
        );
        let err = EntityHierarchyBinder::new(&mut registry, &types)
            .bind(&source)
            .unwrap_err();
        assert_eq!(
            err,
            BindingError::TypeMismatch {
                entity: "Owner".into(),
                attribute: "label".into(),
                column: "name".into(),
                source_type: SqlType::Varchar,
                target_type: SqlType::Boolean,
            }
        );
        assert!(err
            .to_string()
            .ends_with("column name is VARCHAR, expected BOOLEAN"));
    }

    #[test]
    fn test_entities_sharing_table_need_same_key() {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let types = TypeResolver::default();
        let first = EntitySource::new("A", IdentifierSource::new("id", TypeSource::host("i64")))
            .with_table("shared");
        let same_key = EntitySource::new("B", IdentifierSource::new("id", TypeSource::host("i64")))
            .with_table("shared");
        let other_key =
            EntitySource::new("C", IdentifierSource::new("code", TypeSource::host("i64")))
                .with_table("shared");

        let mut binder = EntityHierarchyBinder::new(&mut registry, &types);
        binder.bind(&first).unwrap();
        binder.bind(&same_key).unwrap();
        let err = binder.bind(&other_key).unwrap_err();
        assert!(matches!(err, BindingError::PrimaryKeyConflict { .. }));
    }

    #[test]
    fn test_unknown_identifier_type() {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let types = TypeResolver::default();
        let source = EntitySource::new(
            "Owner",
            IdentifierSource::new("id", TypeSource::explicit("serial", "i64")),
        );
        let err = EntityHierarchyBinder::new(&mut registry, &types)
            .bind(&source)
            .unwrap_err();
        assert!(matches!(err, BindingError::UnknownType { .. }));
    }
}
