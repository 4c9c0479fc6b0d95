//! Foreign key synthesis between a source table and a target anchor.

use tracing::trace;

use crate::config::ForeignKeyNaming;
use crate::error::BindingError;
use crate::relational::{
    ColumnId, ForeignKeyId, ForeignKeySpec, ReferentialAction, SchemaRegistry, TableId,
};

/// The column set a foreign key resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAnchor {
    /// Referenced table.
    pub table: TableId,
    /// Referenced columns in key order.
    pub columns: Vec<ColumnId>,
}

impl KeyAnchor {
    /// Anchor on a table's primary key.
    pub fn primary_key(registry: &SchemaRegistry, table: TableId) -> Self {
        Self {
            table,
            columns: registry.table(table).primary_key().columns().to_vec(),
        }
    }
}

/// What to build: one key from `source_table` to `anchor`.
#[derive(Debug, Clone)]
pub struct ForeignKeyRequest<'a> {
    /// Entity the key is attributed to in errors.
    pub entity: &'a str,
    /// Attribute the key is attributed to in errors.
    pub attribute: &'a str,
    /// Table receiving the referencing columns.
    pub source_table: TableId,
    /// Referenced columns.
    pub anchor: &'a KeyAnchor,
    /// Explicit source column names; empty means propagate the anchor's names.
    pub explicit_columns: &'a [String],
    /// Explicit key name.
    pub explicit_name: Option<&'a str>,
    /// Delete action; `NoAction` when absent.
    pub on_delete: Option<ReferentialAction>,
    /// Update action; `NoAction` when absent.
    pub on_update: Option<ReferentialAction>,
}

/// Builds foreign keys in a schema registry.
pub struct ForeignKeyResolver<'a> {
    registry: &'a mut SchemaRegistry,
    naming: ForeignKeyNaming,
}

impl<'a> ForeignKeyResolver<'a> {
    /// Create a resolver writing into `registry`.
    pub fn new(registry: &'a mut SchemaRegistry, naming: ForeignKeyNaming) -> Self {
        Self { registry, naming }
    }

    /// Resolve and register the foreign key.
    ///
    /// Source columns are created on demand with the data type of the column
    /// they reference; an existing source column must already agree.
    pub fn resolve(
        &mut self,
        request: &ForeignKeyRequest<'_>,
    ) -> Result<ForeignKeyId, BindingError> {
        let anchor = request.anchor;
        if !request.explicit_columns.is_empty()
            && request.explicit_columns.len() != anchor.columns.len()
        {
            return Err(BindingError::KeyColumnSpanMismatch {
                entity: request.entity.to_string(),
                attribute: request.attribute.to_string(),
                declared: request.explicit_columns.len(),
                expected: anchor.columns.len(),
            });
        }

        let mut source_columns = Vec::with_capacity(anchor.columns.len());
        for (position, target) in anchor.columns.iter().enumerate() {
            let target_column = self.registry.column(*target);
            let target_type = target_column.data_type();
            let name = match request.explicit_columns.get(position) {
                Some(raw) => self.registry.identifier(raw)?,
                None => target_column.column_name().clone(),
            };

            let source = self
                .registry
                .locate_or_create_column(request.source_table, &name, target_type);
            let source_type = self.registry.column(source).data_type();
            if source_type != target_type {
                return Err(BindingError::TypeMismatch {
                    entity: request.entity.to_string(),
                    attribute: request.attribute.to_string(),
                    column: name.text().to_string(),
                    source_type,
                    target_type,
                });
            }
            source_columns.push(source);
        }

        let name = match (request.explicit_name, self.naming) {
            (Some(raw), _) => Some(self.registry.identifier(raw)?),
            (None, ForeignKeyNaming::Generated) => Some(self.registry.identifier(
                &generate_name(self.registry, request.source_table, &source_columns, anchor),
            )?),
            (None, ForeignKeyNaming::Deferred) => None,
        };

        trace!(
            entity = request.entity,
            attribute = request.attribute,
            span = source_columns.len(),
            "Resolved foreign key"
        );

        Ok(self.registry.add_foreign_key(ForeignKeySpec {
            name,
            source_table: request.source_table,
            source_columns,
            target_table: anchor.table,
            target_columns: anchor.columns.clone(),
            delete_rule: request.on_delete.unwrap_or_default(),
            update_rule: request.on_update.unwrap_or_default(),
        }))
    }
}

/// Stable `FK_<digest>` name over the normalized table and column names.
pub fn generate_name(
    registry: &SchemaRegistry,
    source_table: TableId,
    source_columns: &[ColumnId],
    anchor: &KeyAnchor,
) -> String {
    let table_key = |id: TableId| registry.table(id).logical_name().key().to_string();
    let column_key = |id: &ColumnId| registry.column(*id).column_name().key().to_string();

    let mut hasher = blake3::Hasher::new();
    hasher.update(table_key(source_table).as_bytes());
    for column in source_columns {
        hasher.update(b"|");
        hasher.update(column_key(column).as_bytes());
    }
    hasher.update(b"->");
    hasher.update(table_key(anchor.table).as_bytes());
    for column in &anchor.columns {
        hasher.update(b"|");
        hasher.update(column_key(column).as_bytes());
    }
    let digest = hasher.finalize();
    format!("FK_{}", hex::encode(&digest.as_bytes()[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentifierCase;
    use crate::relational::{Identifier, SqlType};

    struct Fixture {
        registry: SchemaRegistry,
        owner: TableId,
        collection: TableId,
    }

    fn fixture() -> Fixture {
        let mut registry = SchemaRegistry::new(IdentifierCase::Lower);
        let owner = registry.locate_or_create_table(&Identifier::to_identifier("Owner"));
        let pid = registry.locate_or_create_column(
            owner,
            &Identifier::to_identifier("pid"),
            SqlType::BigInt,
        );
        registry.add_primary_key_column(owner, pid);
        let collection = registry.locate_or_create_table(&Identifier::to_identifier("Owner_tags"));
        Fixture {
            registry,
            owner,
            collection,
        }
    }

    fn request<'a>(
        fixture: &Fixture,
        anchor: &'a KeyAnchor,
        explicit_columns: &'a [String],
    ) -> ForeignKeyRequest<'a> {
        ForeignKeyRequest {
            entity: "Owner",
            attribute: "tags",
            source_table: fixture.collection,
            anchor,
            explicit_columns,
            explicit_name: None,
            on_delete: None,
            on_update: None,
        }
    }

    #[test]
    fn test_column_names_propagate() {
        let mut fx = fixture();
        let anchor = KeyAnchor::primary_key(&fx.registry, fx.owner);
        let req = request(&fx, &anchor, &[]);
        let fk_id = ForeignKeyResolver::new(&mut fx.registry, ForeignKeyNaming::Deferred)
            .resolve(&req)
            .unwrap();

        let fk = fx.registry.foreign_key(fk_id);
        assert_eq!(fk.column_span(), 1);
        assert_eq!(fk.source_table(), fx.collection);
        assert_eq!(fk.target_table(), fx.owner);
        assert_eq!(fk.target_columns(), anchor.columns.as_slice());
        let source = fx.registry.column(fk.columns()[0]);
        assert_eq!(source.column_name(), &Identifier::to_identifier("pid"));
        assert_eq!(source.data_type(), SqlType::BigInt);
        assert_eq!(source.table(), fx.collection);
        assert!(fk.name().is_none());
        assert_eq!(fk.delete_rule(), ReferentialAction::NoAction);
        assert_eq!(fk.update_rule(), ReferentialAction::NoAction);
        assert_eq!(fx.registry.table(fx.collection).foreign_keys(), &[fk_id]);
    }

    #[test]
    fn test_explicit_columns_and_actions() {
        let mut fx = fixture();
        let anchor = KeyAnchor::primary_key(&fx.registry, fx.owner);
        let columns = vec!["owner_id".to_string()];
        let mut req = request(&fx, &anchor, &columns);
        req.on_delete = Some(ReferentialAction::Cascade);
        req.explicit_name = Some("fk_owner_tags");
        let fk_id = ForeignKeyResolver::new(&mut fx.registry, ForeignKeyNaming::Deferred)
            .resolve(&req)
            .unwrap();

        let fk = fx.registry.foreign_key(fk_id);
        let source = fx.registry.column(fk.source_columns()[0]);
        assert_eq!(source.column_name().text(), "owner_id");
        assert_eq!(fk.delete_rule(), ReferentialAction::Cascade);
        assert_eq!(fk.update_rule(), ReferentialAction::NoAction);
        assert_eq!(fk.name().map(|n| n.text()), Some("fk_owner_tags"));
    }

    #[test]
    fn test_span_mismatch() {
        let mut fx = fixture();
        let anchor = KeyAnchor::primary_key(&fx.registry, fx.owner);
        let columns = vec!["a".to_string(), "b".to_string()];
        let req = request(&fx, &anchor, &columns);
        let err = ForeignKeyResolver::new(&mut fx.registry, ForeignKeyNaming::Deferred)
            .resolve(&req)
            .unwrap_err();

        assert_eq!(
            err,
            BindingError::KeyColumnSpanMismatch {
                entity: "Owner".into(),
                attribute: "tags".into(),
                declared: 2,
                expected: 1,
            }
        );
        assert_eq!(fx.registry.foreign_keys().count(), 0);
    }

    #[test]
    fn test_existing_column_type_mismatch() {
        let mut fx = fixture();
        fx.registry.locate_or_create_column(
            fx.collection,
            &Identifier::to_identifier("pid"),
            SqlType::Varchar,
        );
        let anchor = KeyAnchor::primary_key(&fx.registry, fx.owner);
        let req = request(&fx, &anchor, &[]);
        let err = ForeignKeyResolver::new(&mut fx.registry, ForeignKeyNaming::Deferred)
            .resolve(&req)
            .unwrap_err();

        assert!(matches!(
            err,
            BindingError::TypeMismatch {
                source_type: SqlType::Varchar,
                target_type: SqlType::BigInt,
                ..
            }
        ));
    }

    #[test]
    fn test_generated_name_is_stable() {
        let mut first = fixture();
        let anchor = KeyAnchor::primary_key(&first.registry, first.owner);
        let req = request(&first, &anchor, &[]);
        let a = ForeignKeyResolver::new(&mut first.registry, ForeignKeyNaming::Generated)
            .resolve(&req)
            .unwrap();

        let mut second = fixture();
        let anchor = KeyAnchor::primary_key(&second.registry, second.owner);
        let req = request(&second, &anchor, &[]);
        let b = ForeignKeyResolver::new(&mut second.registry, ForeignKeyNaming::Generated)
            .resolve(&req)
            .unwrap();

        let name_a = first.registry.foreign_key(a).name().unwrap().text().to_string();
        let name_b = second.registry.foreign_key(b).name().unwrap().text().to_string();
        assert_eq!(name_a, name_b);
        assert!(name_a.starts_with("FK_"));
        assert_eq!(name_a.len(), 3 + 16);
    }
}
