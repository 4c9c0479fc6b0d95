//! Arena of tables, columns and keys for one resolution pass.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{
    Column, ColumnId, ForeignKey, ForeignKeyId, Identifier, ReferentialAction, SqlType, Table,
    TableId,
};
use crate::config::IdentifierCase;
use crate::error::BindingError;

/// Who claimed a table, and whether the name was given explicitly.
#[derive(Debug, Clone)]
struct TableClaim {
    owner: String,
    explicit: bool,
}

/// Everything needed to register a foreign key.
#[derive(Debug, Clone)]
pub(crate) struct ForeignKeySpec {
    pub name: Option<Identifier>,
    pub source_table: TableId,
    pub source_columns: Vec<ColumnId>,
    pub target_table: TableId,
    pub target_columns: Vec<ColumnId>,
    pub delete_rule: ReferentialAction,
    pub update_rule: ReferentialAction,
}

/// Owns every relational object created during one pass.
///
/// Handles returned by one registry are only meaningful to that registry.
/// Lookups by name are idempotent: asking twice for the same normalized name
/// returns the same handle.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    case: IdentifierCase,
    tables: Vec<Table>,
    table_index: HashMap<String, TableId>,
    columns: Vec<Column>,
    foreign_keys: Vec<ForeignKey>,
    claims: HashMap<TableId, TableClaim>,
    settled_keys: HashSet<TableId>,
}

impl SchemaRegistry {
    /// Create an empty registry normalizing names with the given policy.
    pub fn new(case: IdentifierCase) -> Self {
        Self {
            case,
            ..Default::default()
        }
    }

    /// The identifier policy in effect.
    pub fn identifier_case(&self) -> IdentifierCase {
        self.case
    }

    /// Parse a raw name under this registry's policy.
    pub fn identifier(&self, raw: &str) -> Result<Identifier, BindingError> {
        Identifier::parse(raw, self.case)
    }

    /// Return the table with this logical name, creating it if needed.
    pub fn locate_or_create_table(&mut self, logical_name: &Identifier) -> TableId {
        let key = logical_name.key_under(self.case);
        if let Some(id) = self.table_index.get(&key) {
            return *id;
        }
        let id = TableId(self.tables.len());
        self.tables.push(Table::new(id, logical_name.clone(), self.case));
        self.table_index.insert(key, id);
        trace!(table = %logical_name, "Created table");
        id
    }

    /// Find a table by logical name.
    pub fn locate_table(&self, logical_name: &Identifier) -> Option<TableId> {
        self.table_index.get(&logical_name.key_under(self.case)).copied()
    }

    /// Return the named column of `table`, creating it with `data_type` if needed.
    ///
    /// An existing column keeps its data type; callers compare it themselves.
    pub fn locate_or_create_column(
        &mut self,
        table: TableId,
        name: &Identifier,
        data_type: SqlType,
    ) -> ColumnId {
        if let Some(id) = self.tables[table.0].locate_column(name) {
            return id;
        }
        let id = ColumnId(self.columns.len());
        self.columns.push(Column {
            id,
            table,
            name: name.clone(),
            data_type,
            unique: false,
            nullable: true,
        });
        let owner = &mut self.tables[table.0];
        owner.columns.push(id);
        owner.column_index.insert(name.key_under(self.case), id);
        trace!(table = %owner.logical_name, column = %name, %data_type, "Created column");
        id
    }

    /// Record the owner of a table.
    ///
    /// A table may be shared only when every claimant named it explicitly;
    /// a defaulted name that collides with another owner is ambiguous.
    pub fn claim_table(
        &mut self,
        table: TableId,
        owner: &str,
        explicit: bool,
    ) -> Result<(), BindingError> {
        match self.claims.get(&table) {
            Some(existing) if existing.owner != owner && !(existing.explicit && explicit) => {
                Err(BindingError::AmbiguousTableName {
                    table: self.tables[table.0].logical_name.text().to_string(),
                    claimant: owner.to_string(),
                    existing: existing.owner.clone(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.claims.insert(
                    table,
                    TableClaim {
                        owner: owner.to_string(),
                        explicit,
                    },
                );
                Ok(())
            }
        }
    }

    pub(crate) fn add_primary_key_column(&mut self, table: TableId, column: ColumnId) {
        let pk = &mut self.tables[table.0].primary_key;
        if !pk.columns.contains(&column) {
            pk.columns.push(column);
        }
        self.columns[column.0].nullable = false;
    }

    /// Fix the primary key of `table` to exactly `columns`.
    ///
    /// A table whose key was settled before, or that already holds key
    /// columns, only accepts the identical key. Returns false on a conflict.
    pub(crate) fn settle_primary_key(&mut self, table: TableId, columns: &[ColumnId]) -> bool {
        let current = &self.tables[table.0].primary_key.columns;
        if self.settled_keys.contains(&table) || !current.is_empty() {
            return current.as_slice() == columns;
        }
        for column in columns {
            self.add_primary_key_column(table, *column);
        }
        self.settled_keys.insert(table);
        true
    }

    pub(crate) fn set_unique(&mut self, column: ColumnId, unique: bool) {
        self.columns[column.0].unique = unique;
    }

    pub(crate) fn set_nullable(&mut self, column: ColumnId, nullable: bool) {
        self.columns[column.0].nullable = nullable;
    }

    pub(crate) fn add_foreign_key(&mut self, spec: ForeignKeySpec) -> ForeignKeyId {
        let id = ForeignKeyId(self.foreign_keys.len());
        self.tables[spec.source_table.0].foreign_keys.push(id);
        self.foreign_keys.push(ForeignKey {
            id,
            name: spec.name,
            source_table: spec.source_table,
            source_columns: spec.source_columns,
            target_table: spec.target_table,
            target_columns: spec.target_columns,
            delete_rule: spec.delete_rule,
            update_rule: spec.update_rule,
        });
        id
    }

    /// Get a table by handle.
    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    /// Get a column by handle.
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.0]
    }

    /// Get a foreign key by handle.
    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        &self.foreign_keys[id.0]
    }

    /// All tables in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// All foreign keys in creation order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys.iter()
    }

    /// Number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Find a column of `table` by raw name, parsed under this registry's policy.
    pub fn locate_column(&self, table: TableId, raw: &str) -> Option<ColumnId> {
        let name = self.identifier(raw).ok()?;
        self.table(table).locate_column(&name)
    }
}
