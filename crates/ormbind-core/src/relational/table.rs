//! Tables, columns and keys.
//!
//! All relational objects live in the [`SchemaRegistry`](super::SchemaRegistry)
//! arena and refer to each other through copyable handles. Two handles are
//! equal exactly when they address the same object, which is how column
//! sharing between a primary key and a foreign key is observed.

use std::collections::HashMap;

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use super::{Identifier, SqlType};
use crate::config::IdentifierCase;

/// Handle to a table in the schema registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub(crate) usize);

/// Handle to a column in the schema registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub(crate) usize);

/// Handle to a foreign key in the schema registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignKeyId(pub(crate) usize);

/// A relational table.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) id: TableId,
    pub(crate) logical_name: Identifier,
    pub(crate) case: IdentifierCase,
    pub(crate) columns: Vec<ColumnId>,
    pub(crate) column_index: HashMap<String, ColumnId>,
    pub(crate) primary_key: PrimaryKey,
    pub(crate) foreign_keys: Vec<ForeignKeyId>,
}

impl Table {
    pub(crate) fn new(id: TableId, logical_name: Identifier, case: IdentifierCase) -> Self {
        Self {
            id,
            logical_name,
            case,
            columns: Vec::new(),
            column_index: HashMap::new(),
            primary_key: PrimaryKey::new(id),
            foreign_keys: Vec::new(),
        }
    }

    /// This table's handle.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// The table's logical name.
    pub fn logical_name(&self) -> &Identifier {
        &self.logical_name
    }

    /// Columns in creation order.
    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Find a column by name. Unquoted names are folded with the policy of
    /// the registry that created this table.
    pub fn locate_column(&self, name: &Identifier) -> Option<ColumnId> {
        self.column_index.get(&name.key_under(self.case)).copied()
    }

    /// The primary key. Its span is zero when no uniqueness is enforced.
    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    /// Foreign keys whose source side is this table.
    pub fn foreign_keys(&self) -> &[ForeignKeyId] {
        &self.foreign_keys
    }
}

/// A column of exactly one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub(crate) id: ColumnId,
    pub(crate) table: TableId,
    pub(crate) name: Identifier,
    pub(crate) data_type: SqlType,
    pub(crate) unique: bool,
    pub(crate) nullable: bool,
}

impl Column {
    /// This column's handle.
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// The owning table.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// The column's name.
    pub fn column_name(&self) -> &Identifier {
        &self.name
    }

    /// The resolved data type.
    pub fn data_type(&self) -> SqlType {
        self.data_type
    }

    /// Whether the column carries a single-column unique constraint.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Whether the column accepts nulls.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Ordered primary key columns of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    table: TableId,
    pub(crate) columns: Vec<ColumnId>,
}

impl PrimaryKey {
    fn new(table: TableId) -> Self {
        Self {
            table,
            columns: Vec::new(),
        }
    }

    /// The owning table.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Key columns in declared order.
    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Number of key columns.
    pub fn column_span(&self) -> usize {
        self.columns.len()
    }
}

/// Action taken by the database when a referenced row changes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub enum ReferentialAction {
    /// Defer the check; the statement fails if rows still reference the key.
    #[default]
    NoAction,
    /// Propagate the change to referencing rows.
    Cascade,
    /// Set referencing columns to null.
    SetNull,
    /// Set referencing columns to their defaults.
    SetDefault,
    /// Reject the change immediately.
    Restrict,
}

/// A foreign key owned by its source table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub(crate) id: ForeignKeyId,
    pub(crate) name: Option<Identifier>,
    pub(crate) source_table: TableId,
    pub(crate) source_columns: Vec<ColumnId>,
    pub(crate) target_table: TableId,
    pub(crate) target_columns: Vec<ColumnId>,
    pub(crate) delete_rule: ReferentialAction,
    pub(crate) update_rule: ReferentialAction,
}

impl ForeignKey {
    /// This key's handle.
    pub fn id(&self) -> ForeignKeyId {
        self.id
    }

    /// The key's name. Absent unless declared or generated.
    pub fn name(&self) -> Option<&Identifier> {
        self.name.as_ref()
    }

    /// The table holding the referencing columns.
    pub fn source_table(&self) -> TableId {
        self.source_table
    }

    /// The referencing columns.
    pub fn columns(&self) -> &[ColumnId] {
        &self.source_columns
    }

    /// Alias of [`ForeignKey::columns`].
    pub fn source_columns(&self) -> &[ColumnId] {
        &self.source_columns
    }

    /// The referenced table.
    pub fn target_table(&self) -> TableId {
        self.target_table
    }

    /// The referenced columns, positionally matched to the source columns.
    pub fn target_columns(&self) -> &[ColumnId] {
        &self.target_columns
    }

    /// Number of column pairs.
    pub fn column_span(&self) -> usize {
        self.source_columns.len()
    }

    /// Action on delete of the referenced row.
    pub fn delete_rule(&self) -> ReferentialAction {
        self.delete_rule
    }

    /// Action on update of the referenced key.
    pub fn update_rule(&self) -> ReferentialAction {
        self.update_rule
    }

    /// Source/target column pairs.
    pub fn column_pairs(&self) -> impl Iterator<Item = (ColumnId, ColumnId)> + '_ {
        self.source_columns
            .iter()
            .copied()
            .zip(self.target_columns.iter().copied())
    }
}
