//! Physical relational model: names, tables, columns and keys.

mod identifier;
mod registry;
mod sql_type;
mod table;

pub use identifier::Identifier;
pub(crate) use registry::ForeignKeySpec;
pub use registry::SchemaRegistry;
pub use sql_type::SqlType;
pub use table::{
    Column, ColumnId, ForeignKey, ForeignKeyId, PrimaryKey, ReferentialAction, Table, TableId,
};
