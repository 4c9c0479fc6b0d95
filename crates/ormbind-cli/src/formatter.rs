//! Output formatters for resolved metadata.

use clap::ValueEnum;
use comfy_table::Table;
use ormbind_core::{ColumnId, ForeignKey, Metadata, SchemaRegistry};
use serde_json::json;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format the relational schema: tables, columns and keys.
    fn format_schema(&self, metadata: &Metadata) -> String;

    /// Format the collection bindings.
    fn format_collections(&self, metadata: &Metadata) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, metadata: &Metadata) -> String {
        let schema = metadata.schema();
        let mut table = Table::new();
        table.set_header(vec!["Table", "Columns", "Primary Key", "Foreign Keys"]);

        for t in schema.tables() {
            let columns = t
                .columns()
                .iter()
                .map(|c| describe_column(schema, *c))
                .collect::<Vec<_>>()
                .join("\n");
            let foreign_keys = t
                .foreign_keys()
                .iter()
                .map(|fk| describe_foreign_key(schema, schema.foreign_key(*fk)))
                .collect::<Vec<_>>()
                .join("\n");
            table.add_row(vec![
                t.logical_name().render(),
                columns,
                column_list(schema, t.primary_key().columns()),
                foreign_keys,
            ]);
        }

        if schema.table_count() == 0 {
            return "No tables".to_string();
        }
        table.to_string()
    }

    fn format_collections(&self, metadata: &Metadata) -> String {
        let schema = metadata.schema();
        let mut table = Table::new();
        table.set_header(vec!["Role", "Nature", "Table", "Key", "Element"]);

        let mut rows = 0;
        for collection in metadata.collections() {
            let key = collection.key_binding();
            let fk = schema.foreign_key(key.foreign_key());
            table.add_row(vec![
                collection.role().to_string(),
                collection.nature().to_string(),
                schema
                    .table(collection.collection_table())
                    .logical_name()
                    .render(),
                format!(
                    "{} -> {}",
                    column_list(schema, fk.source_columns()),
                    key.referenced_attribute()
                ),
                column_list(schema, collection.element_binding().columns()),
            ]);
            rows += 1;
        }

        if rows == 0 {
            return "No collections".to_string();
        }
        table.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, metadata: &Metadata) -> String {
        let schema = metadata.schema();
        let tables: Vec<_> = schema
            .tables()
            .map(|t| {
                let columns: Vec<_> = t
                    .columns()
                    .iter()
                    .map(|c| {
                        let column = schema.column(*c);
                        json!({
                            "name": column.column_name().render(),
                            "type": column.data_type().to_string(),
                            "nullable": column.is_nullable(),
                            "unique": column.is_unique(),
                        })
                    })
                    .collect();
                let foreign_keys: Vec<_> = t
                    .foreign_keys()
                    .iter()
                    .map(|fk| foreign_key_json(schema, schema.foreign_key(*fk)))
                    .collect();
                json!({
                    "name": t.logical_name().render(),
                    "columns": columns,
                    "primary_key": column_names(schema, t.primary_key().columns()),
                    "foreign_keys": foreign_keys,
                })
            })
            .collect();

        serde_json::to_string_pretty(&json!({ "tables": tables }))
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_collections(&self, metadata: &Metadata) -> String {
        let schema = metadata.schema();
        let collections: Vec<_> = metadata
            .collections()
            .map(|collection| {
                let key = collection.key_binding();
                json!({
                    "role": collection.role(),
                    "nature": collection.nature().as_str(),
                    "table": schema.table(collection.collection_table()).logical_name().render(),
                    "referenced_attribute": key.referenced_attribute(),
                    "inverse": key.is_inverse(),
                    "foreign_key": foreign_key_json(schema, schema.foreign_key(key.foreign_key())),
                    "element_columns": column_names(schema, collection.element_binding().columns()),
                })
            })
            .collect();

        serde_json::to_string_pretty(&json!({ "collections": collections }))
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

fn column_names(schema: &SchemaRegistry, columns: &[ColumnId]) -> Vec<String> {
    columns
        .iter()
        .map(|c| schema.column(*c).column_name().render())
        .collect()
}

fn column_list(schema: &SchemaRegistry, columns: &[ColumnId]) -> String {
    let names = column_names(schema, columns);
    if names.is_empty() {
        "-".to_string()
    } else {
        format!("({})", names.join(", "))
    }
}

fn describe_column(schema: &SchemaRegistry, column: ColumnId) -> String {
    let column = schema.column(column);
    let mut text = format!("{} {}", column.column_name().render(), column.data_type());
    if !column.is_nullable() {
        text.push_str(" NOT NULL");
    }
    if column.is_unique() {
        text.push_str(" UNIQUE");
    }
    text
}

fn describe_foreign_key(schema: &SchemaRegistry, fk: &ForeignKey) -> String {
    let target = schema.table(fk.target_table()).logical_name().render();
    let name = fk
        .name()
        .map(|n| format!("{} ", n.render()))
        .unwrap_or_default();
    format!(
        "{}{} -> {}{}",
        name,
        column_list(schema, fk.source_columns()),
        target,
        column_list(schema, fk.target_columns())
    )
}

fn foreign_key_json(schema: &SchemaRegistry, fk: &ForeignKey) -> serde_json::Value {
    json!({
        "name": fk.name().map(|n| n.render()),
        "columns": column_names(schema, fk.source_columns()),
        "references": schema.table(fk.target_table()).logical_name().render(),
        "referenced_columns": column_names(schema, fk.target_columns()),
        "on_delete": format!("{:?}", fk.delete_rule()),
        "on_update": format!("{:?}", fk.update_rule()),
    })
}
