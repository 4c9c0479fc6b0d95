//! Core error types.

use thiserror::Error;

use crate::relational::SqlType;

/// Errors raised while resolving mapping sources into bindings.
///
/// Every variant aborts the resolution pass; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    /// An explicit type name is not registered with the type resolver.
    #[error("unknown type '{type_name}' on {entity}.{attribute}")]
    UnknownType {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// The unregistered type name.
        type_name: String,
    },

    /// A foreign key source column disagrees with its target column's data type.
    #[error(
        "type mismatch on {entity}.{attribute}: column {column} is {source_type}, expected {target_type}"
    )]
    TypeMismatch {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// Source-side column name.
        column: String,
        /// Data type already held by the column.
        source_type: SqlType,
        /// Data type the column must have: the referenced column's type for
        /// a foreign key, the attribute's type otherwise.
        target_type: SqlType,
    },

    /// Explicit key columns do not match the anchor's column count.
    #[error("key column span mismatch on {entity}.{attribute}: {declared} column(s) declared, anchor has {expected}")]
    KeyColumnSpanMismatch {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// Number of explicit column names supplied.
        declared: usize,
        /// Number of columns on the anchor.
        expected: usize,
    },

    /// A property-reference names an attribute that is not bound on the owner.
    #[error("unresolved property reference '{property}' on {entity}.{attribute}")]
    UnresolvedPropertyReference {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// The referenced property name.
        property: String,
    },

    /// Two attributes of one entity share a name.
    #[error("duplicate attribute name {entity}.{attribute}")]
    DuplicateAttributeName {
        /// Owning entity.
        entity: String,
        /// The repeated attribute name.
        attribute: String,
    },

    /// A collection's element column is also one of its key columns.
    #[error("repeated column '{column}' on {entity}.{attribute}: used as both key and element")]
    RepeatedColumn {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// The column mapped twice.
        column: String,
    },

    /// Two owners defaulted onto the same table.
    #[error("ambiguous table name '{table}' for {claimant}: already used by {existing}")]
    AmbiguousTableName {
        /// The contested table name.
        table: String,
        /// The owner that tried to claim the table.
        claimant: String,
        /// The owner that claimed it first.
        existing: String,
    },

    /// Collections sharing one table compose different primary keys.
    #[error("conflicting primary key on shared table '{table}' for {entity}.{attribute}")]
    PrimaryKeyConflict {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// The shared table name.
        table: String,
    },

    /// The host type's default collection type disagrees with the declared nature.
    #[error("collection nature mismatch on {entity}.{attribute}: declared {declared}, type '{type_name}' implies {implied}")]
    CollectionNatureMismatch {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// Nature declared by the mapping source.
        declared: String,
        /// Nature implied by the resolved collection type.
        implied: String,
        /// Type name the nature was inferred from.
        type_name: String,
    },

    /// A type parameter could not be applied.
    #[error("invalid type parameter {name}='{value}' on {entity}.{attribute}")]
    InvalidTypeParameter {
        /// Owning entity.
        entity: String,
        /// Attribute at fault.
        attribute: String,
        /// Parameter name.
        name: String,
        /// Parameter value.
        value: String,
    },

    /// A raw identifier is empty or its quoting is unbalanced.
    #[error("invalid identifier '{raw}'")]
    InvalidIdentifier {
        /// The raw text as supplied.
        raw: String,
    },

    /// An entity name is not part of the binding graph.
    #[error("unknown entity '{entity}'")]
    UnknownEntity {
        /// The missing entity name.
        entity: String,
    },

    /// Two entity sources share a name.
    #[error("duplicate entity '{entity}'")]
    DuplicateEntity {
        /// The repeated entity name.
        entity: String,
    },
}

impl BindingError {
    /// The entity this error is attributed to, if any.
    pub fn entity(&self) -> Option<&str> {
        match self {
            BindingError::UnknownType { entity, .. }
            | BindingError::TypeMismatch { entity, .. }
            | BindingError::KeyColumnSpanMismatch { entity, .. }
            | BindingError::UnresolvedPropertyReference { entity, .. }
            | BindingError::DuplicateAttributeName { entity, .. }
            | BindingError::RepeatedColumn { entity, .. }
            | BindingError::PrimaryKeyConflict { entity, .. }
            | BindingError::CollectionNatureMismatch { entity, .. }
            | BindingError::InvalidTypeParameter { entity, .. }
            | BindingError::UnknownEntity { entity }
            | BindingError::DuplicateEntity { entity } => Some(entity),
            BindingError::AmbiguousTableName { .. } | BindingError::InvalidIdentifier { .. } => {
                None
            }
        }
    }
}

/// Top-level crate errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Resolution failed.
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// JSON encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
