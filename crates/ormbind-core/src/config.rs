//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Case normalization applied to unquoted identifiers.
///
/// Quoted identifiers always keep their case. Folding is ASCII-only so the
/// result never depends on the process locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// Fold unquoted names to lowercase.
    #[default]
    Lower,
    /// Fold unquoted names to uppercase.
    Upper,
    /// Compare unquoted names exactly as written.
    Preserve,
}

impl IdentifierCase {
    /// Apply the folding rule to an unquoted name.
    pub fn fold(&self, text: &str) -> String {
        match self {
            IdentifierCase::Lower => text.to_ascii_lowercase(),
            IdentifierCase::Upper => text.to_ascii_uppercase(),
            IdentifierCase::Preserve => text.to_string(),
        }
    }
}

/// How foreign keys without an explicit name are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignKeyNaming {
    /// Leave the name absent for a later stage to fill in.
    #[default]
    Deferred,
    /// Derive a stable `FK_<digest>` name from the key's tables and columns.
    Generated,
}

/// Configuration for one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Normalization policy for unquoted identifiers.
    pub identifier_case: IdentifierCase,
    /// Naming policy for foreign keys.
    pub foreign_key_naming: ForeignKeyNaming,
    /// Element column name used when a collection does not declare one.
    /// None means the attribute name is used.
    pub default_element_column: Option<String>,
}

impl ResolverConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier case policy.
    pub fn with_identifier_case(mut self, case: IdentifierCase) -> Self {
        self.identifier_case = case;
        self
    }

    /// Set the foreign key naming policy.
    pub fn with_foreign_key_naming(mut self, naming: ForeignKeyNaming) -> Self {
        self.foreign_key_naming = naming;
        self
    }

    /// Set a fixed default element column name.
    pub fn with_default_element_column(mut self, name: impl Into<String>) -> Self {
        self.default_element_column = Some(name.into());
        self
    }

    /// Element column name for an attribute without an explicit one.
    pub fn element_column_for(&self, attribute: &str) -> String {
        self.default_element_column
            .clone()
            .unwrap_or_else(|| attribute.to_string())
    }
}
