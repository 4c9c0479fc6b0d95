//! Structural variants of plural attributes and their elements.

use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Structural variant of a collection-valued attribute.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PluralAttributeNature {
    /// Unordered multiset; duplicates allowed.
    Bag,
    /// Unordered set; one row per distinct element per owner.
    Set,
}

/// How a collection table's primary key is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyPolicy {
    /// No key columns.
    Empty,
    /// Foreign key columns followed by element columns.
    KeyThenElements,
}

impl PluralAttributeNature {
    /// The primary key policy for collection tables of this nature.
    pub fn primary_key_policy(&self) -> PrimaryKeyPolicy {
        match self {
            PluralAttributeNature::Bag => PrimaryKeyPolicy::Empty,
            PluralAttributeNature::Set => PrimaryKeyPolicy::KeyThenElements,
        }
    }

    /// Lowercase name, also used as the registered collection type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralAttributeNature::Bag => "bag",
            PluralAttributeNature::Set => "set",
        }
    }
}

impl fmt::Display for PluralAttributeNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of value held by a collection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PluralAttributeElementNature {
    /// Scalar values stored in one column.
    Basic,
}
