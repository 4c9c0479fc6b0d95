//! A set of mapping sources resolved together in one pass.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use super::EntitySource;
use crate::error::{Error, Result};

/// Already-parsed entity descriptors for one metadata build.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub struct MappingSources {
    /// Entity sources in declaration order.
    pub entities: Vec<EntitySource>,
}

impl MappingSources {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity source.
    pub fn with_entity(mut self, entity: EntitySource) -> Self {
        self.entities.push(entity);
        self
    }

    /// Get an entity source by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntitySource> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Serialize the bundle to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a bundle from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Parse a bundle from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the bundle as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
