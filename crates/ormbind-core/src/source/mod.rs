//! Mapping sources: the already-parsed logical descriptors a pass consumes.

mod bundle;
mod entity;
mod plural;
mod type_source;

pub use bundle::MappingSources;
pub use entity::{BasicAttributeSource, EntitySource, IdentifierSource};
pub use plural::{
    ElementSource, KeySource, PluralAttributeSource, BAG_HOST_TYPE, SET_HOST_TYPE,
};
pub use type_source::{TypeParameter, TypeSource};
