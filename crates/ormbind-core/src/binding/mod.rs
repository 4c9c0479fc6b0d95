//! Resolved bindings: the physical counterpart of mapping sources.

mod entity;
mod metadata;
mod nature;
mod plural;

pub use entity::{AttributeBinding, EntityBinding, EntityIdentifier, SingularAttributeBinding};
pub use metadata::Metadata;
pub use nature::{PluralAttributeElementNature, PluralAttributeNature, PrimaryKeyPolicy};
pub use plural::{
    PluralAttributeBinding, PluralAttributeElementBinding, PluralAttributeId,
    PluralAttributeKeyBinding,
};
