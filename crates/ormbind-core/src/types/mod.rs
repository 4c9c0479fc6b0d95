//! Attribute type resolution.

mod descriptor;
mod mapping;
mod resolver;

pub use descriptor::TypeDescriptor;
pub use mapping::{BasicType, CollectionType, TypeMapping};
pub use resolver::TypeResolver;
