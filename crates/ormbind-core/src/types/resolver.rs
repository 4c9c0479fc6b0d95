//! Resolution of declared types into type descriptors.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{BasicType, CollectionType, TypeDescriptor, TypeMapping};
use crate::binding::PluralAttributeNature;
use crate::error::BindingError;
use crate::relational::SqlType;
use crate::source::TypeSource;

const DEFAULT_DECIMAL_PRECISION: u8 = 19;
const DEFAULT_DECIMAL_SCALE: u8 = 2;

/// Registry of known types and host-type defaults.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    basic_types: HashMap<String, BasicType>,
    host_defaults: HashMap<String, String>,
    collection_types: HashMap<String, PluralAttributeNature>,
    collection_hosts: HashMap<String, PluralAttributeNature>,
}

impl Default for TypeResolver {
    fn default() -> Self {
        let mut resolver = Self::empty();
        for basic in [
            BasicType::new("string", "String", SqlType::Varchar),
            BasicType::new("short", "i16", SqlType::SmallInt),
            BasicType::new("integer", "i32", SqlType::Integer),
            BasicType::new("long", "i64", SqlType::BigInt),
            BasicType::new("boolean", "bool", SqlType::Boolean),
            BasicType::new("float", "f32", SqlType::Real),
            BasicType::new("double", "f64", SqlType::Double),
            BasicType::new(
                "decimal",
                "Decimal",
                SqlType::Decimal {
                    precision: DEFAULT_DECIMAL_PRECISION,
                    scale: DEFAULT_DECIMAL_SCALE,
                },
            ),
            BasicType::new("binary", "Vec<u8>", SqlType::VarBinary),
            BasicType::new("uuid", "Uuid", SqlType::Uuid),
            BasicType::new("timestamp", "NaiveDateTime", SqlType::Timestamp),
            BasicType::new("date", "NaiveDate", SqlType::Date),
        ] {
            resolver.register_basic(basic);
        }

        for nature in [PluralAttributeNature::Bag, PluralAttributeNature::Set] {
            resolver
                .collection_types
                .insert(nature.as_str().to_string(), nature);
        }
        resolver.register_collection_host("Vec", PluralAttributeNature::Bag);
        resolver.register_collection_host("HashSet", PluralAttributeNature::Set);
        resolver.register_collection_host("BTreeSet", PluralAttributeNature::Set);

        resolver
    }
}

impl TypeResolver {
    /// A resolver with nothing registered.
    pub fn empty() -> Self {
        Self {
            basic_types: HashMap::new(),
            host_defaults: HashMap::new(),
            collection_types: HashMap::new(),
            collection_hosts: HashMap::new(),
        }
    }

    /// Register a basic type by name and as the default for its host type.
    pub fn register_basic(&mut self, basic: BasicType) {
        self.host_defaults
            .insert(basic.host_type.clone(), basic.name.clone());
        self.basic_types.insert(basic.name.clone(), basic);
    }

    /// Register the default collection nature for a host type.
    pub fn register_collection_host(
        &mut self,
        host_type: impl Into<String>,
        nature: PluralAttributeNature,
    ) {
        self.collection_hosts.insert(host_type.into(), nature);
    }

    /// Get a registered basic type by name.
    pub fn basic_type(&self, name: &str) -> Option<&BasicType> {
        self.basic_types.get(name)
    }

    /// Resolve a scalar attribute's type.
    ///
    /// An explicit type name wins; otherwise the host type's default is used.
    pub fn resolve_basic(
        &self,
        entity: &str,
        attribute: &str,
        source: &TypeSource,
    ) -> Result<TypeDescriptor, BindingError> {
        self.resolve_column_type(entity, attribute, source)
            .map(|(descriptor, _)| descriptor)
    }

    /// Resolve a scalar type along with the data type of its backing column.
    pub(crate) fn resolve_column_type(
        &self,
        entity: &str,
        attribute: &str,
        source: &TypeSource,
    ) -> Result<(TypeDescriptor, SqlType), BindingError> {
        let unknown = |type_name: &str| BindingError::UnknownType {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            type_name: type_name.to_string(),
        };

        let basic = match &source.explicit_type_name {
            Some(name) => self.basic_types.get(name).ok_or_else(|| unknown(name))?,
            None => self
                .host_defaults
                .get(&source.host_type)
                .or_else(|| self.host_defaults.get(strip_path(&source.host_type)))
                .and_then(|name| self.basic_types.get(name))
                .ok_or_else(|| unknown(&source.host_type))?,
        };

        let parameters = collect_parameters(entity, attribute, source)?;
        let mut basic = basic.clone();
        if let SqlType::Decimal { precision, scale } = basic.sql_type {
            basic.sql_type = SqlType::Decimal {
                precision: parse_parameter(entity, attribute, &parameters, "precision", precision)?,
                scale: parse_parameter(entity, attribute, &parameters, "scale", scale)?,
            };
        }

        let sql_type = basic.sql_type;
        let descriptor = TypeDescriptor {
            explicit_type_name: source.explicit_type_name.clone(),
            host_type_name: source.host_type.clone(),
            type_parameters: parameters,
            resolved_mapping: TypeMapping::Basic(basic),
            to_one: false,
        };
        Ok((descriptor, sql_type))
    }

    /// Resolve a collection attribute's type for the given role.
    ///
    /// The nature implied by the explicit type name or the host type must
    /// equal the declared nature.
    pub fn resolve_collection(
        &self,
        entity: &str,
        attribute: &str,
        source: &TypeSource,
        nature: PluralAttributeNature,
    ) -> Result<TypeDescriptor, BindingError> {
        let (type_name, implied) = match &source.explicit_type_name {
            Some(name) => (name.as_str(), self.collection_types.get(name)),
            None => (
                source.host_type.as_str(),
                self.collection_hosts.get(base_name(&source.host_type)),
            ),
        };
        let implied = *implied.ok_or_else(|| BindingError::UnknownType {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            type_name: type_name.to_string(),
        })?;

        if implied != nature {
            return Err(BindingError::CollectionNatureMismatch {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
                declared: nature.to_string(),
                implied: implied.to_string(),
                type_name: type_name.to_string(),
            });
        }

        Ok(TypeDescriptor {
            explicit_type_name: source.explicit_type_name.clone(),
            host_type_name: source.host_type.clone(),
            type_parameters: collect_parameters(entity, attribute, source)?,
            resolved_mapping: TypeMapping::Collection(CollectionType {
                nature,
                role: format!("{}.{}", entity, attribute),
            }),
            to_one: false,
        })
    }
}

/// Ordered parameters by name; a name may appear only once.
fn collect_parameters(
    entity: &str,
    attribute: &str,
    source: &TypeSource,
) -> Result<IndexMap<String, String>, BindingError> {
    let mut parameters = IndexMap::with_capacity(source.parameters.len());
    for parameter in &source.parameters {
        if parameters.contains_key(&parameter.name) {
            return Err(BindingError::InvalidTypeParameter {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
                name: parameter.name.clone(),
                value: parameter.value.clone(),
            });
        }
        parameters.insert(parameter.name.clone(), parameter.value.clone());
    }
    Ok(parameters)
}

fn parse_parameter(
    entity: &str,
    attribute: &str,
    parameters: &IndexMap<String, String>,
    name: &str,
    default: u8,
) -> Result<u8, BindingError> {
    match parameters.get(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| BindingError::InvalidTypeParameter {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
                name: name.to_string(),
                value: value.clone(),
            }),
    }
}

/// Drop a leading module path: `std::collections::HashSet<i32>` -> `HashSet<i32>`.
fn strip_path(host: &str) -> &str {
    let head_end = host.find('<').unwrap_or(host.len());
    match host[..head_end].rfind("::") {
        Some(i) => &host[i + 2..],
        None => host,
    }
}

/// Drop the module path and generic arguments: `std::vec::Vec<String>` -> `Vec`.
fn base_name(host: &str) -> &str {
    let stripped = strip_path(host);
    stripped.split('<').next().unwrap_or(stripped).trim()
}
