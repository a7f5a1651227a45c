//! Registry of resource types.
//!
//! Built once at startup and shared read-only afterwards. Registration
//! runs the structural checks of [`ResourceSchema::check`] and rejects
//! duplicate type names, so a built registry is always internally
//! consistent.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::resources;
use crate::schema::ResourceSchema;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("resource type {0:?} registered twice")]
    DuplicateType(String),

    #[error("resource type {type_name:?} is invalid: {reason}")]
    InvalidSchema { type_name: String, reason: String },
}

/// Immutable set of resource types, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: BTreeMap<String, ResourceSchema>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding every built-in resource type.
    pub fn builtin() -> Result<Self, RegistryError> {
        resources::builtin()
            .into_iter()
            .fold(Self::builder(), RegistryBuilder::register)
            .build()
    }

    pub fn get(&self, type_name: &str) -> Option<&ResourceSchema> {
        self.resources.get(type_name)
    }

    /// Resource types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.resources.values()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    pending: Vec<ResourceSchema>,
}

impl RegistryBuilder {
    pub fn register(mut self, resource: ResourceSchema) -> Self {
        self.pending.push(resource);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut resources = BTreeMap::new();
        for resource in self.pending {
            resource
                .check()
                .map_err(|reason| RegistryError::InvalidSchema {
                    type_name: resource.type_name().to_string(),
                    reason,
                })?;
            let type_name = resource.type_name().to_string();
            if resources.contains_key(&type_name) {
                return Err(RegistryError::DuplicateType(type_name));
            }
            resources.insert(type_name, resource);
        }
        Ok(Registry { resources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Schema};

    fn thing(type_name: &str) -> ResourceSchema {
        ResourceSchema::new(
            type_name,
            "/thing",
            Schema::new([Attribute::string("name").required()]),
        )
        .natural_key("name")
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = Registry::builder()
            .register(thing("thing"))
            .register(thing("thing"))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateType("thing".to_string()));
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let err = Registry::builder()
            .register(thing("broken").natural_key("missing"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchema { ref type_name, .. } if type_name == "broken"));
    }

    #[test]
    fn test_lookup_and_iteration_order() {
        let registry = Registry::builder()
            .register(thing("b"))
            .register(thing("a"))
            .build()
            .unwrap();
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = Registry::builtin().unwrap();
        let template = registry.get("bgp_template").unwrap();
        assert_eq!(template.path(), "/routing/bgp/template");
    }
}
