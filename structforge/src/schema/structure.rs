//! The root aggregate: namespace, configuration, types and seed records.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, StructureError};

use super::record::SeedRecord;
use super::ty::Type;

/// Per-structure configuration consumed by the emission engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    /// Comment block prepended to every generated file.
    pub header_comment: Option<String>,
    /// Extra property hints included in generated type docs.
    pub doc_properties: Vec<(String, String)>,
    /// Mark the canonical getter of prefixed boolean fields deprecated in
    /// favor of the short alias.
    pub deprecate_long_bool_getter: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Structure {
    namespace: Option<String>,
    config: Config,
    types: IndexMap<String, Type>,
    records: Vec<SeedRecord>,
}

impl Structure {
    pub fn new() -> Self {
        Structure::default()
    }

    pub fn set_namespace(&mut self, namespace: &str) -> &mut Self {
        let trimmed = namespace.trim_matches(':');
        self.namespace = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Add a type by table name and return it for fluent configuration.
    pub fn add_type(&mut self, name: &str) -> Result<&mut Type> {
        match self.types.entry(name.to_string()) {
            indexmap::map::Entry::Occupied(_) => Err(StructureError::Schema(format!(
                "Type '{name}' already declared"
            ))),
            indexmap::map::Entry::Vacant(entry) => Ok(entry.insert(Type::new(name))),
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    pub fn add_record(&mut self, record: impl Into<SeedRecord>) -> &mut Self {
        self.records.push(record.into());
        self
    }

    pub fn records(&self) -> &[SeedRecord] {
        &self.records
    }

    /// Check the compiled model: every association target must resolve to a
    /// declared type.
    pub fn validate(&self) -> Result<()> {
        for ty in self.types.values() {
            for association in ty.associations().values() {
                let target = association.target_type_name();
                if !self.types.contains_key(&target) {
                    return Err(StructureError::Schema(format!(
                        "Association '{}' on type '{}' references unknown type '{target}'",
                        association.name(),
                        ty.name()
                    )));
                }
            }
        }
        Ok(())
    }
}
