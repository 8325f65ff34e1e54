//! The aggregate for one record kind: a table plus its fields,
//! associations, indexes and emission hints.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, StructureError};

use super::association::Association;
use super::composite::{Capability, CompositeField};
use super::field::{Field, GeneratedField};
use super::index::Index;

/// A declared field entry: plain scalar or composite.
#[derive(Debug, Clone, Serialize)]
pub enum TypeField {
    Scalar(Field),
    Composite(CompositeField),
}

impl TypeField {
    pub fn name(&self) -> &str {
        match self {
            TypeField::Scalar(f) => f.name(),
            TypeField::Composite(f) => f.name(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Type {
    name: String,
    fields: IndexMap<String, TypeField>,
    associations: IndexMap<String, Association>,
    indexes: IndexMap<String, Index>,
    order_by: Vec<String>,
    serialize: Vec<String>,
    protected_fields: Vec<String>,
    capabilities: Vec<Capability>,
}

impl Type {
    /// A new type for the given table. Every type manages an `id` identity
    /// field; it is always first in field order.
    pub fn new(name: &str) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(
            "id".to_string(),
            TypeField::Scalar(Field::int("id").set_unsigned()),
        );
        Type {
            name: name.to_string(),
            fields,
            associations: IndexMap::new(),
            indexes: IndexMap::new(),
            order_by: vec!["id".to_string()],
            serialize: Vec::new(),
            protected_fields: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_field(&mut self, field: Field) -> Result<&mut Self> {
        if self.fields.contains_key(field.name()) {
            return Err(StructureError::Schema(format!(
                "Field '{}' already declared on type '{}'",
                field.name(),
                self.name
            )));
        }
        self.fields
            .insert(field.name().to_string(), TypeField::Scalar(field));
        Ok(self)
    }

    /// Attach a composite field: registers its entry, its index (if it
    /// brings one) and its capability marker.
    pub fn add_composite(&mut self, composite: impl Into<CompositeField>) -> Result<&mut Self> {
        let composite = composite.into();
        if self.fields.contains_key(composite.name()) {
            return Err(StructureError::Schema(format!(
                "Field '{}' already declared on type '{}'",
                composite.name(),
                self.name
            )));
        }
        if let Some(index) = composite.index() {
            self.indexes.insert(index.name().to_string(), index);
        }
        if let Some(capability) = composite.capability() {
            if !self.capabilities.contains(&capability) {
                self.capabilities.push(capability);
            }
        }
        self.fields
            .insert(composite.name().to_string(), TypeField::Composite(composite));
        Ok(self)
    }

    /// Attach an association. The association records this type as its
    /// source; BelongsTo/HasOne also register an index for their foreign
    /// key.
    pub fn add_association(&mut self, association: impl Into<Association>) -> Result<&mut Self> {
        let mut association = association.into();
        association.set_source_type_name(&self.name);
        if self.associations.contains_key(association.name()) {
            return Err(StructureError::Schema(format!(
                "Association '{}' already declared on type '{}'",
                association.name(),
                self.name
            )));
        }
        if let Some(index) = association.injected_index() {
            self.indexes.entry(index.name().to_string()).or_insert(index);
        }
        self.associations
            .insert(association.name().to_string(), association);
        Ok(self)
    }

    pub fn add_index(&mut self, index: Index) -> Result<&mut Self> {
        if self.indexes.contains_key(index.name()) {
            return Err(StructureError::Schema(format!(
                "Index '{}' already declared on type '{}'",
                index.name(),
                self.name
            )));
        }
        self.indexes.insert(index.name().to_string(), index);
        Ok(self)
    }

    /// Attach a capability, adding its backing field when not declared yet.
    pub fn add_capability(&mut self, capability: Capability) -> Result<&mut Self> {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
            if let Some(field) = capability.backing_field() {
                if !self.fields.contains_key(field.name()) {
                    self.add_field(field)?;
                }
            }
        }
        Ok(self)
    }

    pub fn set_order_by(&mut self, fields: &[&str]) -> &mut Self {
        self.order_by = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Extra fields exposed by the generated serialization hook.
    pub fn serialize_fields(&mut self, fields: &[&str]) -> &mut Self {
        self.serialize
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn protect_fields(&mut self, fields: &[&str]) -> &mut Self {
        self.protected_fields
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn fields(&self) -> &IndexMap<String, TypeField> {
        &self.fields
    }

    pub fn associations(&self) -> &IndexMap<String, Association> {
        &self.associations
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    pub fn indexes(&self) -> &IndexMap<String, Index> {
        &self.indexes
    }

    pub fn order_by(&self) -> &[String] {
        &self.order_by
    }

    pub fn serialize_list(&self) -> &[String] {
        &self.serialize
    }

    pub fn protected_fields(&self) -> &[String] {
        &self.protected_fields
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// All managed scalar fields in column order: `id` first, declared
    /// fields with composites flattened in place, association-injected
    /// foreign keys last.
    pub fn all_fields(&self) -> Vec<Field> {
        let mut all = Vec::new();
        for entry in self.fields.values() {
            match entry {
                TypeField::Scalar(f) => all.push(f.clone()),
                TypeField::Composite(c) => all.extend(c.fields()),
            }
        }
        for association in self.associations.values() {
            for field in association.injected_fields() {
                if !all.iter().any(|f| f.name() == field.name()) {
                    all.push(field);
                }
            }
        }
        all
    }

    /// Generated (derived) columns declared by this type's JSON fields.
    pub fn generated_fields(&self) -> Vec<GeneratedField> {
        self.all_fields()
            .iter()
            .flat_map(|f| f.generated_fields().to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::association::{BelongsTo, HasAndBelongsToMany};
    use crate::schema::composite::NameField;
    use crate::schema::field::ScalarKind;

    #[test]
    fn test_id_field_is_always_first() {
        let ty = Type::new("writers");
        let all = ty.all_fields();
        assert_eq!(all[0].name(), "id");
        assert!(all[0].is_unsigned());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut ty = Type::new("writers");
        ty.add_field(Field::string("name")).unwrap();
        assert!(ty.add_field(Field::string("name")).is_err());
        assert!(ty.add_field(Field::int("id")).is_err());
    }

    #[test]
    fn test_composite_registers_index_and_subfields() {
        let mut ty = Type::new("writers");
        ty.add_composite(NameField::with("name", None, true)).unwrap();
        assert!(ty.indexes().contains_key("name"));
        let all = ty.all_fields();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name(), "name");
    }

    #[test]
    fn test_association_injects_fk_field_and_index() {
        let mut ty = Type::new("books");
        ty.add_association(BelongsTo::new("writer")).unwrap();
        let all = ty.all_fields();
        assert!(all.iter().any(|f| f.name() == "writer_id"));
        assert!(ty.indexes().contains_key("writer_id"));
        assert_eq!(
            ty.association("writer").unwrap().source_type_name(),
            "books"
        );
    }

    #[test]
    fn test_duplicate_association_rejected() {
        let mut ty = Type::new("books");
        ty.add_association(HasAndBelongsToMany::new("writers")).unwrap();
        assert!(ty
            .add_association(HasAndBelongsToMany::new("writers"))
            .is_err());
    }

    #[test]
    fn test_capability_adds_backing_field() {
        let mut ty = Type::new("books");
        ty.add_capability(Capability::CreatedAt).unwrap();
        let all = ty.all_fields();
        let created_at = all.iter().find(|f| f.name() == "created_at").unwrap();
        assert_eq!(created_at.kind(), ScalarKind::DateTime);
        // Attaching twice is a no-op.
        ty.add_capability(Capability::CreatedAt).unwrap();
        assert_eq!(ty.capabilities().len(), 1);
    }

    #[test]
    fn test_generated_fields_collected_from_json_fields() {
        let mut ty = Type::new("stats_snapshots");
        ty.add_field(Field::date("day")).unwrap();
        ty.add_field(
            Field::json("stats")
                .extract_value("plan_name", "$.plan_name", ScalarKind::String, true)
                .unwrap(),
        )
        .unwrap();
        let generated = ty.generated_fields();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].name(), "plan_name");
    }

    #[test]
    fn test_default_order_by() {
        let mut ty = Type::new("books");
        assert_eq!(ty.order_by(), &["id".to_string()]);
        ty.set_order_by(&["position", "id"]);
        assert_eq!(ty.order_by().len(), 2);
    }
}
