//! Scalar fields and the generated (derived) columns a JSON field can carry.

use serde::Serialize;

use crate::error::{Result, StructureError};
use crate::value::Value;

/// Native value kind of a column. Doubles as the closed set of value-caster
/// keys for generated fields; anything the caster registry does not
/// recognize falls back to string at emission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    Json,
    Mixed,
}

impl ScalarKind {
    /// Whether reading a stored value of this kind needs a deserializing
    /// step beyond the base read behavior.
    pub fn deserializes(&self) -> bool {
        matches!(self, ScalarKind::Json)
    }
}

/// A read-only derived column extracted from a JSON field.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedField {
    name: String,
    expression: String,
    cast: ScalarKind,
    indexed: bool,
}

impl GeneratedField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn cast(&self) -> ScalarKind {
        self.cast
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }
}

/// One managed column of a type.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    name: String,
    kind: ScalarKind,
    required: bool,
    unique: bool,
    uniqueness_context: Vec<String>,
    default_value: Option<Value>,
    protect_setter: bool,
    unsigned: bool,
    generated_fields: Vec<GeneratedField>,
}

impl Field {
    fn new(name: &str, kind: ScalarKind) -> Self {
        Field {
            name: name.to_string(),
            kind,
            required: false,
            unique: false,
            uniqueness_context: Vec::new(),
            default_value: None,
            protect_setter: false,
            unsigned: false,
            generated_fields: Vec::new(),
        }
    }

    pub fn string(name: &str) -> Self {
        Field::new(name, ScalarKind::String)
    }

    pub fn int(name: &str) -> Self {
        Field::new(name, ScalarKind::Int)
    }

    pub fn float(name: &str) -> Self {
        Field::new(name, ScalarKind::Float)
    }

    pub fn bool(name: &str) -> Self {
        Field::new(name, ScalarKind::Bool)
    }

    pub fn date(name: &str) -> Self {
        Field::new(name, ScalarKind::Date)
    }

    pub fn datetime(name: &str) -> Self {
        Field::new(name, ScalarKind::DateTime)
    }

    pub fn json(name: &str) -> Self {
        Field::new(name, ScalarKind::Json)
    }

    pub fn mixed(name: &str) -> Self {
        Field::new(name, ScalarKind::Mixed)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field unique. A unique boolean is meaningless and is
    /// rejected here, at declaration time.
    pub fn unique(self) -> Result<Self> {
        self.unique_within(&[])
    }

    /// Mark the field unique within the context of other fields, together
    /// forming a composite unique key.
    pub fn unique_within(mut self, context: &[&str]) -> Result<Self> {
        if self.kind == ScalarKind::Bool {
            return Err(StructureError::Schema(format!(
                "Boolean field '{}' cannot be unique",
                self.name
            )));
        }
        self.unique = true;
        self.uniqueness_context = context.iter().map(|s| s.to_string()).collect();
        Ok(self)
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Emit the setter with protected visibility instead of public.
    pub fn protect_setter(mut self) -> Self {
        self.protect_setter = true;
        self
    }

    /// Mark a numeric column unsigned.
    pub fn unsigned(mut self) -> Result<Self> {
        if !matches!(self.kind, ScalarKind::Int | ScalarKind::Float) {
            return Err(StructureError::Schema(format!(
                "Field '{}' is not numeric and cannot be unsigned",
                self.name
            )));
        }
        self.unsigned = true;
        Ok(self)
    }

    /// Uniqueness for subfields whose kind is statically known to accept it.
    pub(crate) fn set_unique(mut self, context: Vec<String>) -> Self {
        self.unique = true;
        self.uniqueness_context = context;
        self
    }

    /// Unsigned flag for subfields whose kind is statically numeric.
    pub(crate) fn set_unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Declare a generated column extracted from this JSON field's value.
    pub fn extract_value(
        mut self,
        name: &str,
        expression: &str,
        cast: ScalarKind,
        indexed: bool,
    ) -> Result<Self> {
        if self.kind != ScalarKind::Json {
            return Err(StructureError::Schema(format!(
                "Field '{}' is not a JSON field and cannot extract '{name}'",
                self.name
            )));
        }
        self.generated_fields.push(GeneratedField {
            name: name.to_string(),
            expression: expression.to_string(),
            cast,
            indexed,
        });
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn uniqueness_context(&self) -> &[String] {
        &self.uniqueness_context
    }

    pub fn default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn protects_setter(&self) -> bool {
        self.protect_setter
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn generated_fields(&self) -> &[GeneratedField] {
        &self.generated_fields
    }

    /// Whether reading this field applies a deserializing step.
    pub fn deserializes(&self) -> bool {
        self.kind.deserializes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_boolean_is_rejected() {
        let result = Field::bool("should_not_be_unique").unique();
        assert!(matches!(result, Err(StructureError::Schema(_))));
    }

    #[test]
    fn test_unique_within_context() {
        let field = Field::string("plan_name").unique_within(&["day"]).unwrap();
        assert!(field.is_unique());
        assert_eq!(field.uniqueness_context(), &["day".to_string()]);
    }

    #[test]
    fn test_default_value() {
        let field = Field::string("status").default_value("draft");
        assert_eq!(field.default(), Some(&Value::String("draft".into())));
    }

    #[test]
    fn test_unsigned_requires_numeric_kind() {
        assert!(Field::int("position").unsigned().is_ok());
        assert!(Field::string("name").unsigned().is_err());
    }

    #[test]
    fn test_extract_value_requires_json_kind() {
        let field = Field::json("stats")
            .extract_value("plan_name", "$.plan_name", ScalarKind::String, true)
            .unwrap()
            .extract_value("is_used_on_day", "$.is_used_on_day", ScalarKind::Bool, false)
            .unwrap();
        assert_eq!(field.generated_fields().len(), 2);
        assert_eq!(field.generated_fields()[0].name(), "plan_name");
        assert_eq!(field.generated_fields()[0].expression(), "$.plan_name");
        assert_eq!(field.generated_fields()[0].cast(), ScalarKind::String);
        assert!(field.generated_fields()[0].is_indexed());

        assert!(Field::string("stats")
            .extract_value("plan_name", "$.plan_name", ScalarKind::String, false)
            .is_err());
    }

    #[test]
    fn test_only_json_fields_deserialize() {
        assert!(Field::json("stats").deserializes());
        assert!(!Field::string("name").deserializes());
        assert!(!Field::date("day").deserializes());
    }
}
