use serde::Serialize;

/// A named secondary index over one or more fields of a type's table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    name: String,
    fields: Vec<String>,
}

impl Index {
    /// Single-field index named after the field.
    pub fn new(field: &str) -> Self {
        Index {
            name: field.to_string(),
            fields: vec![field.to_string()],
        }
    }

    pub fn with_fields(name: &str, fields: &[&str]) -> Self {
        Index {
            name: name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_index() {
        let index = Index::new("day");
        assert_eq!(index.name(), "day");
        assert_eq!(index.fields(), &["day".to_string()]);
    }

    #[test]
    fn test_multi_field_index() {
        let index = Index::with_fields("position", &["list_id", "position"]);
        assert_eq!(index.fields().len(), 2);
    }
}
