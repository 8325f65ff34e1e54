//! Typed relationships between types, and the name derivations that make
//! their constraints, foreign keys and join tables stable across builds.

use serde::Serialize;

use crate::inflect;

use super::field::Field;
use super::index::Index;

fn target_or_plural(name: &str, target_override: &Option<String>) -> String {
    target_override
        .clone()
        .unwrap_or_else(|| inflect::pluralize(name))
}

/// A foreign-key relationship where the source type holds the key.
/// Required by default; optional associations get SET NULL policies.
#[derive(Debug, Clone, Serialize)]
pub struct BelongsTo {
    name: String,
    source_type_name: String,
    target_override: Option<String>,
    required: bool,
}

impl BelongsTo {
    pub fn new(name: &str) -> Self {
        BelongsTo {
            name: name.to_string(),
            source_type_name: String::new(),
            target_override: None,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Override the target type's table name when it is not the plural of
    /// the association name.
    pub fn target(mut self, table_name: &str) -> Self {
        self.target_override = Some(table_name.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_type_name(&self) -> &str {
        &self.source_type_name
    }

    pub fn target_type_name(&self) -> String {
        target_or_plural(&self.name, &self.target_override)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn field_name(&self) -> String {
        format!("{}_id", self.name)
    }

    pub fn constraint_name(&self) -> String {
        format!("{}_constraint", self.field_name())
    }
}

/// The inverse of [`BelongsTo`]: same constraint shape, generated against
/// the declaring type's table.
#[derive(Debug, Clone, Serialize)]
pub struct HasOne {
    name: String,
    source_type_name: String,
    target_override: Option<String>,
    required: bool,
}

impl HasOne {
    pub fn new(name: &str) -> Self {
        HasOne {
            name: name.to_string(),
            source_type_name: String::new(),
            target_override: None,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn target(mut self, table_name: &str) -> Self {
        self.target_override = Some(table_name.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_type_name(&self) -> &str {
        &self.source_type_name
    }

    pub fn target_type_name(&self) -> String {
        target_or_plural(&self.name, &self.target_override)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn field_name(&self) -> String {
        format!("{}_id", self.name)
    }

    pub fn constraint_name(&self) -> String {
        format!("{}_constraint", self.field_name())
    }
}

/// One-to-many: a lazy finder on the target table scoped by the source's
/// foreign key. Produces no DDL.
#[derive(Debug, Clone, Serialize)]
pub struct HasMany {
    name: String,
    source_type_name: String,
    target_override: Option<String>,
    order_by: Option<String>,
}

impl HasMany {
    pub fn new(name: &str) -> Self {
        HasMany {
            name: name.to_string(),
            source_type_name: String::new(),
            target_override: None,
            order_by: None,
        }
    }

    pub fn target(mut self, table_name: &str) -> Self {
        self.target_override = Some(table_name.to_string());
        self
    }

    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_by = Some(clause.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_type_name(&self) -> &str {
        &self.source_type_name
    }

    pub fn target_type_name(&self) -> String {
        target_or_plural(&self.name, &self.target_override)
    }

    pub fn order_clause(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    /// Foreign key on the target table pointing back at the source.
    pub fn source_key_field_name(&self) -> String {
        format!("{}_id", inflect::singularize(&self.source_type_name))
    }
}

/// Many-to-many via a join table named after both sides, sorted, so both
/// directions of the relationship resolve to the same table.
#[derive(Debug, Clone, Serialize)]
pub struct HasAndBelongsToMany {
    name: String,
    source_type_name: String,
    target_override: Option<String>,
    order_by: Option<String>,
}

impl HasAndBelongsToMany {
    pub fn new(name: &str) -> Self {
        HasAndBelongsToMany {
            name: name.to_string(),
            source_type_name: String::new(),
            target_override: None,
            order_by: None,
        }
    }

    pub fn target(mut self, table_name: &str) -> Self {
        self.target_override = Some(table_name.to_string());
        self
    }

    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_by = Some(clause.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_type_name(&self) -> &str {
        &self.source_type_name
    }

    pub fn target_type_name(&self) -> String {
        target_or_plural(&self.name, &self.target_override)
    }

    pub fn order_clause(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn left_field_name(&self) -> String {
        format!("{}_id", inflect::singularize(&self.source_type_name))
    }

    pub fn right_field_name(&self) -> String {
        format!("{}_id", inflect::singularize(&self.target_type_name()))
    }

    pub fn left_constraint_name(&self) -> String {
        format!("{}_constraint", self.left_field_name())
    }

    pub fn right_constraint_name(&self) -> String {
        format!("{}_constraint", self.right_field_name())
    }

    /// Join table name: both type names sorted lexicographically, joined by
    /// `_`. Identical regardless of which side declares the association.
    pub fn join_table_name(&self) -> String {
        let mut names = [self.source_type_name.clone(), self.target_type_name()];
        names.sort();
        names.join("_")
    }
}

/// An association attached to its source type.
#[derive(Debug, Clone, Serialize)]
pub enum Association {
    BelongsTo(BelongsTo),
    HasOne(HasOne),
    HasMany(HasMany),
    HasAndBelongsToMany(HasAndBelongsToMany),
}

impl Association {
    pub fn name(&self) -> &str {
        match self {
            Association::BelongsTo(a) => a.name(),
            Association::HasOne(a) => a.name(),
            Association::HasMany(a) => a.name(),
            Association::HasAndBelongsToMany(a) => a.name(),
        }
    }

    /// The table name of the declaring type. Meaningful once the
    /// association has been added to a type.
    pub fn source_type_name(&self) -> &str {
        match self {
            Association::BelongsTo(a) => a.source_type_name(),
            Association::HasOne(a) => a.source_type_name(),
            Association::HasMany(a) => a.source_type_name(),
            Association::HasAndBelongsToMany(a) => a.source_type_name(),
        }
    }

    pub(crate) fn set_source_type_name(&mut self, source: &str) {
        let slot = match self {
            Association::BelongsTo(a) => &mut a.source_type_name,
            Association::HasOne(a) => &mut a.source_type_name,
            Association::HasMany(a) => &mut a.source_type_name,
            Association::HasAndBelongsToMany(a) => &mut a.source_type_name,
        };
        *slot = source.to_string();
    }

    /// The target type's table name: an explicit override, or the plural of
    /// the association name.
    pub fn target_type_name(&self) -> String {
        match self {
            Association::BelongsTo(a) => a.target_type_name(),
            Association::HasOne(a) => a.target_type_name(),
            Association::HasMany(a) => a.target_type_name(),
            Association::HasAndBelongsToMany(a) => a.target_type_name(),
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Association::BelongsTo(a) => a.is_required(),
            Association::HasOne(a) => a.is_required(),
            _ => false,
        }
    }

    /// Fields the association injects into the source type's managed set.
    pub fn injected_fields(&self) -> Vec<Field> {
        match self {
            Association::BelongsTo(a) => {
                let mut field = Field::int(&a.field_name()).set_unsigned();
                if a.required {
                    field = field.required();
                }
                vec![field]
            }
            Association::HasOne(a) => {
                let mut field = Field::int(&a.field_name()).set_unsigned();
                if a.required {
                    field = field.required();
                }
                vec![field]
            }
            _ => Vec::new(),
        }
    }

    /// Index the association adds to the source type for its foreign key.
    pub fn injected_index(&self) -> Option<Index> {
        match self {
            Association::BelongsTo(a) => Some(Index::new(&a.field_name())),
            Association::HasOne(a) => Some(Index::new(&a.field_name())),
            _ => None,
        }
    }
}

impl From<BelongsTo> for Association {
    fn from(a: BelongsTo) -> Self {
        Association::BelongsTo(a)
    }
}

impl From<HasOne> for Association {
    fn from(a: HasOne) -> Self {
        Association::HasOne(a)
    }
}

impl From<HasMany> for Association {
    fn from(a: HasMany) -> Self {
        Association::HasMany(a)
    }
}

impl From<HasAndBelongsToMany> for Association {
    fn from(a: HasAndBelongsToMany) -> Self {
        Association::HasAndBelongsToMany(a)
    }
}
