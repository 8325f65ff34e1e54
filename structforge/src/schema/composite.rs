//! Composite fields: aggregates of plain fields plus accessor and
//! validation logic contributed as a unit, and the closed capability set
//! they (or the caller) can attach to a type.

use serde::Serialize;

use super::field::Field;
use super::index::Index;
use super::validate::ValidatorRule;

/// Capabilities a generated type can carry. Resolved at emission time into
/// explicit behaviour-trait implementations, never into dynamic composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    CreatedAt,
    UpdatedAt,
    Position,
}

impl Capability {
    /// The backing field a capability manages, added to the owning type when
    /// it is not already declared. Position's field comes from its composite.
    pub fn backing_field(&self) -> Option<Field> {
        match self {
            Capability::CreatedAt => Some(Field::datetime("created_at").required()),
            Capability::UpdatedAt => Some(Field::datetime("updated_at").required()),
            Capability::Position => None,
        }
    }
}

/// Where new records enter a positioned collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    Head,
    Tail,
}

/// An integer `position` column with head- or tail-insert semantics,
/// optionally scoped by context fields. Adds a position index to its owning
/// type when attached.
#[derive(Debug, Clone, Serialize)]
pub struct PositionField {
    name: String,
    mode: InsertMode,
    context: Vec<String>,
}

impl PositionField {
    pub fn new() -> Self {
        PositionField {
            name: "position".to_string(),
            mode: InsertMode::Head,
            context: Vec::new(),
        }
    }

    /// New records are appended after the current maximum position.
    pub fn tail(mut self) -> Self {
        self.mode = InsertMode::Tail;
        self
    }

    pub fn head(mut self) -> Self {
        self.mode = InsertMode::Head;
        self
    }

    /// Scope positions by the given fields (e.g. one sequence per list).
    pub fn within(mut self, context: &[&str]) -> Self {
        self.context = context.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }
}

impl Default for PositionField {
    fn default() -> Self {
        PositionField::new()
    }
}

/// A `name` column whose setter trims incoming values, with an optional
/// automatic index.
#[derive(Debug, Clone, Serialize)]
pub struct NameField {
    name: String,
    default_value: Option<String>,
    add_index: bool,
    required: bool,
    unique: bool,
    uniqueness_context: Vec<String>,
}

impl NameField {
    pub fn new() -> Self {
        NameField {
            name: "name".to_string(),
            default_value: None,
            add_index: false,
            required: false,
            unique: false,
            uniqueness_context: Vec::new(),
        }
    }

    pub fn with(name: &str, default_value: Option<&str>, add_index: bool) -> Self {
        NameField {
            name: name.to_string(),
            default_value: default_value.map(|s| s.to_string()),
            add_index,
            required: false,
            unique: false,
            uniqueness_context: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique_within(mut self, context: &[&str]) -> Self {
        self.unique = true;
        self.uniqueness_context = context.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Incoming values are trimmed before being stored.
    pub fn modifier(&self) -> &'static str {
        "trim"
    }

    pub fn adds_index(&self) -> bool {
        self.add_index
    }
}

impl Default for NameField {
    fn default() -> Self {
        NameField::new()
    }
}

/// The closed set of composite fields.
#[derive(Debug, Clone, Serialize)]
pub enum CompositeField {
    Position(PositionField),
    Name(NameField),
}

impl CompositeField {
    pub fn name(&self) -> &str {
        match self {
            CompositeField::Position(f) => &f.name,
            CompositeField::Name(f) => &f.name,
        }
    }

    /// The plain fields this composite is composed of, in accessor order.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            CompositeField::Position(f) => {
                vec![Field::int(&f.name).set_unsigned().default_value(0i64)]
            }
            CompositeField::Name(f) => {
                let mut name = Field::string(&f.name);
                if f.required {
                    name = name.required();
                }
                if f.unique {
                    name = name.set_unique(f.uniqueness_context.clone());
                }
                if let Some(default) = &f.default_value {
                    name = name.default_value(default.as_str());
                }
                vec![name]
            }
        }
    }

    /// Index to add to the owning type when this composite is attached.
    pub fn index(&self) -> Option<Index> {
        match self {
            CompositeField::Position(f) => {
                if f.context.is_empty() {
                    Some(Index::new(&f.name))
                } else {
                    let mut fields: Vec<&str> = f.context.iter().map(|s| s.as_str()).collect();
                    fields.push(&f.name);
                    Some(Index::with_fields(&f.name, &fields))
                }
            }
            CompositeField::Name(f) => f.add_index.then(|| Index::new(&f.name)),
        }
    }

    /// Capability marker to add to the owning type when attached.
    pub fn capability(&self) -> Option<Capability> {
        match self {
            CompositeField::Position(_) => Some(Capability::Position),
            CompositeField::Name(_) => None,
        }
    }

    /// Validation lines the composite contributes as a unit, emitted before
    /// the rules derived from its subfields.
    pub fn validator_rules(&self) -> Vec<ValidatorRule> {
        Vec::new()
    }
}

impl From<PositionField> for CompositeField {
    fn from(f: PositionField) -> Self {
        CompositeField::Position(f)
    }
}

impl From<NameField> for CompositeField {
    fn from(f: NameField) -> Self {
        CompositeField::Name(f)
    }
}
