//! Intermediate representation of one generated data-access type: a tree of
//! declarations produced by lowering and consumed by the emitter, so name
//! derivation stays decoupled from textual formatting.

use structforge::schema::{Capability, InsertMode, ScalarKind, ValidatorRule};
use structforge::Value;

/// A getter/setter pair for one managed column, or a getter-only entry for
/// a generated column.
#[derive(Debug, Clone)]
pub struct Accessor {
    pub field: String,
    pub getter: String,
    /// Absent for generated (read-only) fields.
    pub setter: Option<String>,
    /// Ergonomic alias for boolean-prefixed names.
    pub short_getter: Option<String>,
    pub kind: ScalarKind,
    pub required: bool,
    pub protected_setter: bool,
    /// Trim incoming values before storing (name-field contribution).
    pub trim_value: bool,
}

/// One arm of the write dispatcher: every listed field casts with the same
/// caster before delegating to the base write.
#[derive(Debug, Clone)]
pub struct WriteArm {
    pub cast: ScalarKind,
    pub fields: Vec<String>,
}

/// A field whose stored value needs deserializing on read.
#[derive(Debug, Clone)]
pub struct ReadArm {
    pub field: String,
    pub kind: ScalarKind,
}

/// Position capability configuration carried into emission.
#[derive(Debug, Clone)]
pub struct PositionIr {
    pub mode: InsertMode,
    pub context: Vec<String>,
}

/// Association accessor code to inject into the generated type.
#[derive(Debug, Clone)]
pub enum AssocAccessor {
    BelongsTo {
        getter: String,
        setter: String,
        fk_field: String,
        target_class: String,
        target_table: String,
        required: bool,
    },
    HasOne {
        getter: String,
        setter: String,
        fk_field: String,
        target_class: String,
        target_table: String,
        required: bool,
    },
    HasMany {
        getter: String,
        finder_field: String,
        target_class: String,
        target_table: String,
        fk_field: String,
        order_by: Option<String>,
    },
    Habtm {
        getter: String,
        finder_field: String,
        target_class: String,
        target_table: String,
        join_table: String,
        left_field: String,
        right_field: String,
        add_method: String,
        remove_method: String,
        clear_method: String,
        order_by: Option<String>,
        source_singular: String,
        target_singular: String,
    },
}

/// Everything the emitter needs to render one type definition.
#[derive(Debug, Clone)]
pub struct TypeIr {
    /// Class-style name, e.g. `Book`.
    pub type_name: String,
    pub table_name: String,
    pub namespace: Option<String>,
    pub header_comment: Option<String>,
    pub doc_properties: Vec<(String, String)>,
    /// All managed column names in order, `id` first.
    pub fields: Vec<String>,
    /// Skips the identity field and generated fields.
    pub default_values: Vec<(String, Value)>,
    /// Generated columns with their declared cast kinds.
    pub generated_fields: Vec<(String, ScalarKind)>,
    /// Emitted only when it differs from the identity ordering.
    pub order_by: Vec<String>,
    pub protected_fields: Vec<String>,
    pub capabilities: Vec<Capability>,
    pub position: Option<PositionIr>,
    pub accessors: Vec<Accessor>,
    /// Empty when no field deserializes; the read hook is omitted entirely.
    pub read_arms: Vec<ReadArm>,
    pub write_arms: Vec<WriteArm>,
    pub association_accessors: Vec<AssocAccessor>,
    pub serialize_extra: Vec<String>,
    pub validator_rules: Vec<ValidatorRule>,
    pub deprecate_long_bool_getter: bool,
}

impl TypeIr {
    /// Finder fields the emitted struct carries for memoized lazy finders.
    pub fn finder_fields(&self) -> Vec<&str> {
        self.association_accessors
            .iter()
            .filter_map(|a| match a {
                AssocAccessor::HasMany { finder_field, .. } => Some(finder_field.as_str()),
                AssocAccessor::Habtm { finder_field, .. } => Some(finder_field.as_str()),
                _ => None,
            })
            .collect()
    }
}
