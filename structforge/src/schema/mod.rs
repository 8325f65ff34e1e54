//! The in-memory schema model: types, fields, associations, indexes and
//! seed records, populated fluently and compiled by the builder.

pub mod association;
pub mod composite;
pub mod field;
pub mod index;
pub mod record;
pub mod structure;
pub mod ty;
pub mod validate;

pub use association::{Association, BelongsTo, HasAndBelongsToMany, HasMany, HasOne};
pub use composite::{Capability, CompositeField, InsertMode, NameField, PositionField};
pub use field::{Field, GeneratedField, ScalarKind};
pub use index::Index;
pub use record::{MultiRecord, Record, SeedRecord};
pub use structure::{Config, Structure};
pub use ty::{Type, TypeField};
pub use validate::{rule_for_field, ValidatorRule};
