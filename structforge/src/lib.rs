//! Schema-driven structure compiler.
//!
//! A [`Structure`] is populated fluently with record types, their fields,
//! associations, indexes and seed data. The companion `structforge-codegen`
//! crate compiles it in two phases: per-type data-access definitions are
//! emitted first, then — given a live connection — referential-integrity
//! constraints are applied idempotently and seed rows are inserted, with a
//! migration log accumulating every intended statement.

pub mod apply;
pub mod connection;
pub mod error;
pub mod event;
pub mod inflect;
pub mod join;
pub mod schema;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use apply::{LogEntry, MigrationLog};
pub use connection::{Connection, SqliteConnection};
pub use error::{Result, StructureError};
pub use event::{null_observer, Event, Observer};
pub use schema::{
    Association, BelongsTo, Capability, CompositeField, Config, Field, GeneratedField,
    HasAndBelongsToMany, HasMany, HasOne, Index, InsertMode, MultiRecord, NameField,
    PositionField, Record, ScalarKind, SeedRecord, Structure, Type, TypeField, ValidatorRule,
};
pub use value::Value;
