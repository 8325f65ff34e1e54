//! Phase 2 of a build: idempotent constraint application and seed loading
//! against a live connection. Associations and records run in declaration
//! order; a failed statement aborts the rest of the build.

pub mod log;
pub mod records;

use ::log::debug;

use crate::connection::Connection;
use crate::error::Result;
use crate::event::{Event, Observer};
use crate::inflect;
use crate::schema::association::{Association, BelongsTo, HasAndBelongsToMany, HasOne};
use crate::schema::{Structure, Type};

pub use self::log::{LogEntry, MigrationLog};
pub use self::records::insert_records;

/// Walk every association that needs DDL: append the statement to the
/// migration log, then create the constraint unless it already exists.
/// Re-running against a migrated schema executes nothing and only raises
/// exists/skipped events.
pub fn apply_constraints(
    structure: &Structure,
    conn: &dyn Connection,
    migration_log: &mut MigrationLog,
    observer: &mut dyn Observer,
) -> Result<()> {
    for ty in structure.types() {
        for association in ty.associations().values() {
            match association {
                Association::BelongsTo(a) => {
                    apply_fk_constraint(ty, FkConstraint::from_belongs_to(a), conn, migration_log, observer)?;
                }
                Association::HasOne(a) => {
                    apply_fk_constraint(ty, FkConstraint::from_has_one(a), conn, migration_log, observer)?;
                }
                Association::HasMany(_) => {}
                Association::HasAndBelongsToMany(a) => {
                    apply_join_constraints(a, conn, migration_log, observer)?;
                }
            }
        }
    }
    Ok(())
}

/// The shared shape of a belongs-to / has-one constraint.
struct FkConstraint {
    field_name: String,
    constraint_name: String,
    target_type_name: String,
    required: bool,
    verb: &'static str,
}

impl FkConstraint {
    fn from_belongs_to(a: &BelongsTo) -> Self {
        FkConstraint {
            field_name: a.field_name(),
            constraint_name: a.constraint_name(),
            target_type_name: a.target_type_name(),
            required: a.is_required(),
            verb: "belongs to",
        }
    }

    fn from_has_one(a: &HasOne) -> Self {
        FkConstraint {
            field_name: a.field_name(),
            constraint_name: a.constraint_name(),
            target_type_name: a.target_type_name(),
            required: a.is_required(),
            verb: "has one",
        }
    }
}

fn apply_fk_constraint(
    ty: &Type,
    fk: FkConstraint,
    conn: &dyn Connection,
    migration_log: &mut MigrationLog,
    observer: &mut dyn Observer,
) -> Result<()> {
    let statement = prepare_fk_constraint_statement(conn, ty.name(), &fk);
    migration_log.append(
        &statement,
        &format!("Create `{}` constraint", fk.constraint_name),
    );

    let description = format!(
        "{} {} {}",
        ty.name(),
        fk.verb,
        inflect::singularize(&fk.target_type_name)
    );

    if constraint_exists(conn, &fk.constraint_name, &fk.target_type_name)? {
        debug!("constraint {} already exists", fk.constraint_name);
        observer.on_event(&Event::AssociationExists { description });
    } else {
        conn.execute(&statement)?;
        observer.on_event(&Event::AssociationCreated { description });
    }
    Ok(())
}

fn apply_join_constraints(
    association: &HasAndBelongsToMany,
    conn: &dyn Connection,
    migration_log: &mut MigrationLog,
    observer: &mut dyn Observer,
) -> Result<()> {
    let join_table = association.join_table_name();
    let source = association.source_type_name().to_string();
    let target = association.target_type_name();

    let left_statement = prepare_join_constraint_statement(
        conn,
        &join_table,
        &association.left_constraint_name(),
        &association.left_field_name(),
        &source,
    );
    migration_log.append(
        &left_statement,
        &format!("Create `{}` constraint", association.left_constraint_name()),
    );

    let right_statement = prepare_join_constraint_statement(
        conn,
        &join_table,
        &association.right_constraint_name(),
        &association.right_field_name(),
        &target,
    );
    migration_log.append(
        &right_statement,
        &format!("Create `{}` constraint", association.right_constraint_name()),
    );

    let left_description = format!("{} has many {}", inflect::singularize(&source), target);
    if constraint_exists(conn, &association.left_constraint_name(), &source)? {
        observer.on_event(&Event::AssociationSkipped {
            description: left_description,
        });
    } else {
        conn.execute(&left_statement)?;
        observer.on_event(&Event::AssociationCreated {
            description: left_description,
        });
    }

    let right_description = format!("{} has many {}", inflect::singularize(&target), source);
    if constraint_exists(conn, &association.right_constraint_name(), &target)? {
        observer.on_event(&Event::AssociationSkipped {
            description: right_description,
        });
    } else {
        conn.execute(&right_statement)?;
        observer.on_event(&Event::AssociationCreated {
            description: right_description,
        });
    }
    Ok(())
}

fn prepare_fk_constraint_statement(
    conn: &dyn Connection,
    source_table: &str,
    fk: &FkConstraint,
) -> String {
    let policy = if fk.required {
        "ON UPDATE CASCADE ON DELETE CASCADE"
    } else {
        "ON UPDATE SET NULL ON DELETE SET NULL"
    };
    [
        format!("ALTER TABLE {}", conn.escape_table_name(source_table)),
        format!(
            "    ADD CONSTRAINT {}",
            conn.escape_field_name(&fk.constraint_name)
        ),
        format!(
            "    FOREIGN KEY ({}) REFERENCES {}(`id`)",
            conn.escape_field_name(&fk.field_name),
            conn.escape_table_name(&fk.target_type_name)
        ),
        format!("    {policy};"),
    ]
    .join("\n")
}

fn prepare_join_constraint_statement(
    conn: &dyn Connection,
    join_table: &str,
    constraint_name: &str,
    field_name: &str,
    referenced_table: &str,
) -> String {
    [
        format!("ALTER TABLE {}", conn.escape_table_name(join_table)),
        format!(
            "    ADD CONSTRAINT {}",
            conn.escape_field_name(constraint_name)
        ),
        format!(
            "    FOREIGN KEY ({}) REFERENCES {}(`id`)",
            conn.escape_field_name(field_name),
            conn.escape_table_name(referenced_table)
        ),
        "    ON UPDATE CASCADE ON DELETE CASCADE;".to_string(),
    ]
    .join("\n")
}

/// Look the constraint up in the information schema by name and referenced
/// table. This check-then-act sequence is the idempotency guarantee.
fn constraint_exists(
    conn: &dyn Connection,
    constraint_name: &str,
    referenced_table: &str,
) -> Result<bool> {
    let count = conn.query_scalar(
        "SELECT COUNT(*) AS row_count \
         FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE \
         WHERE CONSTRAINT_NAME = ? AND REFERENCED_TABLE_NAME = ?;",
        &[constraint_name.into(), referenced_table.into()],
    )?;
    Ok(count.unwrap_or(0) > 0)
}
