//! Seed-data loading: one multi-row insert statement per record entry.

use log::debug;

use crate::connection::Connection;
use crate::error::Result;
use crate::event::{Event, Observer};
use crate::schema::record::SeedRecord;
use crate::schema::Structure;

use super::MigrationLog;

/// Insert every seed record in declaration order, logging each statement
/// with its comment and raising one inserted event per entry.
pub fn insert_records(
    structure: &Structure,
    conn: &dyn Connection,
    migration_log: &mut MigrationLog,
    observer: &mut dyn Observer,
) -> Result<()> {
    for record in structure.records() {
        let statement = prepare_insert_statement(conn, record);
        migration_log.append(&statement, &record.comment());

        debug!("seed insert: {statement}");
        conn.execute(&statement)?;
        observer.on_event(&Event::RecordsInserted {
            description: record.insert_message(),
        });
    }
    Ok(())
}

fn prepare_insert_statement(conn: &dyn Connection, record: &SeedRecord) -> String {
    let field_list: Vec<String> = record
        .fields()
        .iter()
        .map(|f| conn.escape_field_name(f))
        .collect();

    let rows: Vec<String> = record
        .rows()
        .iter()
        .map(|row| {
            let values: Vec<String> = row.iter().map(|v| conn.escape_value(v)).collect();
            format!("    ({})", values.join(","))
        })
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES\n{};",
        conn.escape_table_name(record.table_name()),
        field_list.join(","),
        rows.join(",\n")
    )
}
