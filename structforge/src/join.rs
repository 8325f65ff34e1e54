//! Join-table mutation for many-to-many associations: deduplicating
//! replace-on-conflict inserts in fixed-size chunks, batched removal and
//! clearing. Generated accessors delegate here through the runtime.

use log::debug;

use crate::connection::Connection;
use crate::error::{Result, StructureError};

/// Rows per insert statement, bounding statement size.
pub const BATCH_SIZE: usize = 50;

pub struct JoinTable<'a> {
    conn: &'a dyn Connection,
    table_name: String,
    left_field: String,
    right_field: String,
}

impl<'a> JoinTable<'a> {
    pub fn new(
        conn: &'a dyn Connection,
        table_name: &str,
        left_field: &str,
        right_field: &str,
    ) -> Self {
        JoinTable {
            conn,
            table_name: table_name.to_string(),
            left_field: left_field.to_string(),
            right_field: right_field.to_string(),
        }
    }

    /// Connect `owner_id` with every id in `related_ids`. Re-adding an
    /// existing pair replaces it instead of duplicating. Both sides must be
    /// persisted (non-zero identity); anything else cannot produce a valid
    /// foreign-key row.
    pub fn add(&self, owner_id: i64, related_ids: &[i64]) -> Result<()> {
        self.require_saved_owner(owner_id)?;
        if related_ids.iter().any(|id| *id <= 0) {
            return Err(StructureError::Precondition(format!(
                "All {} records need to be saved first",
                self.right_field
            )));
        }

        for chunk in related_ids.chunks(BATCH_SIZE) {
            let tuples: Vec<String> = chunk
                .iter()
                .map(|id| format!("({owner_id}, {id})"))
                .collect();
            let statement = format!(
                "REPLACE INTO {} ({}, {}) VALUES {};",
                self.conn.escape_table_name(&self.table_name),
                self.conn.escape_field_name(&self.left_field),
                self.conn.escape_field_name(&self.right_field),
                tuples.join(", ")
            );
            debug!("join add: {statement}");
            self.conn.execute(&statement)?;
        }
        Ok(())
    }

    /// Drop the connections between `owner_id` and `related_ids` in one
    /// statement. A no-op for an empty batch.
    pub fn remove(&self, owner_id: i64, related_ids: &[i64]) -> Result<()> {
        self.require_saved_owner(owner_id)?;
        if related_ids.iter().any(|id| *id <= 0) {
            return Err(StructureError::Precondition(format!(
                "All {} records need to be saved first",
                self.right_field
            )));
        }
        if related_ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = related_ids.iter().map(|id| id.to_string()).collect();
        let statement = format!(
            "DELETE FROM {} WHERE {} = {owner_id} AND {} IN ({});",
            self.conn.escape_table_name(&self.table_name),
            self.conn.escape_field_name(&self.left_field),
            self.conn.escape_field_name(&self.right_field),
            ids.join(", ")
        );
        debug!("join remove: {statement}");
        self.conn.execute(&statement)
    }

    /// Drop all connections for `owner_id`.
    pub fn clear(&self, owner_id: i64) -> Result<()> {
        self.require_saved_owner(owner_id)?;
        let statement = format!(
            "DELETE FROM {} WHERE {} = {owner_id};",
            self.conn.escape_table_name(&self.table_name),
            self.conn.escape_field_name(&self.left_field)
        );
        debug!("join clear: {statement}");
        self.conn.execute(&statement)
    }

    fn require_saved_owner(&self, owner_id: i64) -> Result<()> {
        if owner_id <= 0 {
            return Err(StructureError::Precondition(format!(
                "{} owner needs to be saved first",
                self.table_name
            )));
        }
        Ok(())
    }
}
