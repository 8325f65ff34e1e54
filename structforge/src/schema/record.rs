//! Seed data: literal rows inserted into a type's table once, each carrying
//! a comment for the migration log.

use serde::Serialize;

use crate::error::{Result, StructureError};
use crate::value::Value;

/// A single seed row.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    table_name: String,
    fields: Vec<String>,
    values: Vec<Value>,
    comment: Option<String>,
}

impl Record {
    pub fn new(table_name: &str, fields: &[&str], values: Vec<Value>) -> Result<Self> {
        if fields.len() != values.len() {
            return Err(StructureError::Schema(format!(
                "Record for '{table_name}' has {} fields but {} values",
                fields.len(),
                values.len()
            )));
        }
        Ok(Record {
            table_name: table_name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            values,
            comment: None,
        })
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// A batch of seed rows sharing one field list.
#[derive(Debug, Clone, Serialize)]
pub struct MultiRecord {
    table_name: String,
    fields: Vec<String>,
    rows: Vec<Vec<Value>>,
    comment: Option<String>,
}

impl MultiRecord {
    pub fn new(table_name: &str, fields: &[&str], rows: Vec<Vec<Value>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != fields.len() {
                return Err(StructureError::Schema(format!(
                    "Row {i} for '{table_name}' has {} values but {} fields are declared",
                    row.len(),
                    fields.len()
                )));
            }
        }
        Ok(MultiRecord {
            table_name: table_name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            rows,
            comment: None,
        })
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// A seed entry of either arity.
#[derive(Debug, Clone, Serialize)]
pub enum SeedRecord {
    Single(Record),
    Multi(MultiRecord),
}

impl SeedRecord {
    pub fn table_name(&self) -> &str {
        match self {
            SeedRecord::Single(r) => &r.table_name,
            SeedRecord::Multi(r) => &r.table_name,
        }
    }

    pub fn fields(&self) -> &[String] {
        match self {
            SeedRecord::Single(r) => &r.fields,
            SeedRecord::Multi(r) => &r.fields,
        }
    }

    pub fn rows(&self) -> Vec<&[Value]> {
        match self {
            SeedRecord::Single(r) => vec![&r.values],
            SeedRecord::Multi(r) => r.rows.iter().map(|row| row.as_slice()).collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            SeedRecord::Single(_) => 1,
            SeedRecord::Multi(r) => r.rows.len(),
        }
    }

    /// Comment for the migration log; defaults to the insert message.
    pub fn comment(&self) -> String {
        let comment = match self {
            SeedRecord::Single(r) => &r.comment,
            SeedRecord::Multi(r) => &r.comment,
        };
        comment.clone().unwrap_or_else(|| self.insert_message())
    }

    /// Human-readable payload for the inserted event, singular-phrased for
    /// one row.
    pub fn insert_message(&self) -> String {
        let count = self.row_count();
        if count > 1 {
            format!(
                "Inserting {count} records into {} table.",
                self.table_name()
            )
        } else {
            format!("Inserting a record into {} table.", self.table_name())
        }
    }
}

impl From<Record> for SeedRecord {
    fn from(r: Record) -> Self {
        SeedRecord::Single(r)
    }
}

impl From<MultiRecord> for SeedRecord {
    fn from(r: MultiRecord) -> Self {
        SeedRecord::Multi(r)
    }
}
