//! Shared test doubles for modules that exercise the connection seam.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::connection::Connection;
use crate::error::Result;
use crate::value::Value;

/// Connection that records executed statements and answers constraint
/// existence queries from a scripted set of (constraint, referenced table)
/// pairs.
pub struct RecordingConnection {
    pub executed: RefCell<Vec<String>>,
    pub constraints: RefCell<HashSet<(String, String)>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        RecordingConnection {
            executed: RefCell::new(Vec::new()),
            constraints: RefCell::new(HashSet::new()),
        }
    }

    pub fn mark_constraint(&self, name: &str, referenced_table: &str) {
        self.constraints
            .borrow_mut()
            .insert((name.to_string(), referenced_table.to_string()));
    }
}

impl Connection for RecordingConnection {
    fn execute(&self, sql: &str) -> Result<()> {
        self.executed.borrow_mut().push(sql.to_string());
        Ok(())
    }

    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<i64>> {
        if sql.contains("INFORMATION_SCHEMA.KEY_COLUMN_USAGE") {
            let key = match (params.first(), params.get(1)) {
                (Some(Value::String(name)), Some(Value::String(table))) => {
                    (name.clone(), table.clone())
                }
                _ => return Ok(Some(0)),
            };
            let exists = self.constraints.borrow().contains(&key);
            return Ok(Some(exists as i64));
        }
        Ok(Some(0))
    }
}
