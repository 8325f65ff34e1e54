//! Connection seam between the build pipeline and the database driver.
//!
//! The pipeline only ever talks to the [`Connection`] trait: it executes
//! fully-rendered statements and runs scalar existence queries. Query
//! execution, escaping quirks and transport all belong to the driver side of
//! this seam. A SQLite-backed implementation is bundled in [`sqlite`].

pub mod sqlite;

use crate::error::Result;
use crate::value::Value;

pub use sqlite::SqliteConnection;

/// A live database connection the build pipeline can apply DDL and DML to.
pub trait Connection {
    /// Execute a statement that produces no rows.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Run a query expected to produce a single scalar cell, with `?`
    /// placeholders bound from `params`. Returns `None` when the query
    /// produces no rows.
    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<i64>>;

    fn escape_table_name(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn escape_field_name(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn escape_value(&self, value: &Value) -> String {
        render_literal(value)
    }
}

/// Default SQL literal rendering shared by connection implementations.
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => quote_str(s),
        Value::Date(d) => quote_str(&d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => quote_str(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        Value::Json(j) => quote_str(&j.to_string()),
    }
}

fn quote_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
