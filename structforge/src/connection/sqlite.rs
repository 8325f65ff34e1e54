//! Bundled SQLite implementation of the [`Connection`](super::Connection)
//! trait, used for development and tests of the DML paths. Constraint DDL
//! targets servers with an information schema; SQLite will refuse those
//! statements and the error is surfaced as-is.

use rusqlite::OptionalExtension;
use std::path::Path;

use super::Connection;
use crate::error::Result;
use crate::value::Value;

pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(SqliteConnection {
            conn: rusqlite::Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(SqliteConnection {
            conn: rusqlite::Connection::open_in_memory()?,
        })
    }

    /// Access to the underlying rusqlite connection, for callers that need
    /// to prepare tables or inspect state outside the build pipeline.
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl Connection for SqliteConnection {
    fn execute(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<i64>> {
        let bound: Vec<rusqlite::types::Value> = params.iter().map(to_sqlite_value).collect();
        let result = self
            .conn
            .query_row(sql, rusqlite::params_from_iter(bound), |row| row.get(0))
            .optional()?;
        Ok(result)
    }
}

fn to_sqlite_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(*b as i64),
        Value::Int(n) => rusqlite::types::Value::Integer(*n),
        Value::Float(f) => rusqlite::types::Value::Real(*f),
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Date(d) => rusqlite::types::Value::Text(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => {
            rusqlite::types::Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        Value::Json(j) => rusqlite::types::Value::Text(j.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_and_query_scalar() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE books (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();
        conn.execute("INSERT INTO books (name) VALUES ('Fellowship'), ('Two Towers')")
            .unwrap();

        let count = conn
            .query_scalar("SELECT COUNT(*) FROM books WHERE name = ?", &[
                Value::from("Fellowship"),
            ])
            .unwrap();
        assert_eq!(count, Some(1));
    }

    #[test]
    fn test_query_scalar_no_rows() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE books (id INTEGER PRIMARY KEY)")
            .unwrap();
        let result = conn
            .query_scalar("SELECT id FROM books WHERE id = ?", &[Value::Int(1)])
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_backtick_escaping_is_accepted() {
        // SQLite accepts the MySQL-style quoting the pipeline renders.
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE `books_writers` (`book_id` INTEGER, `writer_id` INTEGER)")
            .unwrap();
        conn.execute("REPLACE INTO `books_writers` (`book_id`, `writer_id`) VALUES (1, 2)")
            .unwrap();
        let count = conn
            .query_scalar("SELECT COUNT(*) FROM books_writers", &[])
            .unwrap();
        assert_eq!(count, Some(1));
    }
}
