//! The migration log: every DDL/DML statement the build intends, with its
//! comment, in order — independent of which statements actually executed.

/// One intended statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub statement: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationLog {
    entries: Vec<LogEntry>,
}

impl MigrationLog {
    pub fn new() -> Self {
        MigrationLog::default()
    }

    pub fn append(&mut self, statement: &str, comment: &str) {
        self.entries.push(LogEntry {
            statement: statement.to_string(),
            comment: comment.to_string(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render the full intended schema delta as one SQL text.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str("-- ");
            out.push_str(&entry.comment);
            out.push('\n');
            out.push_str(&entry.statement);
            if !entry.statement.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order() {
        let mut log = MigrationLog::new();
        log.append("ALTER TABLE `a`;", "Create `a` constraint");
        log.append("INSERT INTO `b`;", "Seed b");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].comment, "Create `a` constraint");
        assert_eq!(log.entries()[1].statement, "INSERT INTO `b`;");
    }

    #[test]
    fn test_to_sql_format() {
        let mut log = MigrationLog::new();
        log.append("ALTER TABLE `a`;", "Create `a` constraint");
        let sql = log.to_sql();
        assert_eq!(sql, "-- Create `a` constraint\nALTER TABLE `a`;\n\n");
    }
}
