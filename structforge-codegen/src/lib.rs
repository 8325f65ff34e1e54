//! Code emission for structforge schemas.
//!
//! [`Builder`] compiles a configured [`Structure`] in two phases. Phase 1
//! lowers every type to an IR and emits its data-access definition, written
//! to an output directory or held in memory on the report. Phase 2 runs only
//! when a connection is supplied: referential-integrity constraints are
//! applied idempotently and seed records are inserted, with every intended
//! statement accumulated in the migration log.
//!
//! # Example
//!
//! ```no_run
//! use structforge::schema::{BelongsTo, Field, Structure};
//! use structforge_codegen::Builder;
//!
//! # fn main() -> structforge::Result<()> {
//! let mut structure = Structure::new();
//! structure.add_type("writers")?.add_field(Field::string("name").required())?;
//! structure
//!     .add_type("books")?
//!     .add_field(Field::string("title").required())?
//!     .add_association(BelongsTo::new("writer"))?;
//!
//! let report = Builder::new(&structure).output_dir("src/model").run_silent()?;
//! assert_eq!(report.types.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod emit;
pub mod ir;
pub mod lower;
pub mod names;

use log::info;
use std::fs;
use std::path::PathBuf;

use structforge::apply::{apply_constraints, insert_records, MigrationLog};
use structforge::connection::Connection;
use structforge::error::Result;
use structforge::event::{null_observer, Event, Observer};
use structforge::schema::Structure;

pub use emit::{emit_type, file_name};
pub use ir::TypeIr;
pub use lower::{lower, lower_type};

/// How far a build run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Definitions emitted; no connection, so DDL/seed application was
    /// skipped entirely.
    Emitted,
    /// Definitions emitted and the schema delta applied.
    Applied,
}

/// One emitted type definition.
#[derive(Debug, Clone)]
pub struct GeneratedType {
    pub type_name: String,
    pub file_name: String,
    pub source: String,
    /// Set when the definition was written to the output directory.
    pub path: Option<PathBuf>,
}

/// The outcome of a build run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub state: BuildState,
    pub types: Vec<GeneratedType>,
    pub migration_log: MigrationLog,
}

/// Two-phase build entry point.
pub struct Builder<'a> {
    structure: &'a Structure,
    output_dir: Option<PathBuf>,
    connection: Option<&'a dyn Connection>,
}

impl<'a> Builder<'a> {
    pub fn new(structure: &'a Structure) -> Self {
        Builder {
            structure,
            output_dir: None,
            connection: None,
        }
    }

    /// Write emitted definitions (and the migration log) under this
    /// directory. Without it, sources are only held on the report.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Apply constraints and seed records through this connection after
    /// emission. Without it, the build is terminal at [`BuildState::Emitted`].
    pub fn connection(mut self, connection: &'a dyn Connection) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn run(self, observer: &mut dyn Observer) -> Result<BuildReport> {
        let irs = lower::lower(self.structure)?;

        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir)?;
        }

        let mut types = Vec::new();
        for ir in &irs {
            let source = emit::emit_type(ir)?;
            let file_name = emit::file_name(ir);
            let path = match &self.output_dir {
                Some(dir) => {
                    let path = dir.join(&file_name);
                    fs::write(&path, &source)?;
                    Some(path)
                }
                None => None,
            };
            info!("built type {}", ir.type_name);
            observer.on_event(&Event::TypeBuilt {
                name: ir.type_name.clone(),
                path: path.clone(),
            });
            types.push(GeneratedType {
                type_name: ir.type_name.clone(),
                file_name,
                source,
                path,
            });
        }

        let mut migration_log = MigrationLog::new();
        let state = match self.connection {
            Some(connection) => {
                apply_constraints(self.structure, connection, &mut migration_log, observer)?;
                insert_records(self.structure, connection, &mut migration_log, observer)?;
                BuildState::Applied
            }
            None => BuildState::Emitted,
        };

        if let Some(dir) = &self.output_dir {
            if !migration_log.is_empty() {
                fs::write(dir.join("structure.sql"), migration_log.to_sql())?;
            }
        }

        Ok(BuildReport {
            state,
            types,
            migration_log,
        })
    }

    pub fn run_silent(self) -> Result<BuildReport> {
        self.run(&mut null_observer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use structforge::schema::{Field, HasAndBelongsToMany, MultiRecord};
    use structforge::Value;

    struct MockConnection {
        executed: RefCell<Vec<String>>,
        constraints: RefCell<HashSet<(String, String)>>,
    }

    impl MockConnection {
        fn new() -> Self {
            MockConnection {
                executed: RefCell::new(Vec::new()),
                constraints: RefCell::new(HashSet::new()),
            }
        }
    }

    impl Connection for MockConnection {
        fn execute(&self, sql: &str) -> Result<()> {
            self.executed.borrow_mut().push(sql.to_string());
            Ok(())
        }

        fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<i64>> {
            if sql.contains("INFORMATION_SCHEMA.KEY_COLUMN_USAGE") {
                if let (Some(Value::String(name)), Some(Value::String(table))) =
                    (params.first(), params.get(1))
                {
                    let exists = self
                        .constraints
                        .borrow()
                        .contains(&(name.clone(), table.clone()));
                    return Ok(Some(exists as i64));
                }
            }
            Ok(Some(0))
        }
    }

    fn library() -> Structure {
        let mut structure = Structure::new();
        structure
            .add_type("writers")
            .unwrap()
            .add_field(Field::string("name").required())
            .unwrap();
        structure
            .add_type("books")
            .unwrap()
            .add_field(Field::string("title").required())
            .unwrap()
            .add_association(HasAndBelongsToMany::new("writers"))
            .unwrap();
        structure.add_record(
            MultiRecord::new("writers", &["name"], vec![
                vec![Value::from("Leo Tolstoy")],
                vec![Value::from("Fyodor Dostoyevsky")],
            ])
            .unwrap()
            .comment("Initial writers"),
        );
        structure
    }

    #[test]
    fn test_emission_only_build() {
        let structure = library();
        let mut events = Vec::new();
        let report = {
            let mut observer = |event: &Event| events.push(event.clone());
            Builder::new(&structure).run(&mut observer).unwrap()
        };

        assert_eq!(report.state, BuildState::Emitted);
        assert_eq!(report.types.len(), 2);
        assert!(report.migration_log.is_empty());
        assert!(report.types.iter().all(|t| t.path.is_none()));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            Event::TypeBuilt {
                name: "Writer".into(),
                path: None
            }
        );
        assert!(report.types[1].source.contains("pub struct Book"));
    }

    #[test]
    fn test_build_writes_files_and_migration_log() {
        let structure = library();
        let dir = tempfile::tempdir().unwrap();
        let conn = MockConnection::new();

        let report = Builder::new(&structure)
            .output_dir(dir.path())
            .connection(&conn)
            .run_silent()
            .unwrap();

        assert_eq!(report.state, BuildState::Applied);
        assert!(dir.path().join("writer.rs").exists());
        assert!(dir.path().join("book.rs").exists());

        // Two HABTM constraints plus one seed insert.
        assert_eq!(conn.executed.borrow().len(), 3);
        assert_eq!(report.migration_log.len(), 3);

        let sql = fs::read_to_string(dir.path().join("structure.sql")).unwrap();
        assert!(sql.contains("-- Create `book_id_constraint` constraint"));
        assert!(sql.contains("-- Initial writers"));
        assert!(sql.contains("INSERT INTO `writers`"));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let structure = library();
        let conn = MockConnection::new();
        Builder::new(&structure)
            .connection(&conn)
            .run_silent()
            .unwrap();

        conn.constraints
            .borrow_mut()
            .insert(("book_id_constraint".into(), "books".into()));
        conn.constraints
            .borrow_mut()
            .insert(("writer_id_constraint".into(), "writers".into()));
        conn.executed.borrow_mut().clear();

        let mut events = Vec::new();
        {
            let mut observer = |event: &Event| events.push(event.clone());
            Builder::new(&structure)
                .connection(&conn)
                .run(&mut observer)
                .unwrap();
        }

        // Only the seed insert executes again; constraints are skipped.
        assert_eq!(conn.executed.borrow().len(), 1);
        assert!(conn.executed.borrow()[0].starts_with("INSERT INTO"));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::AssociationSkipped { .. }
        )));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::AssociationCreated { .. })));
    }

    #[test]
    fn test_generated_sources_parse() {
        let structure = library();
        let report = Builder::new(&structure).run_silent().unwrap();
        for generated in &report.types {
            assert!(
                syn::parse_file(&generated.source).is_ok(),
                "generated source for {} is not valid Rust",
                generated.type_name
            );
        }
    }
}
