use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StructureError>;
