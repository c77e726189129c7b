//! Database Connection and Setup
//!
//! Opens the SQLite file backing the document store and runs migrations.

use rusqlite::Connection;
use std::path::Path;

use crate::domain::{DomainError, DomainResult};

/// Open (or create) the database at `db_path`
///
/// `":memory:"` gives a private in-memory database.
pub fn init_db(db_path: &Path) -> DomainResult<Connection> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Config(format!("Failed to open db {}: {}", db_path.display(), e)))?;

    run_migrations(&conn)?;
    Ok(conn)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    // One row per document; `body` is the JSON object without its id
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER,
            UNIQUE(collection, id)
        )",
        [],
    )
    .map_err(|e| DomainError::Config(e.to_string()))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )
    .map_err(|e| DomainError::Config(e.to_string()))?;

    Ok(())
}
