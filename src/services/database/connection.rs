use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

const IN_MEMORY: &str = ":memory:";

/// The planner's SQLite file.
///
/// Placements reference their activity with `ON DELETE CASCADE`; SQLite
/// only honours that while `foreign_keys` is on for the connection, so
/// every constructor turns it on before handing the connection out.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `path` (`:memory:` for a throwaway database).
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open planner database at {}", path))?;
        Self::with_foreign_keys(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(IN_MEMORY)
    }

    fn with_foreign_keys(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .context("Failed to enable foreign keys for placement cascade")?;
        let db = Self { conn };
        if !db.foreign_keys_enabled()? {
            anyhow::bail!("SQLite build ignores foreign keys; placements would outlive their activity");
        }
        Ok(db)
    }

    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        let enabled: bool = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .context("Failed to read foreign_keys pragma")?;
        Ok(enabled)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Planner tables, column migrations and the default leave quota.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }
}
