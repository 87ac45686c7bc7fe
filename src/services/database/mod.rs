// Database service module
// SQLite connection and schema management for the local store

mod connection;
pub mod migrations;
pub mod schema;

pub use connection::Database;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn table_exists(db: &Database, name: &str) -> bool {
        let count: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("planner.db");
        let db_path_str = db_path.to_str().unwrap();

        let result = Database::new(db_path_str);
        assert!(result.is_ok(), "Should create file-based database");
        assert!(Path::new(db_path_str).exists(), "Database file should exist");
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();

        for table in ["events", "activities", "placed_activities", "leaves", "settings"] {
            assert!(table_exists(&db, table), "{} table should exist", table);
        }
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        assert!(db.initialize_schema().is_ok());
    }

    #[test]
    fn test_default_total_leaves_seeded() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();

        let value: String = db
            .connection()
            .query_row("SELECT value FROM settings WHERE key = 'totalLeaves'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "25");
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::in_memory().unwrap();
        assert!(db.foreign_keys_enabled().unwrap(), "Foreign keys should be enabled");
    }

    #[test]
    fn test_deleting_activity_cascades_to_placements() {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();
        let conn = db.connection();
        conn.execute(
            "INSERT INTO activities (id, name, color) VALUES ('remote', 'Remote', '#3b82f6')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO placed_activities (activity_id, date) VALUES ('remote', '2024-06-03')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM activities WHERE id = 'remote'", []).unwrap();

        let left: i64 = conn
            .query_row("SELECT COUNT(*) FROM placed_activities", [], |row| row.get(0))
            .unwrap();
        assert_eq!(left, 0);
    }
}
