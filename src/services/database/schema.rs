use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;
use crate::models::settings::{DEFAULT_TOTAL_LEAVES, TOTAL_LEAVES_KEY};

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_events_table(conn)?;
    create_activities_table(conn)?;
    create_placed_activities_table(conn)?;
    run_range_migrations(conn)?;
    create_leaves_table(conn)?;
    create_settings_table(conn)?;
    insert_default_settings(conn)?;
    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            end_date TEXT,
            title TEXT NOT NULL,
            time TEXT,
            location TEXT,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)",
        [],
    )
    .context("Failed to create events date index")?;

    Ok(())
}

fn create_activities_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            is_hidden INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create activities table")?;

    Ok(())
}

fn create_placed_activities_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS placed_activities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            end_date TEXT,
            activity_id TEXT NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
            title TEXT,
            time TEXT,
            location TEXT,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create placed_activities table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_placed_activities_date ON placed_activities(date)",
        [],
    )
    .context("Failed to create placed_activities date index")?;

    Ok(())
}

/// Databases created before multi-day ranges existed lack `end_date`.
fn run_range_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "end_date",
        "ALTER TABLE events ADD COLUMN end_date TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "placed_activities",
        "end_date",
        "ALTER TABLE placed_activities ADD COLUMN end_date TEXT",
    )?;

    Ok(())
}

fn create_leaves_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS leaves (
            date TEXT PRIMARY KEY,
            type TEXT NOT NULL CHECK (type IN ('full', 'morning', 'afternoon')),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create leaves table")?;

    Ok(())
}

fn create_settings_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create settings table")?;

    Ok(())
}

fn insert_default_settings(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
        (TOTAL_LEAVES_KEY, DEFAULT_TOTAL_LEAVES.to_string()),
    )
    .context("Failed to insert default settings")?;

    Ok(())
}
