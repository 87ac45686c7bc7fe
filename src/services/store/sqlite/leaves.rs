use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Row};

use super::SqliteStore;
use crate::error::{PlannerError, Result};
use crate::models::leave::{Leave, LeaveKind};
use crate::models::settings::Settings;
use crate::utils::date::format_date;

impl SqliteStore {
    pub(super) fn leaves_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Leave>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(
            "SELECT date, type FROM leaves WHERE date BETWEEN ?1 AND ?2 ORDER BY date",
        )?;

        let leaves = stmt
            .query_map(params![from, to], map_leave_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(leaves)
    }

    pub(super) fn write_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Leave> {
        self.db.connection().execute(
            "INSERT INTO leaves (date, type) VALUES (?1, ?2)
             ON CONFLICT(date) DO UPDATE SET type = excluded.type, updated_at = datetime('now')",
            params![date, kind.as_str()],
        )?;

        Ok(Leave { date, kind })
    }

    pub(super) fn remove_leave(&self, date: NaiveDate) -> Result<()> {
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM leaves WHERE date = ?1", params![date])?;

        if rows_affected == 0 {
            return Err(PlannerError::not_found(format!(
                "No leave on {}",
                format_date(date)
            )));
        }

        Ok(())
    }

    pub(super) fn load_settings(&self) -> Result<Settings> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;

        let mut settings = Settings::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            settings.set(key, value);
        }

        Ok(settings)
    }

    pub(super) fn write_settings(&self, settings: &Settings) -> Result<Settings> {
        settings.validate()?;

        let tx = self.db.connection().unchecked_transaction()?;
        for (key, value) in settings.iter() {
            tx.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )?;
        }
        tx.commit()?;

        Ok(settings.clone())
    }
}

fn map_leave_row(row: &Row<'_>) -> rusqlite::Result<Leave> {
    let raw: String = row.get(1)?;
    let kind = raw
        .parse::<LeaveKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(Leave {
        date: row.get(0)?,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::TOTAL_LEAVES_KEY;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn setup_store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    #[test]
    fn test_write_leave_upserts() {
        let store = setup_store();
        store.write_leave(d(2024, 3, 1), LeaveKind::Full).unwrap();
        store.write_leave(d(2024, 3, 1), LeaveKind::Afternoon).unwrap();

        let leaves = store.leaves_between(d(2024, 1, 1), d(2024, 12, 31)).unwrap();
        assert_eq!(leaves, vec![Leave { date: d(2024, 3, 1), kind: LeaveKind::Afternoon }]);
    }

    #[test]
    fn test_leaves_between_excludes_other_years() {
        let store = setup_store();
        store.write_leave(d(2023, 12, 29), LeaveKind::Full).unwrap();
        store.write_leave(d(2024, 1, 2), LeaveKind::Morning).unwrap();

        let leaves = store.leaves_between(d(2024, 1, 1), d(2024, 12, 31)).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].date, d(2024, 1, 2));
    }

    #[test]
    fn test_remove_leave() {
        let store = setup_store();
        store.write_leave(d(2024, 3, 1), LeaveKind::Full).unwrap();
        store.remove_leave(d(2024, 3, 1)).unwrap();
        assert!(matches!(
            store.remove_leave(d(2024, 3, 1)),
            Err(PlannerError::NotFound(_))
        ));
    }

    #[test]
    fn test_settings_roundtrip_through_table() {
        let store = setup_store();
        assert_eq!(store.load_settings().unwrap().total_leaves(), 25);

        store
            .write_settings(&Settings::new().with(TOTAL_LEAVES_KEY, "30"))
            .unwrap();
        assert_eq!(store.load_settings().unwrap().total_leaves(), 30);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let store = setup_store();
        let result = store.write_settings(&Settings::new().with(TOTAL_LEAVES_KEY, "0"));
        assert!(matches!(result, Err(PlannerError::Validation(_))));
        assert_eq!(store.load_settings().unwrap().total_leaves(), 25);
    }
}
