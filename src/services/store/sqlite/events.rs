use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::SqliteStore;
use crate::error::{PlannerError, Result};
use crate::models::event::{Event, EventDraft};

const EVENT_COLUMNS: &str = "id, date, end_date, title, time, location, description";

impl SqliteStore {
    /// Events starting in the window, or spanning into it.
    pub(super) fn events_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Event>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE date BETWEEN ?1 AND ?2
                OR (end_date IS NOT NULL AND date <= ?2 AND end_date >= ?1)
             ORDER BY date, time"
        ))?;

        let events = stmt
            .query_map(params![from, to], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    pub(super) fn insert_event(&self, draft: &EventDraft) -> Result<Event> {
        draft.validate()?;
        let draft = draft.normalized();

        let event = self.db.connection().query_row(
            &format!(
                "INSERT INTO events (date, end_date, title, time, location, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {EVENT_COLUMNS}"
            ),
            params![
                draft.date,
                draft.end_date,
                draft.title,
                draft.time,
                draft.location,
                draft.description,
            ],
            map_event_row,
        )?;

        Ok(event)
    }

    pub(super) fn write_event(&self, id: i64, draft: &EventDraft) -> Result<Event> {
        let draft = draft.normalized();

        self.db
            .connection()
            .query_row(
                &format!(
                    "UPDATE events SET
                        date = COALESCE(?1, date), end_date = ?2, title = ?3, time = ?4,
                        location = ?5, description = ?6, updated_at = datetime('now')
                     WHERE id = ?7
                     RETURNING {EVENT_COLUMNS}"
                ),
                params![
                    draft.date,
                    draft.end_date,
                    draft.title,
                    draft.time,
                    draft.location,
                    draft.description,
                    id,
                ],
                map_event_row,
            )
            .optional()?
            .ok_or_else(|| PlannerError::not_found(format!("Event with id {} not found", id)))
    }

    pub(super) fn remove_event(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM events WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(PlannerError::not_found(format!("Event with id {} not found", id)));
        }

        Ok(())
    }
}

fn map_event_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        date: row.get(1)?,
        end_date: row.get(2)?,
        title: row.get(3)?,
        time: row.get(4)?,
        location: row.get(5)?,
        description: row.get(6)?,
    })
}
