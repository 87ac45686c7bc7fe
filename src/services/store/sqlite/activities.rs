use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::SqliteStore;
use crate::error::{PlannerError, Result};
use crate::models::activity::{Activity, ActivityDraft, PlacedActivity, PlacementDetails, PlacementDraft};
use crate::services::store::generated_activity_id;

const PLACEMENT_COLUMNS: &str = "id, date, end_date, activity_id, title, time, location, description";

impl SqliteStore {
    pub(super) fn list_activities(&self) -> Result<Vec<Activity>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(
            "SELECT id, name, color, is_hidden, sort_order
             FROM activities
             ORDER BY sort_order, created_at",
        )?;

        let activities = stmt
            .query_map([], map_activity_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(activities)
    }

    fn activity_exists(&self, id: &str) -> Result<bool> {
        let found = self
            .db
            .connection()
            .query_row("SELECT 1 FROM activities WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    pub(super) fn insert_activity(&self, draft: &ActivityDraft) -> Result<Activity> {
        draft.validate()?;

        let id = draft.id.clone().unwrap_or_else(generated_activity_id);
        let activity = draft.clone().into_activity(id);

        // Insert-or-ignore keeps re-creation of a known id (the system activity) harmless.
        self.db.connection().execute(
            "INSERT OR IGNORE INTO activities (id, name, color, is_hidden, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                activity.id,
                activity.name,
                activity.color,
                activity.is_hidden,
                activity.sort_order,
            ],
        )?;

        Ok(activity)
    }

    pub(super) fn write_activity(&self, id: &str, draft: &ActivityDraft) -> Result<Activity> {
        draft.validate()?;
        let activity = draft.clone().into_activity(id.to_string());

        let rows_affected = self.db.connection().execute(
            "UPDATE activities SET name = ?1, color = ?2, is_hidden = ?3, sort_order = ?4,
                updated_at = datetime('now')
             WHERE id = ?5",
            params![
                activity.name,
                activity.color,
                activity.is_hidden,
                activity.sort_order,
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(PlannerError::not_found(format!("Activity {} not found", id)));
        }

        Ok(activity)
    }

    pub(super) fn remove_activity(&self, id: &str) -> Result<()> {
        // Placements go with it through ON DELETE CASCADE.
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM activities WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(PlannerError::not_found(format!("Activity {} not found", id)));
        }

        Ok(())
    }

    pub(super) fn placements_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<PlacedActivity>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLACEMENT_COLUMNS} FROM placed_activities
             WHERE date BETWEEN ?1 AND ?2
                OR (end_date IS NOT NULL AND date <= ?2 AND end_date >= ?1)
             ORDER BY date, id"
        ))?;

        let placements = stmt
            .query_map(params![from, to], map_placement_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(placements)
    }

    pub(super) fn insert_placement(&self, draft: &PlacementDraft) -> Result<PlacedActivity> {
        draft.validate()?;
        if !self.activity_exists(&draft.activity_id)? {
            return Err(PlannerError::validation(format!(
                "Unknown activity {}",
                draft.activity_id
            )));
        }

        let placement = self.db.connection().query_row(
            &format!(
                "INSERT INTO placed_activities (date, end_date, activity_id)
                 VALUES (?1, ?2, ?3)
                 RETURNING {PLACEMENT_COLUMNS}"
            ),
            params![draft.date, draft.end_date, draft.activity_id],
            map_placement_row,
        )?;

        Ok(placement)
    }

    pub(super) fn write_placement(&self, id: i64, details: &PlacementDetails) -> Result<PlacedActivity> {
        let details = details.normalized();

        self.db
            .connection()
            .query_row(
                &format!(
                    "UPDATE placed_activities SET
                        date = COALESCE(?1, date), end_date = ?2, title = ?3, time = ?4,
                        location = ?5, description = ?6, updated_at = datetime('now')
                     WHERE id = ?7
                     RETURNING {PLACEMENT_COLUMNS}"
                ),
                params![
                    details.start_date,
                    details.end_date,
                    details.title,
                    details.time,
                    details.location,
                    details.description,
                    id,
                ],
                map_placement_row,
            )
            .optional()?
            .ok_or_else(|| PlannerError::not_found(format!("Placement {} not found", id)))
    }

    pub(super) fn remove_placement(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM placed_activities WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(PlannerError::not_found(format!("Placement {} not found", id)));
        }

        Ok(())
    }
}

fn map_activity_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        is_hidden: row.get::<_, i32>(3)? != 0,
        sort_order: row.get(4)?,
    })
}

fn map_placement_row(row: &Row<'_>) -> rusqlite::Result<PlacedActivity> {
    Ok(PlacedActivity {
        id: row.get(0)?,
        date: row.get(1)?,
        end_date: row.get(2)?,
        activity_id: row.get(3)?,
        title: row.get(4)?,
        time: row.get(5)?,
        location: row.get(6)?,
        description: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::SYSTEM_HOLIDAY_ACTIVITY_ID;
    use crate::utils::date::DateRange;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn setup_store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    fn remote(store: &SqliteStore) -> Activity {
        store
            .insert_activity(&ActivityDraft {
                id: Some("remote".to_string()),
                ..ActivityDraft::new("Remote", "#3b82f6")
            })
            .unwrap()
    }

    #[test]
    fn test_insert_activity_generates_id() {
        let store = setup_store();
        let activity = store.insert_activity(&ActivityDraft::new("Gym", "#10b981")).unwrap();
        assert!(!activity.id.is_empty());
        assert_eq!(store.list_activities().unwrap(), vec![activity]);
    }

    #[test]
    fn test_insert_known_id_is_ignored() {
        let store = setup_store();
        let system = crate::models::activity::Activity::system_holidays();
        store.insert_activity(&system.to_draft()).unwrap();
        store.insert_activity(&system.to_draft()).unwrap();

        let activities = store.list_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, SYSTEM_HOLIDAY_ACTIVITY_ID);
    }

    #[test]
    fn test_write_activity_hides_it() {
        let store = setup_store();
        let activity = remote(&store);

        let mut draft = activity.to_draft();
        draft.is_hidden = true;
        store.write_activity(&activity.id, &draft).unwrap();

        assert!(store.list_activities().unwrap()[0].is_hidden);
        assert!(matches!(
            store.write_activity("missing", &draft),
            Err(PlannerError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_activity_cascades_to_placements() {
        let store = setup_store();
        let activity = remote(&store);
        store
            .insert_placement(&PlacementDraft::new(activity.id.clone(), DateRange::normalized(d(6, 3), d(6, 5))))
            .unwrap();

        store.remove_activity(&activity.id).unwrap();
        assert!(store.placements_between(d(1, 1), d(12, 31)).unwrap().is_empty());
    }

    #[test]
    fn test_insert_placement_for_unknown_activity_fails() {
        let store = setup_store();
        let result = store.insert_placement(&PlacementDraft::new("ghost", DateRange::single(d(6, 3))));
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn test_write_placement_details() {
        let store = setup_store();
        let activity = remote(&store);
        let placement = store
            .insert_placement(&PlacementDraft::new(activity.id, DateRange::single(d(6, 3))))
            .unwrap();

        let details = PlacementDetails {
            title: Some("Client site".to_string()),
            location: Some("Lyon".to_string()),
            ..PlacementDetails::default()
        }
        .with_range(DateRange::normalized(d(6, 3), d(6, 4)));
        let updated = store.write_placement(placement.id, &details).unwrap();

        assert_eq!(updated.title.as_deref(), Some("Client site"));
        assert_eq!(updated.end_date, Some(d(6, 4)));
        assert!(matches!(
            store.write_placement(999, &details),
            Err(PlannerError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_placement() {
        let store = setup_store();
        let activity = remote(&store);
        let placement = store
            .insert_placement(&PlacementDraft::new(activity.id, DateRange::single(d(6, 3))))
            .unwrap();

        store.remove_placement(placement.id).unwrap();
        assert!(matches!(
            store.remove_placement(placement.id),
            Err(PlannerError::NotFound(_))
        ));
    }
}
