use chrono::NaiveDate;

use super::{upsert_by_identity, Coordinator};
use crate::error::{PlannerError, Result};
use crate::models::activity::{PlacedActivity, PlacementDetails, PlacementDraft};
use crate::services::store::CalendarStore;
use crate::utils::date::DateRange;

impl<S: CalendarStore> Coordinator<S> {
    /// Stamp `activity_id` on one day or a contiguous range.
    pub async fn place_activity(&self, activity_id: &str, range: DateRange) -> Result<PlacedActivity> {
        let draft = PlacementDraft::new(activity_id, range);
        draft.validate()?;
        if self.state.borrow().activity(activity_id).is_none() {
            return Err(PlannerError::validation(format!(
                "Unknown activity {}",
                activity_id
            )));
        }

        let created = self.store.create_placed_activity(&draft).await?;
        log::debug!(
            "Placed activity {} as row {} from {}",
            created.activity_id,
            created.id,
            created.date
        );
        self.commit(|state| state.placed_activities.push(created.clone()));
        Ok(created)
    }

    pub async fn update_placement(&self, id: i64, details: PlacementDetails) -> Result<PlacedActivity> {
        let updated = self.store.update_placed_activity(id, &details).await?;
        self.commit(|state| {
            upsert_by_identity(&mut state.placed_activities, updated.clone(), |p| p.id == id)
        });
        Ok(updated)
    }

    /// Move or resize a placement, keeping its title and other details.
    pub async fn set_placement_range(&self, id: i64, range: DateRange) -> Result<PlacedActivity> {
        let placement = self
            .state
            .borrow()
            .placed_activities
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PlannerError::not_found(format!("Placement {} not found", id)))?;
        if placement.range() == range {
            return Ok(placement);
        }

        self.update_placement(id, placement.details().with_range(range))
            .await
    }

    pub async fn delete_placement(&self, id: i64) -> Result<()> {
        self.store.delete_placed_activity(id).await?;
        self.commit(|state| state.placed_activities.retain(|p| p.id != id));
        Ok(())
    }

    /// Delete the placement of `activity_id` covering `date`, if there is one.
    ///
    /// A multi-day placement is removed as a whole.
    pub async fn remove_activity_from_day(&self, date: NaiveDate, activity_id: &str) -> Result<bool> {
        let placement_id = self
            .state
            .borrow()
            .placement_on(date, activity_id)
            .map(|p| p.id);

        match placement_id {
            Some(id) => {
                self.delete_placement(id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Single-day click with an activity tool: remove it if present, place it otherwise.
    ///
    /// Returns the new placement, or `None` when one was removed.
    pub async fn toggle_activity_on_day(
        &self,
        date: NaiveDate,
        activity_id: &str,
    ) -> Result<Option<PlacedActivity>> {
        if self.remove_activity_from_day(date, activity_id).await? {
            return Ok(None);
        }
        self.place_activity(activity_id, DateRange::single(date))
            .await
            .map(Some)
    }
}
