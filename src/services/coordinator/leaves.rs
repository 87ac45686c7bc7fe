use chrono::NaiveDate;

use super::Coordinator;
use crate::error::{PlannerError, Result};
use crate::models::leave::{Leave, LeaveKind};
use crate::models::settings::{Settings, TOTAL_LEAVES_KEY};
use crate::services::store::CalendarStore;

impl<S: CalendarStore> Coordinator<S> {
    pub async fn set_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Leave> {
        let leave = self.store.upsert_leave(date, kind).await?;
        self.commit(|state| {
            state.leaves.insert(leave.date, leave.kind);
        });
        Ok(leave)
    }

    pub async fn clear_leave(&self, date: NaiveDate) -> Result<()> {
        self.store.delete_leave(date).await?;
        self.commit(|state| {
            state.leaves.remove(&date);
        });
        Ok(())
    }

    /// Leave-mode click: the same kind again clears the day, anything else sets it.
    ///
    /// Returns the leave now recorded, or `None` when the day was cleared.
    pub async fn toggle_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Option<Leave>> {
        let current = self.state.borrow().leave_on(date);
        if current == Some(kind) {
            self.clear_leave(date).await?;
            return Ok(None);
        }
        self.set_leave(date, kind).await.map(Some)
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<Settings> {
        settings.validate()?;

        let saved = self.store.update_settings(&settings).await?;
        self.commit(|state| state.settings.merge(&saved));
        Ok(saved)
    }

    /// Set the leave quota for the displayed year.
    pub async fn set_total_leaves(&self, total: u32) -> Result<u32> {
        if total == 0 {
            return Err(PlannerError::validation(
                "Total leaves must be a positive integer",
            ));
        }

        let saved = self
            .update_settings(Settings::new().with(TOTAL_LEAVES_KEY, total.to_string()))
            .await?;
        Ok(saved.total_leaves())
    }
}
