use super::{upsert_by_identity, Coordinator};
use crate::error::Result;
use crate::models::event::{Event, EventDraft};
use crate::services::store::CalendarStore;

impl<S: CalendarStore> Coordinator<S> {
    pub async fn add_event(&self, draft: EventDraft) -> Result<Event> {
        draft.validate()?;

        let created = self.store.create_event(&draft).await?;
        log::debug!("Created event {} on {}", created.id, created.date);
        self.commit(|state| state.events.push(created.clone()));
        Ok(created)
    }

    pub async fn update_event(&self, id: i64, draft: EventDraft) -> Result<Event> {
        draft.validate()?;

        let updated = self.store.update_event(id, &draft).await?;
        self.commit(|state| upsert_by_identity(&mut state.events, updated.clone(), |e| e.id == id));
        Ok(updated)
    }

    pub async fn delete_event(&self, id: i64) -> Result<()> {
        self.store.delete_event(id).await?;
        self.commit(|state| state.events.retain(|e| e.id != id));
        Ok(())
    }
}
