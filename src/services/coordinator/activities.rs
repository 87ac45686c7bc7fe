use super::{upsert_by_identity, Coordinator};
use crate::error::Result;
use crate::models::activity::{Activity, ActivityDraft};
use crate::services::store::CalendarStore;

impl<S: CalendarStore> Coordinator<S> {
    pub async fn add_activity(&self, draft: ActivityDraft) -> Result<Activity> {
        draft.validate()?;

        let created = self.store.create_activity(&draft).await?;
        self.commit(|state| {
            if !state.activities.iter().any(|a| a.id == created.id) {
                state.activities.push(created.clone());
            }
        });
        Ok(created)
    }

    pub async fn update_activity(&self, id: &str, draft: ActivityDraft) -> Result<Activity> {
        draft.validate()?;
        self.require_activity(id)?;

        let updated = self.store.update_activity(id, &draft).await?;
        self.replace_activity(updated.clone());
        Ok(updated)
    }

    /// Flip the hidden flag. Hidden activities stay placed but are not shown.
    pub async fn toggle_activity_hidden(&self, id: &str) -> Result<Activity> {
        let mut draft = self.require_activity(id)?.to_draft();
        draft.is_hidden = !draft.is_hidden;

        let updated = self.store.update_activity(id, &draft).await?;
        self.replace_activity(updated.clone());
        Ok(updated)
    }

    /// Delete an activity together with every placement of it.
    pub async fn delete_activity(&self, id: &str) -> Result<()> {
        self.store.delete_activity(id).await?;

        self.commit(|state| {
            state.activities.retain(|a| a.id != id);
            state.placed_activities.retain(|p| p.activity_id != id);
        });
        self.track_system_activity(id, None);
        log::debug!("Deleted activity {} and its placements", id);
        Ok(())
    }

    fn replace_activity(&self, updated: Activity) {
        self.track_system_activity(&updated.id, Some(&updated));
        self.commit(|state| {
            let id = updated.id.clone();
            upsert_by_identity(&mut state.activities, updated, |a| a.id == id)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{d, loaded};
    use crate::error::PlannerError;
    use crate::models::activity::ActivityDraft;
    use crate::services::store::MemoryStore;
    use crate::utils::date::DateRange;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_delete_activity_cascades_only_its_placements() {
        let coordinator = loaded(MemoryStore::new()).await;
        let remote = coordinator
            .add_activity(ActivityDraft::new("Remote", "#3b82f6"))
            .await
            .unwrap();
        let gym = coordinator
            .add_activity(ActivityDraft::new("Gym", "#10b981"))
            .await
            .unwrap();
        coordinator
            .place_activity(&remote.id, DateRange::normalized(d(6, 3), d(6, 5)))
            .await
            .unwrap();
        let kept = coordinator
            .place_activity(&gym.id, DateRange::single(d(6, 4)))
            .await
            .unwrap();
        coordinator
            .place_activity(&gym.id, DateRange::single(d(7, 1)))
            .await
            .unwrap();
        let july_before: Vec<_> = coordinator
            .state()
            .placement_index
            .entries_on(d(7, 1))
            .to_vec();

        coordinator.delete_activity(&remote.id).await.unwrap();

        let state = coordinator.state();
        assert!(state.activity(&remote.id).is_none());
        assert!(state.placed_activities.iter().all(|p| p.activity_id != remote.id));
        assert!(state.placement_index.records_on(d(6, 3)).next().is_none());
        assert_eq!(
            state.placement_index.records_on(d(6, 4)).collect::<Vec<_>>(),
            vec![&kept]
        );
        assert_eq!(state.placement_index.entries_on(d(7, 1)), july_before.as_slice());
    }

    #[tokio::test]
    async fn test_toggle_hidden_round_trip() {
        let coordinator = loaded(MemoryStore::new()).await;
        let remote = coordinator
            .add_activity(ActivityDraft::new("Remote", "#3b82f6"))
            .await
            .unwrap();

        assert!(coordinator.toggle_activity_hidden(&remote.id).await.unwrap().is_hidden);
        assert!(coordinator.state().activity(&remote.id).unwrap().is_hidden);
        assert!(!coordinator.toggle_activity_hidden(&remote.id).await.unwrap().is_hidden);
    }

    #[tokio::test]
    async fn test_update_unknown_activity_is_not_found() {
        let coordinator = loaded(MemoryStore::new()).await;
        let before = coordinator.store().calls().len();

        let result = coordinator
            .update_activity("ghost", ActivityDraft::new("Ghost", "#000000"))
            .await;
        assert!(matches!(result, Err(PlannerError::NotFound(_))));
        assert_eq!(coordinator.store().calls().len(), before);
    }

    #[tokio::test]
    async fn test_invalid_color_rejected() {
        let coordinator = loaded(MemoryStore::new()).await;
        let result = coordinator
            .add_activity(ActivityDraft::new("Remote", "blue"))
            .await;
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }
}
