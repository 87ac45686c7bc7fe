//! In-process store.
//!
//! Behaves like the remote store (not-found checks, activity cascade,
//! leave upsert) and can be told to fail or stall upcoming calls, which
//! is what the coordinator and session tests drive it with.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{generated_activity_id, CalendarStore};
use crate::error::{PlannerError, Result};
use crate::models::activity::{Activity, ActivityDraft, PlacedActivity, PlacementDetails, PlacementDraft};
use crate::models::event::{Event, EventDraft};
use crate::models::leave::{Leave, LeaveKind};
use crate::models::settings::Settings;
use crate::models::snapshot::YearSnapshot;
use crate::utils::date::{format_date, overlaps_year};

#[derive(Debug, Default)]
struct MemoryData {
    events: Vec<Event>,
    activities: Vec<Activity>,
    placed_activities: Vec<PlacedActivity>,
    leaves: Vec<Leave>,
    settings: Settings,
    next_event_id: i64,
    next_placement_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<MemoryData>,
    failures: RefCell<VecDeque<PlannerError>>,
    targeted_failures: RefCell<Vec<(String, PlannerError)>>,
    latencies: RefCell<VecDeque<Duration>>,
    calls: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a snapshot's content.
    pub fn with_snapshot(snapshot: YearSnapshot) -> Self {
        let store = Self::new();
        {
            let mut data = store.data.borrow_mut();
            data.next_event_id = snapshot.events.iter().map(|e| e.id).max().unwrap_or(0);
            data.next_placement_id = snapshot
                .placed_activities
                .iter()
                .map(|p| p.id)
                .max()
                .unwrap_or(0);
            data.events = snapshot.events;
            data.activities = snapshot.activities;
            data.placed_activities = snapshot.placed_activities;
            data.leaves = snapshot.leaves;
            data.settings = snapshot.settings;
        }
        store
    }

    /// Make the next call fail with `error` (queued, one per call).
    pub fn fail_next(&self, error: PlannerError) {
        self.failures.borrow_mut().push_back(error);
    }

    /// Make the next call to `operation` fail with `error`, whatever runs before it.
    pub fn fail_next_call_to(&self, operation: &str, error: PlannerError) {
        self.targeted_failures
            .borrow_mut()
            .push((operation.to_string(), error));
    }

    /// Delay the next call by `latency` (queued, one per call).
    pub fn delay_next(&self, latency: Duration) {
        self.latencies.borrow_mut().push_back(latency);
    }

    /// Names of the operations invoked so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.data.borrow().events.clone()
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.data.borrow().activities.clone()
    }

    pub fn placed_activities(&self) -> Vec<PlacedActivity> {
        self.data.borrow().placed_activities.clone()
    }

    pub fn leaves(&self) -> Vec<Leave> {
        self.data.borrow().leaves.clone()
    }

    pub fn settings(&self) -> Settings {
        self.data.borrow().settings.clone()
    }

    /// Record the call, then apply any queued latency and failure.
    async fn begin(&self, operation: &str) -> Result<()> {
        self.calls.borrow_mut().push(operation.to_string());

        let latency = self.latencies.borrow_mut().pop_front();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = self.failures.borrow_mut().pop_front() {
            return Err(error);
        }

        let mut targeted = self.targeted_failures.borrow_mut();
        let position = targeted.iter().position(|(name, _)| name == operation);
        match position {
            Some(position) => Err(targeted.remove(position).1),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl CalendarStore for MemoryStore {
    async fn fetch_year_snapshot(&self, year: i32) -> Result<YearSnapshot> {
        self.begin("fetch_year_snapshot").await?;
        let data = self.data.borrow();

        let mut activities = data.activities.clone();
        activities.sort_by_key(|a| a.sort_order);

        Ok(YearSnapshot {
            events: data
                .events
                .iter()
                .filter(|e| overlaps_year(e.date, e.end_date, year))
                .cloned()
                .collect(),
            activities,
            placed_activities: data
                .placed_activities
                .iter()
                .filter(|p| overlaps_year(p.date, p.end_date, year))
                .cloned()
                .collect(),
            leaves: data
                .leaves
                .iter()
                .filter(|l| overlaps_year(l.date, None, year))
                .copied()
                .collect(),
            settings: data.settings.clone(),
        })
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        self.begin("create_event").await?;
        draft.validate()?;
        let draft = draft.normalized();
        let mut data = self.data.borrow_mut();
        data.next_event_id += 1;
        let event = Event {
            id: data.next_event_id,
            date: draft
                .date
                .ok_or_else(|| PlannerError::validation("date and title are required"))?,
            end_date: draft.end_date,
            title: draft.title,
            time: draft.time,
            location: draft.location,
            description: draft.description,
        };
        data.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<Event> {
        self.begin("update_event").await?;
        let draft = draft.normalized();
        let mut data = self.data.borrow_mut();
        let event = data
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PlannerError::not_found(format!("Event with id {} not found", id)))?;

        if let Some(date) = draft.date {
            event.date = date;
        }
        event.end_date = draft.end_date;
        event.title = draft.title;
        event.time = draft.time;
        event.location = draft.location;
        event.description = draft.description;
        Ok(event.clone())
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        self.begin("delete_event").await?;
        let mut data = self.data.borrow_mut();
        let before = data.events.len();
        data.events.retain(|e| e.id != id);
        if data.events.len() == before {
            return Err(PlannerError::not_found(format!("Event with id {} not found", id)));
        }
        Ok(())
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Activity> {
        self.begin("create_activity").await?;
        draft.validate()?;
        let mut data = self.data.borrow_mut();
        let mut id = draft.id.clone().unwrap_or_else(generated_activity_id);
        if draft.id.is_none() {
            while data.activities.iter().any(|a| a.id == id) {
                id.push('0');
            }
        }

        let activity = draft.clone().into_activity(id);
        // Insert-or-ignore: an existing id keeps its stored definition.
        if !data.activities.iter().any(|a| a.id == activity.id) {
            data.activities.push(activity.clone());
        }
        Ok(activity)
    }

    async fn update_activity(&self, id: &str, draft: &ActivityDraft) -> Result<Activity> {
        self.begin("update_activity").await?;
        let mut data = self.data.borrow_mut();
        let activity = data
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| PlannerError::not_found(format!("Activity {} not found", id)))?;
        *activity = draft.clone().into_activity(id.to_string());
        Ok(activity.clone())
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.begin("delete_activity").await?;
        let mut data = self.data.borrow_mut();
        let before = data.activities.len();
        data.activities.retain(|a| a.id != id);
        if data.activities.len() == before {
            return Err(PlannerError::not_found(format!("Activity {} not found", id)));
        }
        data.placed_activities.retain(|p| p.activity_id != id);
        Ok(())
    }

    async fn create_placed_activity(&self, draft: &PlacementDraft) -> Result<PlacedActivity> {
        self.begin("create_placed_activity").await?;
        draft.validate()?;
        let mut data = self.data.borrow_mut();
        if !data.activities.iter().any(|a| a.id == draft.activity_id) {
            return Err(PlannerError::validation(format!(
                "Unknown activity {}",
                draft.activity_id
            )));
        }

        data.next_placement_id += 1;
        let placement = PlacedActivity {
            id: data.next_placement_id,
            activity_id: draft.activity_id.clone(),
            date: draft.date,
            end_date: draft.end_date,
            title: None,
            time: None,
            location: None,
            description: None,
        };
        data.placed_activities.push(placement.clone());
        Ok(placement)
    }

    async fn update_placed_activity(&self, id: i64, details: &PlacementDetails) -> Result<PlacedActivity> {
        self.begin("update_placed_activity").await?;
        let mut data = self.data.borrow_mut();
        let placement = data
            .placed_activities
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PlannerError::not_found(format!("Placement {} not found", id)))?;
        *placement = details.apply_to(placement);
        Ok(placement.clone())
    }

    async fn delete_placed_activity(&self, id: i64) -> Result<()> {
        self.begin("delete_placed_activity").await?;
        let mut data = self.data.borrow_mut();
        let before = data.placed_activities.len();
        data.placed_activities.retain(|p| p.id != id);
        if data.placed_activities.len() == before {
            return Err(PlannerError::not_found(format!("Placement {} not found", id)));
        }
        Ok(())
    }

    async fn upsert_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Leave> {
        self.begin("upsert_leave").await?;
        let mut data = self.data.borrow_mut();
        let leave = Leave { date, kind };
        match data.leaves.iter_mut().find(|l| l.date == date) {
            Some(existing) => existing.kind = kind,
            None => data.leaves.push(leave),
        }
        Ok(leave)
    }

    async fn delete_leave(&self, date: NaiveDate) -> Result<()> {
        self.begin("delete_leave").await?;
        let mut data = self.data.borrow_mut();
        let before = data.leaves.len();
        data.leaves.retain(|l| l.date != date);
        if data.leaves.len() == before {
            return Err(PlannerError::not_found(format!(
                "No leave on {}",
                format_date(date)
            )));
        }
        Ok(())
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        self.begin("update_settings").await?;
        self.data.borrow_mut().settings.merge(settings);
        Ok(settings.clone())
    }
}
