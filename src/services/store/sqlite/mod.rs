//! SQLite-backed store for running the planner without a remote backend.
//! Operations are split across focused submodules the same way the
//! remote API groups its endpoints.

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::CalendarStore;
use crate::error::Result;
use crate::models::activity::{Activity, ActivityDraft, PlacedActivity, PlacementDetails, PlacementDraft};
use crate::models::event::{Event, EventDraft};
use crate::models::leave::{Leave, LeaveKind};
use crate::models::settings::Settings;
use crate::models::snapshot::YearSnapshot;
use crate::services::database::Database;
use crate::utils::date::year_bounds;

mod activities;
mod events;
mod leaves;

/// Store persisting everything in a local SQLite database.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wrap an already opened database, creating the schema if needed.
    pub fn new(db: Database) -> anyhow::Result<Self> {
        db.initialize_schema()
            .context("Failed to prepare planner schema")?;
        Ok(Self { db })
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: &str) -> anyhow::Result<Self> {
        Self::new(Database::new(path)?)
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        Self::new(Database::in_memory()?)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn snapshot(&self, year: i32) -> Result<YearSnapshot> {
        let (from, to) = year_bounds(year).ok_or_else(|| {
            crate::error::PlannerError::validation(format!("Year {} is out of range", year))
        })?;

        Ok(YearSnapshot {
            events: self.events_between(from, to)?,
            activities: self.list_activities()?,
            placed_activities: self.placements_between(from, to)?,
            leaves: self.leaves_between(from, to)?,
            settings: self.load_settings()?,
        })
    }
}

#[async_trait(?Send)]
impl CalendarStore for SqliteStore {
    async fn fetch_year_snapshot(&self, year: i32) -> Result<YearSnapshot> {
        self.snapshot(year)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        self.insert_event(draft)
    }

    async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<Event> {
        self.write_event(id, draft)
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        self.remove_event(id)
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Activity> {
        self.insert_activity(draft)
    }

    async fn update_activity(&self, id: &str, draft: &ActivityDraft) -> Result<Activity> {
        self.write_activity(id, draft)
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.remove_activity(id)
    }

    async fn create_placed_activity(&self, draft: &PlacementDraft) -> Result<PlacedActivity> {
        self.insert_placement(draft)
    }

    async fn update_placed_activity(&self, id: i64, details: &PlacementDetails) -> Result<PlacedActivity> {
        self.write_placement(id, details)
    }

    async fn delete_placed_activity(&self, id: i64) -> Result<()> {
        self.remove_placement(id)
    }

    async fn upsert_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Leave> {
        self.write_leave(date, kind)
    }

    async fn delete_leave(&self, date: NaiveDate) -> Result<()> {
        self.remove_leave(date)
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        self.write_settings(settings)
    }
}
