//! Store interface consumed by the coordinator.
//!
//! Every operation is a single request/response. Implementations report
//! failures as one [`PlannerError`](crate::error::PlannerError) and never
//! retry on their own.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::activity::{Activity, ActivityDraft, PlacedActivity, PlacementDetails, PlacementDraft};
use crate::models::event::{Event, EventDraft};
use crate::models::leave::{Leave, LeaveKind};
use crate::models::settings::Settings;
use crate::models::snapshot::YearSnapshot;

pub mod http;
pub mod memory;
pub mod sqlite;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Backend holding events, activities, placements, leaves and settings.
///
/// Futures are not required to be `Send`: the planner runs on a single
/// cooperative thread.
#[async_trait(?Send)]
pub trait CalendarStore {
    /// Everything visible in `year`, including ranges that cross into it.
    async fn fetch_year_snapshot(&self, year: i32) -> Result<YearSnapshot>;

    async fn create_event(&self, draft: &EventDraft) -> Result<Event>;
    async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<Event>;
    async fn delete_event(&self, id: i64) -> Result<()>;

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Activity>;
    async fn update_activity(&self, id: &str, draft: &ActivityDraft) -> Result<Activity>;
    /// Removes the activity and, with it, every placement referencing it.
    async fn delete_activity(&self, id: &str) -> Result<()>;

    async fn create_placed_activity(&self, draft: &PlacementDraft) -> Result<PlacedActivity>;
    async fn update_placed_activity(&self, id: i64, details: &PlacementDetails) -> Result<PlacedActivity>;
    async fn delete_placed_activity(&self, id: i64) -> Result<()>;

    async fn upsert_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Leave>;
    async fn delete_leave(&self, date: NaiveDate) -> Result<()>;

    /// Upserts the given keys and echoes them back.
    async fn update_settings(&self, settings: &Settings) -> Result<Settings>;
}

/// Id for an activity created without one (milliseconds since the epoch).
pub(crate) fn generated_activity_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
