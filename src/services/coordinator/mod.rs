//! Application state coordinator.
//! Owns the flat record lists for the displayed year, runs every mutation
//! through the store first, and re-derives the by-date indexes afterwards.
//! Operations are split across focused submodules by entity.

use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{PlannerError, Result};
use crate::models::activity::{Activity, PlacedActivity};
use crate::models::event::Event;
use crate::models::leave::LeaveKind;
use crate::models::settings::Settings;
use crate::models::snapshot::YearSnapshot;
use crate::services::day_index::{DayIndex, SpanPosition};
use crate::services::store::CalendarStore;
use crate::utils::date::format_date;

mod activities;
mod events;
mod leaves;
mod placements;

/// Everything known about the displayed year.
#[derive(Debug, Clone, Default)]
pub struct CalendarState {
    pub year: i32,
    pub events: Vec<Event>,
    pub activities: Vec<Activity>,
    pub placed_activities: Vec<PlacedActivity>,
    pub leaves: BTreeMap<NaiveDate, LeaveKind>,
    pub settings: Settings,
    pub event_index: DayIndex<Event>,
    pub placement_index: DayIndex<PlacedActivity>,
}

impl CalendarState {
    fn from_snapshot(year: i32, snapshot: YearSnapshot) -> Self {
        let mut state = Self {
            year,
            events: snapshot.events,
            activities: snapshot.activities,
            placed_activities: snapshot.placed_activities,
            leaves: snapshot.leaves.into_iter().map(|l| (l.date, l.kind)).collect(),
            settings: snapshot.settings,
            ..Self::default()
        };
        state.rebuild();
        state
    }

    /// Re-derive both indexes from the flat lists.
    fn rebuild(&mut self) {
        self.event_index = DayIndex::build(&self.events);
        self.placement_index = DayIndex::build(&self.placed_activities);
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn leave_on(&self, date: NaiveDate) -> Option<LeaveKind> {
        self.leaves.get(&date).copied()
    }

    /// Placement of `activity_id` listed on `date`, if any.
    pub fn placement_on(&self, date: NaiveDate, activity_id: &str) -> Option<&PlacedActivity> {
        self.placement_index
            .records_on(date)
            .find(|p| p.activity_id == activity_id)
    }
}

/// A placement joined with its activity definition, as shown on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedActivityView {
    pub placement: PlacedActivity,
    pub activity: Activity,
    pub span: SpanPosition,
}

/// What the day detail panel shows for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub activities: Vec<PlacedActivityView>,
    pub leave: Option<LeaveKind>,
}

/// Single source of truth for one open planner session.
///
/// Mutations take `&self` and never hold a borrow of the state across an
/// await point, so overlapping calls interleave on one thread. Whichever
/// call resolves last is the one whose splice remains visible.
pub struct Coordinator<S> {
    store: S,
    state: RefCell<CalendarState>,
    requested_year: Cell<i32>,
    system_activity_checked: Cell<bool>,
    system_activity_pending: Cell<bool>,
    /// Created by this session; patched into snapshots fetched before the create landed.
    created_system_activity: RefCell<Option<Activity>>,
}

impl<S: CalendarStore> Coordinator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RefCell::new(CalendarState::default()),
            requested_year: Cell::new(Local::now().year()),
            system_activity_checked: Cell::new(false),
            system_activity_pending: Cell::new(false),
            created_system_activity: RefCell::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current state. Do not hold the guard across a mutation.
    pub fn state(&self) -> Ref<'_, CalendarState> {
        self.state.borrow()
    }

    /// Year most recently asked for; equals `state().year` once loaded.
    pub fn requested_year(&self) -> i32 {
        self.requested_year.get()
    }

    /// Discard everything and load `year` from the store.
    ///
    /// Returns `false` when another year was requested while this one was
    /// in flight; the late snapshot is dropped.
    pub async fn load_year(&self, year: i32) -> Result<bool> {
        self.requested_year.set(year);
        log::info!("Loading year {}", year);

        let mut snapshot = self.store.fetch_year_snapshot(year).await?;
        if self.requested_year.get() != year {
            log::warn!("Discarding stale snapshot for {}", year);
            return Ok(false);
        }

        let created_earlier = self.created_system_activity.borrow().clone();
        if snapshot.activities.iter().any(Activity::is_system) {
            self.system_activity_checked.set(true);
        } else if let Some(created) = created_earlier {
            snapshot.activities.push(created);
        } else if !self.system_activity_checked.get() && !self.system_activity_pending.get() {
            let created = self.create_system_activity().await?;
            snapshot.activities.push(created);
            if self.requested_year.get() != year {
                log::warn!("Discarding stale snapshot for {}", year);
                return Ok(false);
            }
        }

        let state = CalendarState::from_snapshot(year, snapshot);
        log::info!(
            "Loaded {}: {} events, {} placements, {} leaves",
            year,
            state.events.len(),
            state.placed_activities.len(),
            state.leaves.len()
        );
        *self.state.borrow_mut() = state;
        Ok(true)
    }

    /// Create the reserved activity. The flag is only set once the store
    /// confirms, so a failed create is retried by the next load.
    async fn create_system_activity(&self) -> Result<Activity> {
        self.system_activity_pending.set(true);
        let result = self
            .store
            .create_activity(&Activity::system_holidays().to_draft())
            .await;
        self.system_activity_pending.set(false);
        let created = result?;

        log::info!("Created system activity {}", created.id);
        self.system_activity_checked.set(true);
        *self.created_system_activity.borrow_mut() = Some(created.clone());
        // A newer load may have committed while the create was in flight.
        self.commit(|state| {
            if state.activity(&created.id).is_none() {
                state.activities.push(created.clone());
            }
        });
        Ok(created)
    }

    pub async fn next_year(&self) -> Result<bool> {
        self.load_year(self.requested_year.get() + 1).await
    }

    pub async fn previous_year(&self) -> Result<bool> {
        self.load_year(self.requested_year.get() - 1).await
    }

    /// Leave days used in the displayed year (full = 1, half day = 0.5).
    pub fn leave_count(&self) -> f64 {
        let state = self.state.borrow();
        let prefix = format!("{:04}-", state.year);
        state
            .leaves
            .iter()
            .filter(|(date, _)| format_date(**date).starts_with(&prefix))
            .map(|(_, kind)| kind.weight())
            .sum()
    }

    /// Remaining quota for the displayed year.
    pub fn leave_balance(&self) -> f64 {
        let total = self.state.borrow().settings.total_leaves();
        f64::from(total) - self.leave_count()
    }

    pub fn day_summary(&self, date: NaiveDate) -> DaySummary {
        let state = self.state.borrow();
        let activities = state
            .placement_index
            .entries_on(date)
            .iter()
            .filter_map(|entry| {
                let activity = state.activity(&entry.record.activity_id)?;
                (!activity.is_hidden).then(|| PlacedActivityView {
                    placement: entry.record.clone(),
                    activity: activity.clone(),
                    span: entry.span,
                })
            })
            .collect();

        DaySummary {
            date,
            events: state.event_index.records_on(date).cloned().collect(),
            activities,
            leave: state.leave_on(date),
        }
    }

    /// Apply a confirmed change to the flat lists, then rebuild the indexes.
    fn commit(&self, change: impl FnOnce(&mut CalendarState)) {
        let mut state = self.state.borrow_mut();
        change(&mut state);
        state.rebuild();
    }

    /// Keep the remembered system activity in line with a confirmed change.
    fn track_system_activity(&self, id: &str, updated: Option<&Activity>) {
        let mut created = self.created_system_activity.borrow_mut();
        if created.as_ref().map_or(false, |a| a.id == id) {
            *created = updated.cloned();
        }
    }

    fn require_activity(&self, id: &str) -> Result<Activity> {
        self.state
            .borrow()
            .activity(id)
            .cloned()
            .ok_or_else(|| PlannerError::not_found(format!("Activity {} not found", id)))
    }
}

/// Replace the record with the same identity, or append it.
fn upsert_by_identity<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T) -> bool) {
    match records.iter_mut().find(|r| same(r)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
