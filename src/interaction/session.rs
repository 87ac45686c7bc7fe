use std::cell::{Ref, RefCell};

use chrono::NaiveDate;

use super::context::{InteractionContext, PickTarget};
use super::drag::{ClickAction, GestureController, GestureOutcome};
use crate::error::{PlannerError, Result};
use crate::models::activity::{Activity, PlacedActivity};
use crate::models::event::EventDraft;
use crate::models::leave::{Leave, LeaveKind};
use crate::services::coordinator::Coordinator;
use crate::services::store::CalendarStore;
use crate::utils::date::DateRange;

/// What the presentation layer should show after a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    /// Open the day panel, optionally with a prefilled event form.
    OpenDayPanel {
        date: NaiveDate,
        draft: Option<EventDraft>,
    },
    /// Hand the picked range back to the form that asked for it.
    RangePicked { target: PickTarget, range: DateRange },
    ActivityPlaced(PlacedActivity),
    /// `placement` is `None` when the activity was removed from the day.
    ActivityToggled {
        date: NaiveDate,
        activity_id: String,
        placement: Option<PlacedActivity>,
    },
    /// `leave` is `None` when the day was cleared.
    LeaveToggled { date: NaiveDate, leave: Option<Leave> },
}

/// Gesture handling wired to a coordinator.
///
/// Gesture state sits behind a `RefCell` so pointer events can still be
/// handled while a mutation started by an earlier gesture is in flight.
pub struct PlannerSession<S> {
    coordinator: Coordinator<S>,
    gestures: RefCell<GestureController>,
}

impl<S: CalendarStore> PlannerSession<S> {
    pub fn new(coordinator: Coordinator<S>) -> Self {
        Self {
            coordinator,
            gestures: RefCell::new(GestureController::new()),
        }
    }

    pub fn coordinator(&self) -> &Coordinator<S> {
        &self.coordinator
    }

    pub fn context(&self) -> Ref<'_, InteractionContext> {
        Ref::map(self.gestures.borrow(), GestureController::context)
    }

    pub fn pointer_down(&self, date: NaiveDate) {
        self.gestures.borrow_mut().pointer_down(date);
    }

    pub fn pointer_enter(&self, date: NaiveDate) {
        self.gestures.borrow_mut().pointer_enter(date);
    }

    pub fn is_listening_for_release(&self) -> bool {
        self.gestures.borrow().is_listening_for_release()
    }

    pub fn preview_range(&self) -> Option<DateRange> {
        self.gestures.borrow().preview_range()
    }

    pub fn begin_picking(&self, target: PickTarget) {
        self.gestures.borrow_mut().begin_picking(target);
    }

    pub fn cancel_picking(&self) {
        self.gestures.borrow_mut().cancel_picking();
    }

    /// Finalize the drag and perform whatever it resolved to.
    pub async fn pointer_up(&self) -> Result<SessionEffect> {
        let outcome = self.gestures.borrow_mut().pointer_up();

        match outcome {
            GestureOutcome::PickedRange { target, range } => {
                Ok(SessionEffect::RangePicked { target, range })
            }
            GestureOutcome::PlaceActivity { activity_id, range } => {
                let placement = self.coordinator.place_activity(&activity_id, range).await?;
                Ok(SessionEffect::ActivityPlaced(placement))
            }
            GestureOutcome::OpenEventForm { range } => Ok(SessionEffect::OpenDayPanel {
                date: range.start,
                draft: Some(EventDraft::for_range(range)),
            }),
            GestureOutcome::FallThrough => Ok(SessionEffect::None),
        }
    }

    /// Plain day click with the current tool.
    pub async fn day_click(&self, date: NaiveDate) -> Result<SessionEffect> {
        let action = self.gestures.borrow_mut().day_click(date);

        match action {
            ClickAction::Suppressed => Ok(SessionEffect::None),
            ClickAction::ToggleLeave { date, kind } => {
                let leave = self.coordinator.toggle_leave(date, kind).await?;
                Ok(SessionEffect::LeaveToggled { date, leave })
            }
            ClickAction::ToggleActivity { date, activity_id } => {
                let placement = self
                    .coordinator
                    .toggle_activity_on_day(date, &activity_id)
                    .await?;
                Ok(SessionEffect::ActivityToggled {
                    date,
                    activity_id,
                    placement,
                })
            }
            ClickAction::OpenDayPanel { date } => Ok(SessionEffect::OpenDayPanel { date, draft: None }),
        }
    }

    pub fn toggle_leave_mode(&self) -> bool {
        self.gestures.borrow_mut().context_mut().toggle_leave_mode()
    }

    pub fn set_leave_kind(&self, kind: LeaveKind) {
        self.gestures.borrow_mut().context_mut().set_leave_kind(kind);
    }

    /// Select (or deselect) an activity as the stamping tool.
    pub fn select_activity(&self, activity_id: &str) -> Result<bool> {
        let activity = self
            .coordinator
            .state()
            .activity(activity_id)
            .cloned()
            .ok_or_else(|| PlannerError::not_found(format!("Activity {} not found", activity_id)))?;
        Ok(self.gestures.borrow_mut().context_mut().select_activity(&activity))
    }

    /// Hide or show an activity; hiding the active tool also deselects it.
    pub async fn toggle_activity_hidden(&self, activity_id: &str) -> Result<Activity> {
        let updated = self.coordinator.toggle_activity_hidden(activity_id).await?;
        if updated.is_hidden {
            self.gestures
                .borrow_mut()
                .context_mut()
                .release_activity(activity_id);
        }
        Ok(updated)
    }

    /// Delete an activity; if it was the active tool, the tool is cleared.
    pub async fn delete_activity(&self, activity_id: &str) -> Result<()> {
        self.coordinator.delete_activity(activity_id).await?;
        self.gestures
            .borrow_mut()
            .context_mut()
            .release_activity(activity_id);
        Ok(())
    }
}
