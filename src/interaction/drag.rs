use chrono::NaiveDate;

use super::context::{GesturePhase, InteractionContext, PickTarget, Tool};
use crate::models::leave::LeaveKind;
use crate::utils::date::{normalize_range, DateRange};

/// Result of finalizing a drag on pointer release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The pending date pick resolved to `range`.
    PickedRange { target: PickTarget, range: DateRange },
    /// Stamp the active activity across `range`.
    PlaceActivity { activity_id: String, range: DateRange },
    /// Open the day panel for `range.start` with an event form for `range`.
    OpenEventForm { range: DateRange },
    /// Nothing dispatched; the plain click handler decides.
    FallThrough,
}

/// What a plain day click resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// The click belongs to a gesture that was already handled.
    Suppressed,
    ToggleLeave { date: NaiveDate, kind: LeaveKind },
    ToggleActivity { date: NaiveDate, activity_id: String },
    OpenDayPanel { date: NaiveDate },
}

/// Window-wide pointer-release subscription, held only while a drag is live.
#[derive(Debug, Default)]
pub struct ReleaseListener {
    attached: bool,
}

impl ReleaseListener {
    fn attach(&mut self) {
        if !self.attached {
            log::debug!("Release listener attached");
        }
        self.attached = true;
    }

    fn detach(&mut self) {
        if self.attached {
            log::debug!("Release listener detached");
        }
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Turns pointer sequences over day cells into clicks or range selections.
#[derive(Debug, Default)]
pub struct GestureController {
    context: InteractionContext,
    release: ReleaseListener,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &InteractionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut InteractionContext {
        &mut self.context
    }

    pub fn phase(&self) -> GesturePhase {
        self.context.phase
    }

    pub fn pointer_down(&mut self, date: NaiveDate) {
        self.context.phase = GesturePhase::Dragging {
            start: date,
            hover: date,
        };
        self.release.attach();
        log::debug!("Drag started on {}", date);
    }

    pub fn pointer_enter(&mut self, date: NaiveDate) {
        if let GesturePhase::Dragging { hover, .. } = &mut self.context.phase {
            *hover = date;
        }
    }

    /// Finalize the drag, wherever the pointer was released.
    pub fn pointer_up(&mut self) -> GestureOutcome {
        let (start, hover) = match self.context.phase {
            GesturePhase::Dragging { start, hover } => (start, hover),
            _ => {
                self.release.detach();
                return GestureOutcome::FallThrough;
            }
        };

        self.context.phase = GesturePhase::Resolving;
        self.release.detach();

        let range = normalize_range(start, hover);
        let outcome = self.dispatch(range);
        self.context.phase = GesturePhase::Idle;

        log::debug!("Drag {:?} resolved to {:?}", range, outcome);
        outcome
    }

    fn dispatch(&mut self, range: DateRange) -> GestureOutcome {
        if let Some(target) = self.context.picking.take() {
            self.context.was_dragging = true;
            return GestureOutcome::PickedRange { target, range };
        }

        if !range.is_multi_day() {
            return GestureOutcome::FallThrough;
        }

        match self.context.tool().clone() {
            Tool::Activity(activity_id) => {
                self.context.was_dragging = true;
                GestureOutcome::PlaceActivity { activity_id, range }
            }
            Tool::Free => {
                self.context.was_dragging = true;
                GestureOutcome::OpenEventForm { range }
            }
            Tool::Leave(_) => GestureOutcome::FallThrough,
        }
    }

    /// Plain click on a day; consumes the one-shot drag flag.
    pub fn day_click(&mut self, date: NaiveDate) -> ClickAction {
        if std::mem::take(&mut self.context.was_dragging) || self.context.is_picking() {
            return ClickAction::Suppressed;
        }

        match self.context.tool() {
            Tool::Leave(kind) => ClickAction::ToggleLeave { date, kind: *kind },
            Tool::Activity(activity_id) => ClickAction::ToggleActivity {
                date,
                activity_id: activity_id.clone(),
            },
            Tool::Free => ClickAction::OpenDayPanel { date },
        }
    }

    /// An edit form asks the grid to pick dates for `target`.
    pub fn begin_picking(&mut self, target: PickTarget) {
        self.context.picking = Some(target);
    }

    /// Abort picking and drop any drag in progress without dispatching.
    pub fn cancel_picking(&mut self) {
        self.context.picking = None;
        if matches!(self.context.phase, GesturePhase::Dragging { .. }) {
            self.context.phase = GesturePhase::Idle;
        }
        self.release.detach();
    }

    pub fn is_listening_for_release(&self) -> bool {
        self.release.is_attached()
    }

    /// Range covered by the drag in progress.
    pub fn preview_range(&self) -> Option<DateRange> {
        match self.context.phase {
            GesturePhase::Dragging { start, hover } => Some(normalize_range(start, hover)),
            _ => None,
        }
    }
}
