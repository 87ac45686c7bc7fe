use chrono::NaiveDate;

use crate::models::activity::Activity;
use crate::models::leave::LeaveKind;

/// What a plain day click (or a multi-day drag) does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tool {
    /// Clicks open the day panel, drags open the event form.
    #[default]
    Free,
    /// Leave-marking mode with the selected portion of the day.
    Leave(LeaveKind),
    /// Activity-stamping mode with the active activity id.
    Activity(String),
}

/// Record an edit form is picking dates for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    NewEvent,
    Event(i64),
    Placement(i64),
}

/// Drag progress over the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging {
        start: NaiveDate,
        hover: NaiveDate,
    },
    /// Transient while a finished drag is dispatched.
    Resolving,
}

/// Shared interaction state read by every gesture handler.
#[derive(Debug, Clone, Default)]
pub struct InteractionContext {
    tool: Tool,
    leave_kind: Option<LeaveKind>,
    pub(super) picking: Option<PickTarget>,
    pub(super) was_dragging: bool,
    pub(super) phase: GesturePhase,
}

impl InteractionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn picking(&self) -> Option<&PickTarget> {
        self.picking.as_ref()
    }

    pub fn is_picking(&self) -> bool {
        self.picking.is_some()
    }

    pub fn in_leave_mode(&self) -> bool {
        matches!(self.tool, Tool::Leave(_))
    }

    pub fn active_activity(&self) -> Option<&str> {
        match &self.tool {
            Tool::Activity(id) => Some(id),
            _ => None,
        }
    }

    /// Portion of the day leave mode marks; full day until changed.
    pub fn leave_kind(&self) -> LeaveKind {
        self.leave_kind.unwrap_or(LeaveKind::Full)
    }

    /// Turn leave mode on or off. Either way the active activity is dropped.
    pub fn toggle_leave_mode(&mut self) -> bool {
        self.tool = if self.in_leave_mode() {
            Tool::Free
        } else {
            Tool::Leave(self.leave_kind())
        };
        log::debug!("Tool is now {:?}", self.tool);
        self.in_leave_mode()
    }

    /// Choose the portion of the day leave mode marks.
    pub fn set_leave_kind(&mut self, kind: LeaveKind) {
        self.leave_kind = Some(kind);
        if self.in_leave_mode() {
            self.tool = Tool::Leave(kind);
        }
    }

    /// Select `activity` as the stamping tool, or deselect it if already active.
    ///
    /// Returns `false` when selection is not allowed: in leave mode, or
    /// for a hidden activity.
    pub fn select_activity(&mut self, activity: &Activity) -> bool {
        if self.in_leave_mode() || activity.is_hidden {
            return false;
        }

        self.tool = if self.active_activity() == Some(activity.id.as_str()) {
            Tool::Free
        } else {
            Tool::Activity(activity.id.clone())
        };
        log::debug!("Tool is now {:?}", self.tool);
        true
    }

    /// Drop the activity tool if it refers to `activity_id`.
    pub fn release_activity(&mut self, activity_id: &str) {
        if self.active_activity() == Some(activity_id) {
            self.tool = Tool::Free;
        }
    }
}
