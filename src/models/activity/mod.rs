// Activity module
// Reusable activity tags and their placements on calendar days

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::event::non_blank;
use crate::utils::date::{DateRange, Spanned};

/// Identity of the reserved holiday-overlay activity.
pub const SYSTEM_HOLIDAY_ACTIVITY_ID: &str = "system-vacances-zone-a";
pub const SYSTEM_HOLIDAY_ACTIVITY_NAME: &str = "Vacances Zone A";
pub const SYSTEM_HOLIDAY_ACTIVITY_COLOR: &str = "#ec4899";

/// A reusable, named, colored tag that can be stamped onto days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub sort_order: i64,
}

impl Activity {
    /// The holiday overlay activity every session expects to exist.
    pub fn system_holidays() -> Self {
        Self {
            id: SYSTEM_HOLIDAY_ACTIVITY_ID.to_string(),
            name: SYSTEM_HOLIDAY_ACTIVITY_NAME.to_string(),
            color: SYSTEM_HOLIDAY_ACTIVITY_COLOR.to_string(),
            is_hidden: false,
            sort_order: 0,
        }
    }

    pub fn is_system(&self) -> bool {
        self.id == SYSTEM_HOLIDAY_ACTIVITY_ID
    }

    pub fn to_draft(&self) -> ActivityDraft {
        ActivityDraft {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            color: self.color.clone(),
            is_hidden: self.is_hidden,
            sort_order: self.sort_order,
        }
    }
}

/// User input for creating or updating an activity definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    /// Explicit id; the store generates one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub color: String,
    pub is_hidden: bool,
    pub sort_order: i64,
}

impl ActivityDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::validation("Activity name is required"));
        }

        let color = self.color.trim();
        if color.is_empty() {
            return Err(PlannerError::validation("Activity color is required"));
        }
        if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
            return Err(PlannerError::validation(
                "Color must be in hex format (#RRGGBB or #RGB)",
            ));
        }

        Ok(())
    }

    /// Materialize the draft under a concrete id.
    pub fn into_activity(self, id: String) -> Activity {
        Activity {
            id,
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
            is_hidden: self.is_hidden,
            sort_order: self.sort_order,
        }
    }
}

/// One instance of an [`Activity`] stamped on a day or a range of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedActivity {
    /// Row id of the placement itself.
    pub id: i64,
    pub activity_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PlacedActivity {
    pub fn range(&self) -> DateRange {
        DateRange::normalized(self.date, self.end_date.unwrap_or(self.date).max(self.date))
    }

    pub fn details(&self) -> PlacementDetails {
        PlacementDetails {
            start_date: None,
            end_date: self.end_date,
            title: self.title.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
        }
    }

    pub fn has_details(&self) -> bool {
        self.title.is_some() || self.time.is_some() || self.location.is_some() || self.description.is_some()
    }
}

impl Spanned for PlacedActivity {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    fn start(&self) -> NaiveDate {
        self.date
    }

    fn end(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// Request to stamp an activity on a day or range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDraft {
    pub activity_id: String,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl PlacementDraft {
    pub fn new(activity_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            activity_id: activity_id.into(),
            date: range.start,
            end_date: range.end_date(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.activity_id.trim().is_empty() {
            return Err(PlannerError::validation("activityId is required"));
        }
        Ok(())
    }
}

/// Editable details of a placement.
///
/// `start_date` moves the placement; `None` keeps the current start.
/// `end_date` is always written, so `None` collapses a range to one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDetails {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub title: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl PlacementDetails {
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.start_date = Some(range.start);
        self.end_date = range.end_date();
        self
    }

    pub fn normalized(&self) -> Self {
        Self {
            start_date: self.start_date,
            end_date: self.end_date,
            title: non_blank(&self.title),
            time: non_blank(&self.time),
            location: non_blank(&self.location),
            description: non_blank(&self.description),
        }
    }

    /// Apply these details to an existing placement, the way the store does.
    pub fn apply_to(&self, placement: &PlacedActivity) -> PlacedActivity {
        let details = self.normalized();
        PlacedActivity {
            id: placement.id,
            activity_id: placement.activity_id.clone(),
            date: details.start_date.unwrap_or(placement.date),
            end_date: details.end_date,
            title: details.title,
            time: details.time,
            location: details.location,
            description: details.description,
        }
    }
}
