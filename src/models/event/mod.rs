// Event module
// Calendar event model: a titled entry on one day or a contiguous span of days

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::utils::date::{DateRange, Spanned};

/// Calendar event as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Event {
    /// Whether the event covers more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        matches!(self.end_date, Some(end) if end > self.date)
    }

    /// The draft that would recreate this event (used to prefill edit forms).
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            date: Some(self.date),
            end_date: self.end_date,
            title: self.title.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
        }
    }
}

impl Spanned for Event {
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

/// User input for creating or updating an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub title: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl EventDraft {
    /// Create a draft for a single day.
    ///
    /// # Examples
    /// ```
    /// use leave_planner::models::event::EventDraft;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
    /// let draft = EventDraft::new("Dentist", date);
    /// assert!(draft.validate().is_ok());
    /// ```
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Empty form prefilled with a picked range, as opened by a multi-day drag.
    ///
    /// The default time mirrors what the day panel offers for new events.
    pub fn for_range(range: DateRange) -> Self {
        Self {
            date: Some(range.start),
            end_date: range.end_date(),
            time: Some("12:00".to_string()),
            ..Self::default()
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date = Some(range.start);
        self.end_date = range.end_date();
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PlannerError::validation("Event title cannot be empty"));
        }

        if self.date.is_none() {
            return Err(PlannerError::validation("Event date is required"));
        }

        Ok(())
    }

    /// Blank optional fields are sent as absent, like the original forms did.
    pub fn normalized(&self) -> Self {
        Self {
            date: self.date,
            end_date: self.end_date,
            title: self.title.trim().to_string(),
            time: non_blank(&self.time),
            location: non_blank(&self.location),
            description: non_blank(&self.description),
        }
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
