// Date utility functions
// Calendar-day parsing, formatting and span expansion

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Wire format for every calendar date (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A record that occupies one calendar day or a contiguous run of days.
///
/// Events and placed activities both implement this so the expander and
/// the by-date index can treat them uniformly.
pub trait Spanned {
    /// Identity used for de-duplication inside a day bucket.
    type Key: PartialEq + Clone + std::fmt::Debug;

    fn key(&self) -> Self::Key;
    fn start(&self) -> NaiveDate;
    fn end(&self) -> Option<NaiveDate>;
}

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| PlannerError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

/// Format a date as zero-padded `YYYY-MM-DD`.
///
/// Built from the year/month/day components, so no timezone ever shifts it.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Every calendar day from `start` to `end` inclusive, ascending.
///
/// A missing `end`, or one that is not strictly after `start`, yields `[start]`.
pub fn expand_span(start: NaiveDate, end: Option<NaiveDate>) -> Vec<NaiveDate> {
    match end {
        Some(end) if end > start => start.iter_days().take_while(|day| *day <= end).collect(),
        Some(end) if end < start => {
            // Tolerated rather than rejected; flagged for stricter validation.
            log::warn!(
                "Malformed range {} .. {} treated as single day",
                format_date(start),
                format_date(end)
            );
            vec![start]
        }
        _ => vec![start],
    }
}

/// Expand a span record into the days it occupies.
pub fn expand<T: Spanned + ?Sized>(record: &T) -> Vec<NaiveDate> {
    expand_span(record.start(), record.end())
}

/// String-in, string-out form of [`expand_span`].
pub fn expand_strings(date: &str, end_date: Option<&str>) -> Result<Vec<String>> {
    let start = parse_date(date)?;
    let end = end_date.map(parse_date).transpose()?;
    Ok(expand_span(start, end).into_iter().map(format_date).collect())
}

/// Closed range of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two endpoints in either order.
    pub fn normalized(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn is_multi_day(&self) -> bool {
        self.start != self.end
    }

    /// The `endDate` to store for this range: `None` for a single day.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.is_multi_day().then_some(self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        expand_span(self.start, self.end_date())
    }
}

/// Free-function form of [`DateRange::normalized`].
pub fn normalize_range(a: NaiveDate, b: NaiveDate) -> DateRange {
    DateRange::normalized(a, b)
}

/// First and last day of a calendar year.
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

pub fn date_in_year(date: NaiveDate, year: i32) -> bool {
    date.year() == year
}

/// Whether a range record touches the given year at all.
pub fn overlaps_year(start: NaiveDate, end: Option<NaiveDate>, year: i32) -> bool {
    let last = end.filter(|end| *end > start).unwrap_or(start);
    start.year() <= year && last.year() >= year
}
