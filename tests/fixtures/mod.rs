// Test fixtures - reusable test data
// Provides consistent dates and records across the integration tests
#![allow(dead_code)]

use chrono::NaiveDate;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Returns Mar 1, 2024
    pub fn mar_1_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// Returns Mar 2, 2024
    pub fn mar_2_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    /// Returns Dec 30, 2024, start of a range crossing into 2025
    pub fn dec_30_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
    }

    /// Returns Jan 2, 2025
    pub fn jan_2_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    pub fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }
}

/// Sample records for testing
pub mod records {
    use leave_planner::models::activity::ActivityDraft;
    use leave_planner::models::event::EventDraft;

    use super::dates;

    pub fn remote_work() -> ActivityDraft {
        ActivityDraft {
            id: Some("remote".to_string()),
            ..ActivityDraft::new("Remote work", "#3b82f6")
        }
    }

    pub fn gym() -> ActivityDraft {
        ActivityDraft {
            id: Some("gym".to_string()),
            sort_order: 2,
            ..ActivityDraft::new("Gym", "#10b981")
        }
    }

    pub fn dentist() -> EventDraft {
        EventDraft::new("Dentist", dates::june(5))
            .time("09:30")
            .location("Rue de la Paix")
    }
}
