// Property-based tests for span expansion and the by-date index
// Exercises random ranges, including malformed and year-crossing ones

use chrono::{Duration, NaiveDate};
use leave_planner::models::event::Event;
use leave_planner::services::day_index::DayIndex;
use leave_planner::utils::date::{expand_span, format_date, DateRange};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3 * 366).prop_map(|offset| NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Duration::days(offset))
}

fn any_event() -> impl Strategy<Value = Event> {
    (1i64..20, any_date(), proptest::option::of(-5i64..40)).prop_map(|(id, date, span)| Event {
        id,
        date,
        end_date: span.map(|days| date + Duration::days(days)),
        title: format!("event {}", id),
        time: None,
        location: None,
        description: None,
    })
}

proptest! {
    /// Property: a missing, equal or earlier end date occupies exactly the start day
    #[test]
    fn prop_non_increasing_end_is_single_day(start in any_date(), back in 0i64..30, has_end in any::<bool>()) {
        let end = has_end.then(|| start - Duration::days(back));
        prop_assert_eq!(expand_span(start, end), vec![start]);
    }

    /// Property: a forward range is a contiguous ascending run of len = diff + 1
    #[test]
    fn prop_forward_range_is_contiguous(start in any_date(), len in 1i64..400) {
        let end = start + Duration::days(len);
        let days = expand_span(start, Some(end));

        prop_assert_eq!(days.len() as i64, len + 1);
        prop_assert_eq!(days[0], start);
        prop_assert_eq!(*days.last().unwrap(), end);
        for pair in days.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], Duration::days(1));
            prop_assert!(format_date(pair[0]) < format_date(pair[1]));
        }
    }

    /// Property: drag endpoints resolve to the same range in either order
    #[test]
    fn prop_range_order_independent(a in any_date(), b in any_date()) {
        prop_assert_eq!(DateRange::normalized(a, b), DateRange::normalized(b, a));
        prop_assert_eq!(DateRange::normalized(a, b).is_multi_day(), a != b);
    }

    /// Property: rebuilding from the same list yields the same index
    #[test]
    fn prop_rebuild_is_idempotent(events in proptest::collection::vec(any_event(), 0..30)) {
        prop_assert_eq!(DayIndex::build(&events), DayIndex::build(&events));
    }

    /// Property: no bucket lists the same identity twice, even with duplicated input
    #[test]
    fn prop_no_duplicate_identity_per_day(events in proptest::collection::vec(any_event(), 0..30)) {
        let mut doubled = events.clone();
        doubled.extend(events.iter().cloned());
        let index = DayIndex::build(&doubled);

        for (_, entries) in index.iter() {
            let mut ids: Vec<i64> = entries.iter().map(|e| e.record.id).collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
            prop_assert!(total > 0);
        }
    }

    /// Property: each record is listed on exactly the days of its span
    #[test]
    fn prop_record_listed_exactly_on_its_span(event in any_event(), day in any_date()) {
        let index = DayIndex::build(std::slice::from_ref(&event));
        let span = expand_span(event.date, event.end_date);

        prop_assert_eq!(index.contains(day, &event.id), span.contains(&day));
        prop_assert_eq!(index.len(), span.len());
    }
}
