//! By-date projection of range records.
//!
//! The flat record list owned by the coordinator is the only source of truth.
//! A [`DayIndex`] is a cached projection of that list: it is rebuilt from
//! scratch after every mutation and never edited on its own, so the two views
//! cannot drift apart.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::utils::date::{expand, Spanned};

/// Where a day sits inside the span of the record listed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanPosition {
    /// The record occupies this day only.
    Single,
    Start,
    Middle,
    End,
}

impl SpanPosition {
    fn for_day(index: usize, total: usize) -> Self {
        match (index, total) {
            (_, 0 | 1) => SpanPosition::Single,
            (0, _) => SpanPosition::Start,
            (i, n) if i + 1 == n => SpanPosition::End,
            _ => SpanPosition::Middle,
        }
    }
}

/// A record as listed under one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry<T> {
    pub record: T,
    pub span: SpanPosition,
}

/// Mapping from calendar day to the records visible that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayIndex<T> {
    days: BTreeMap<NaiveDate, Vec<DayEntry<T>>>,
}

impl<T> Default for DayIndex<T> {
    fn default() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }
}

impl<T: Spanned + Clone> DayIndex<T> {
    /// Build the index from a flat record list.
    ///
    /// Within a bucket, records keep their flat-list order. A record whose
    /// identity is already present in a bucket is not inserted again.
    pub fn build(records: &[T]) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<DayEntry<T>>> = BTreeMap::new();

        for record in records {
            let span = expand(record);
            let total = span.len();
            let key = record.key();

            for (position, day) in span.into_iter().enumerate() {
                let bucket = days.entry(day).or_default();
                if bucket.iter().any(|entry| entry.record.key() == key) {
                    continue;
                }
                bucket.push(DayEntry {
                    record: record.clone(),
                    span: SpanPosition::for_day(position, total),
                });
            }
        }

        log::debug!(
            "Rebuilt day index: {} records over {} days",
            records.len(),
            days.len()
        );

        Self { days }
    }

    /// Entries listed on `date` (empty when nothing occupies that day).
    pub fn entries_on(&self, date: NaiveDate) -> &[DayEntry<T>] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records listed on `date`.
    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &T> {
        self.entries_on(date).iter().map(|entry| &entry.record)
    }

    pub fn contains(&self, date: NaiveDate, key: &T::Key) -> bool {
        self.entries_on(date)
            .iter()
            .any(|entry| entry.record.key() == *key)
    }

    /// Days that have at least one record, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[DayEntry<T>])> {
        self.days.iter().map(|(day, entries)| (*day, entries.as_slice()))
    }

    /// Number of non-empty days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
