//! Date-to-event lookups.
//!
//! # Responsibility
//! - Answer "which events fall on this day / in this month".
//! - Summarize a day for compact grid cells.
//!
//! # Invariants
//! - Results keep store (insertion) order, never time-of-day order.
//! - Lookups borrow the event slice and never mutate it.

use super::grid::YearMonth;
use crate::model::event::Event;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Events dated exactly `date`, in store order.
pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|event| event.date == date).collect()
}

/// Events whose date falls inside `month`, in store order.
pub fn events_in_month(events: &[Event], month: YearMonth) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| month.contains(event.date))
        .collect()
}

/// Number of events inside `month`.
pub fn count_in_month(events: &[Event], month: YearMonth) -> usize {
    events
        .iter()
        .filter(|event| month.contains(event.date))
        .count()
}

/// Compact view of one day: the first few events plus how many were cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary<'a> {
    pub date: NaiveDate,
    pub visible: Vec<&'a Event>,
    /// Events on this day beyond `visible`.
    pub overflow: usize,
}

impl DaySummary<'_> {
    pub fn total(&self) -> usize {
        self.visible.len() + self.overflow
    }
}

/// Summarizes `date` showing at most `preview_limit` events.
pub fn day_summary(events: &[Event], date: NaiveDate, preview_limit: usize) -> DaySummary<'_> {
    let mut visible = events_on(events, date);
    let overflow = visible.len().saturating_sub(preview_limit);
    visible.truncate(preview_limit);
    DaySummary {
        date,
        visible,
        overflow,
    }
}

/// Snapshot index for rendering many days in one pass.
///
/// Built from the store's current slice; rebuild after any mutation.
#[derive(Debug, Clone)]
pub struct EventIndex<'a> {
    events: &'a [Event],
    by_date: BTreeMap<NaiveDate, Vec<usize>>,
}

impl<'a> EventIndex<'a> {
    pub fn build(events: &'a [Event]) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (position, event) in events.iter().enumerate() {
            by_date.entry(event.date).or_default().push(position);
        }
        Self { events, by_date }
    }

    /// Events on `date`, in store order.
    pub fn on(&self, date: NaiveDate) -> Vec<&'a Event> {
        let events = self.events;
        self.by_date
            .get(&date)
            .map(|positions| positions.iter().map(|&i| &events[i]).collect())
            .unwrap_or_default()
    }

    /// Same result as `day_summary` without rescanning the slice.
    pub fn summary(&self, date: NaiveDate, preview_limit: usize) -> DaySummary<'a> {
        let mut visible = self.on(date);
        let overflow = visible.len().saturating_sub(preview_limit);
        visible.truncate(preview_limit);
        DaySummary {
            date,
            visible,
            overflow,
        }
    }

    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.by_date.get(&date).map_or(0, Vec::len)
    }

    /// Distinct dates that carry at least one event, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{day_summary, events_on, EventIndex};
    use crate::model::event::{Event, EventCategory, EventId};
    use chrono::{NaiveDate, NaiveTime};

    fn event(id: &str, date: &str, start: &str) -> Event {
        Event {
            id: EventId::new(id),
            title: format!("event {id}"),
            description: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str("23:00", "%H:%M").unwrap(),
            category: EventCategory::Work,
            location: None,
            attendees: Vec::new(),
        }
    }

    #[test]
    fn lookup_keeps_store_order_not_time_order() {
        let events = vec![
            event("late", "2024-12-22", "18:00"),
            event("other", "2024-12-23", "08:00"),
            event("early", "2024-12-22", "07:00"),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 12, 22).unwrap();
        let ids: Vec<_> = events_on(&events, day)
            .iter()
            .map(|event| event.id.as_str())
            .collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn snapshot_index_agrees_with_linear_lookup() {
        let events = vec![
            event("1", "2024-12-21", "10:00"),
            event("2", "2024-12-22", "10:00"),
            event("3", "2024-12-21", "09:00"),
        ];
        let index = EventIndex::build(&events);
        for day in index.dates().collect::<Vec<_>>() {
            assert_eq!(index.on(day), events_on(&events, day));
        }
        for day in index.dates().collect::<Vec<_>>() {
            assert_eq!(index.summary(day, 1), day_summary(&events, day, 1));
        }
        let empty_day = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert!(index.on(empty_day).is_empty());
        assert_eq!(index.count_on(empty_day), 0);
    }

    #[test]
    fn day_summary_reports_overflow() {
        let events = vec![
            event("1", "2024-12-22", "09:00"),
            event("2", "2024-12-22", "10:00"),
            event("3", "2024-12-22", "11:00"),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 12, 22).unwrap();
        let summary = day_summary(&events, day, 2);
        assert_eq!(summary.visible.len(), 2);
        assert_eq!(summary.overflow, 1);
        assert_eq!(summary.total(), 3);
    }
}
