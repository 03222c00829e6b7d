//! Bounded lookahead over the event collection.
//!
//! # Invariants
//! - Inclusion compares calendar dates only; time of day is ignored.
//! - Output is sorted ascending by date with a stable sort, so events on
//!   the same date keep store order.
//! - Output length never exceeds the requested limit.

use crate::model::event::Event;
use chrono::NaiveDate;

/// Default bound for the upcoming list.
pub const UPCOMING_LIMIT: usize = 5;

/// Up to `UPCOMING_LIMIT` events dated today or later.
pub fn upcoming(events: &[Event], today: NaiveDate) -> Vec<&Event> {
    upcoming_with_limit(events, today, UPCOMING_LIMIT)
}

/// Up to `limit` events dated on or after `today`.
pub fn upcoming_with_limit(events: &[Event], today: NaiveDate, limit: usize) -> Vec<&Event> {
    select(events, limit, |date| date >= today)
}

/// Up to `limit` events dated strictly after `today`.
///
/// Used by the dashboard preview, which lists today's events separately.
pub fn upcoming_after(events: &[Event], today: NaiveDate, limit: usize) -> Vec<&Event> {
    select(events, limit, |date| date > today)
}

fn select(events: &[Event], limit: usize, keep: impl Fn(NaiveDate) -> bool) -> Vec<&Event> {
    let mut selected: Vec<&Event> = events.iter().filter(|event| keep(event.date)).collect();
    selected.sort_by_key(|event| event.date);
    selected.truncate(limit);
    selected
}

/// Coarse distance of a date from today, for list captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    Past,
    Today,
    Tomorrow,
    Later,
}

impl RelativeDay {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Later => "later",
        }
    }
}

pub fn relative_day(date: NaiveDate, today: NaiveDate) -> RelativeDay {
    if date < today {
        RelativeDay::Past
    } else if date == today {
        RelativeDay::Today
    } else if today.succ_opt() == Some(date) {
        RelativeDay::Tomorrow
    } else {
        RelativeDay::Later
    }
}
