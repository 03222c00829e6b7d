//! Pure calendar derivations.
//!
//! # Responsibility
//! - Build month grids, index events by date, select upcoming events.
//! - Stay free of storage so every function is a plain slice-in/value-out.
//!
//! # Invariants
//! - Derivations only read the slice they are given.
//! - Callers pass the store's current slice on every render; nothing here
//!   caches across calls except an explicit `EventIndex` snapshot.

pub mod grid;
pub mod index;
pub mod upcoming;

use crate::model::event::Event;
use chrono::NaiveDate;
use grid::YearMonth;

/// Header statistics for the calendar page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarOverview {
    /// Events dated today.
    pub today_count: usize,
    /// Length of the bounded upcoming list.
    pub upcoming_count: usize,
    /// Events inside the displayed month.
    pub month_count: usize,
}

/// Computes header statistics for the displayed month.
pub fn overview(
    events: &[Event],
    reference: YearMonth,
    today: NaiveDate,
    upcoming_limit: usize,
) -> CalendarOverview {
    CalendarOverview {
        today_count: index::events_on(events, today).len(),
        upcoming_count: upcoming::upcoming_with_limit(events, today, upcoming_limit).len(),
        month_count: index::count_in_month(events, reference),
    }
}
