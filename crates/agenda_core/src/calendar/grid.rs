//! Month grid construction.
//!
//! # Responsibility
//! - Build the fixed 6x7 day grid for a reference month.
//! - Provide month navigation (`YearMonth::previous` / `next`).
//!
//! # Invariants
//! - A grid always holds consecutive days covering the whole month.
//! - Away from chrono's range limits it holds exactly `GRID_DAYS` days
//!   starting on the Sunday on or before the 1st (`MonthGrid::is_complete`).
//! - Construction is a pure function of the reference date.

use chrono::{Datelike, Days, Months, NaiveDate};
use std::iter;

pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_WEEKS: usize = 6;
pub const GRID_DAYS: usize = DAYS_PER_WEEK * GRID_WEEKS;

/// Calendar month, anchored on its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        // Day 1 always exists; `with_day` only fails for impossible days.
        let first = date.with_day(1).unwrap_or(date);
        Self { first }
    }

    /// Returns `None` for an out-of-range year or a month outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1..=12.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Whether `date` shares this month and year.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Previous month, rolling the year back from January.
    pub fn previous(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Next month, rolling the year forward from December.
    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }
}

/// One rendered grid cell with its classification against the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: NaiveDate,
    /// False for padding days from the adjacent months.
    pub in_month: bool,
    pub is_today: bool,
}

/// Fixed six-week calendar grid for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: YearMonth,
    days: Vec<NaiveDate>,
}

impl MonthGrid {
    pub fn reference_month(&self) -> YearMonth {
        self.month
    }

    /// All grid days in ascending order.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    /// Grid rows, Sunday through Saturday.
    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.days.chunks(DAYS_PER_WEEK)
    }

    /// Whether the grid has the full six Sunday-first weeks.
    ///
    /// Only false for the first and last month chrono can represent.
    pub fn is_complete(&self) -> bool {
        self.days.len() == GRID_DAYS
            && self
                .first_day()
                .is_some_and(|day| day.weekday().num_days_from_sunday() == 0)
    }

    pub fn is_in_month(&self, day: NaiveDate) -> bool {
        self.month.contains(day)
    }

    /// Classifies every day against the reference month and `today`.
    pub fn cells(&self, today: NaiveDate) -> Vec<GridCell> {
        self.days
            .iter()
            .map(|&date| GridCell {
                date,
                in_month: self.is_in_month(date),
                is_today: date == today,
            })
            .collect()
    }
}

/// Builds the grid for the month containing `reference`.
///
/// The grid starts on the Sunday on or before the 1st and spans
/// `GRID_DAYS` consecutive days, so it always covers the whole month.
///
/// # Range limit
/// For the first month chrono can represent the grid starts on the 1st
/// (no earlier Sunday exists); for the last month it ends at
/// `NaiveDate::MAX`. Both still cover the whole month, and
/// `MonthGrid::is_complete` reports `false` for them.
pub fn month_grid(reference: NaiveDate) -> MonthGrid {
    let month = YearMonth::of(reference);
    let first = month.first_day();
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);

    MonthGrid {
        month,
        // `iter_days` never yields `NaiveDate::MAX`; `succ_opt` does.
        days: iter::successors(Some(start), |day| day.succ_opt())
            .take(GRID_DAYS)
            .collect(),
    }
}
