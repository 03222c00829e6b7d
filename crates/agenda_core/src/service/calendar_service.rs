//! Calendar page use-case service.
//!
//! # Responsibility
//! - Hold the displayed month and the event store for one calendar view.
//! - Validate form drafts once before they reach the store.
//! - Re-derive grid, day lists, upcoming list and statistics on demand.
//!
//! # Invariants
//! - Every derivation reads `store.events()` at call time; nothing is cached.
//! - Only create/update/delete mutate the store.

use crate::calendar::grid::{month_grid, GridCell, MonthGrid, YearMonth};
use crate::calendar::index::{day_summary, events_on, DaySummary, EventIndex};
use crate::calendar::upcoming::{upcoming_after, upcoming_with_limit};
use crate::calendar::{overview, CalendarOverview};
use crate::config::CalendarConfig;
use crate::model::event::{Event, EventDraft, EventId, EventValidationError};
use crate::repo::event_repo::EventPersistence;
use crate::store::{EventStore, StoreError};
use chrono::NaiveDate;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for calendar use-cases.
#[derive(Debug)]
pub enum CalendarServiceError {
    /// Draft failed boundary validation; store untouched.
    Validation(EventValidationError),
    Store(StoreError),
}

impl Display for CalendarServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<EventValidationError> for CalendarServiceError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CalendarServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Calendar view controller over an event store.
pub struct CalendarService<P: EventPersistence> {
    store: EventStore<P>,
    month: YearMonth,
    config: CalendarConfig,
}

impl<P: EventPersistence> CalendarService<P> {
    /// Creates a view showing the month that contains `reference`.
    pub fn new(store: EventStore<P>, reference: NaiveDate, config: CalendarConfig) -> Self {
        Self {
            store,
            month: YearMonth::of(reference),
            config,
        }
    }

    pub fn store(&self) -> &EventStore<P> {
        &self.store
    }

    /// Mutable store access, e.g. to register subscribers.
    pub fn store_mut(&mut self) -> &mut EventStore<P> {
        &mut self.store
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn displayed_month(&self) -> YearMonth {
        self.month
    }

    pub fn show_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    /// Moves the view one month back. Stays put at the calendar's lower bound.
    pub fn previous_month(&mut self) -> YearMonth {
        if let Some(month) = self.month.previous() {
            self.month = month;
        }
        self.month
    }

    /// Moves the view one month forward. Stays put at the upper bound.
    pub fn next_month(&mut self) -> YearMonth {
        if let Some(month) = self.month.next() {
            self.month = month;
        }
        self.month
    }

    /// Jumps back to the month containing `today`.
    pub fn go_to_today(&mut self, today: NaiveDate) -> YearMonth {
        self.month = YearMonth::of(today);
        self.month
    }

    pub fn grid(&self) -> MonthGrid {
        month_grid(self.month.first_day())
    }

    /// Grid cells classified against the displayed month and `today`.
    pub fn grid_cells(&self, today: NaiveDate) -> Vec<GridCell> {
        self.grid().cells(today)
    }

    /// Every grid cell paired with its preview, from one index pass.
    pub fn grid_summaries(&self, today: NaiveDate) -> Vec<(GridCell, DaySummary<'_>)> {
        let index = EventIndex::build(self.store.events());
        self.grid_cells(today)
            .into_iter()
            .map(|cell| {
                let summary = index.summary(cell.date, self.config.day_preview_limit);
                (cell, summary)
            })
            .collect()
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        events_on(self.store.events(), date)
    }

    /// Cell preview for `date` bounded by `day_preview_limit`.
    pub fn day_summary(&self, date: NaiveDate) -> DaySummary<'_> {
        day_summary(self.store.events(), date, self.config.day_preview_limit)
    }

    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Event> {
        upcoming_with_limit(self.store.events(), today, self.config.upcoming_limit)
    }

    /// Dashboard "next" list: strictly after today, short bound.
    pub fn dashboard_upcoming(&self, today: NaiveDate) -> Vec<&Event> {
        upcoming_after(
            self.store.events(),
            today,
            self.config.dashboard_upcoming_limit,
        )
    }

    pub fn overview(&self, today: NaiveDate) -> CalendarOverview {
        overview(
            self.store.events(),
            self.month,
            today,
            self.config.upcoming_limit,
        )
    }

    /// Validates `draft` and appends a new event.
    pub fn create_event(&mut self, draft: &EventDraft) -> Result<EventId, CalendarServiceError> {
        let fields = draft.validate().inspect_err(log_rejected)?;
        let event = self.store.create(fields)?;
        Ok(event.id.clone())
    }

    /// Validates `draft` and replaces the fields of `id`.
    ///
    /// Returns `Ok(false)` when `id` is unknown.
    pub fn update_event(
        &mut self,
        id: &EventId,
        draft: &EventDraft,
    ) -> Result<bool, CalendarServiceError> {
        let fields = draft.validate().inspect_err(log_rejected)?;
        Ok(self.store.update(id, fields)?)
    }

    /// Returns `Ok(false)` when `id` is unknown.
    pub fn delete_event(&mut self, id: &EventId) -> Result<bool, CalendarServiceError> {
        Ok(self.store.delete(id)?)
    }
}

fn log_rejected(err: &EventValidationError) {
    debug!("event=draft_rejected module=service status=invalid error={err}");
}
