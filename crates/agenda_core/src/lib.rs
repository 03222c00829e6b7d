//! Core calendar logic for Agenda.
//! This crate is the single source of truth for event invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use calendar::grid::{month_grid, GridCell, MonthGrid, YearMonth, GRID_DAYS};
pub use calendar::index::{
    count_in_month, day_summary, events_in_month, events_on, DaySummary, EventIndex,
};
pub use calendar::upcoming::{
    relative_day, upcoming, upcoming_after, upcoming_with_limit, RelativeDay, UPCOMING_LIMIT,
};
pub use calendar::{overview, CalendarOverview};
pub use config::CalendarConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{
    format_attendees, format_date_key, parse_attendees, parse_date_key, Event, EventCategory,
    EventDraft, EventFields, EventId, EventValidationError,
};
pub use repo::event_repo::{EventPersistence, JsonEventPersistence, NullPersistence};
pub use repo::kv_repo::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use repo::{RepoError, RepoResult};
pub use service::calendar_service::{CalendarService, CalendarServiceError};
pub use store::{EventStore, StoreChange, StoreError, StoreResult, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
