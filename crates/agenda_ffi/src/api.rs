//! FFI use-case API for the Flutter calendar page.
//!
//! # Responsibility
//! - Expose grid, day lookup, upcoming list and event CRUD to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.
//! - Store access is serialized; each call sees the latest persisted state.

use agenda_core::db::open_db;
use agenda_core::{
    core_version as core_version_inner, format_date_key, init_logging as init_logging_inner,
    parse_date_key, ping as ping_inner, relative_day, CalendarConfig, CalendarService, Event, EventDraft,
    EventId, EventStore, JsonEventPersistence, SqliteKeyValueStore, YearMonth,
};
use chrono::{Datelike, Local, NaiveDate};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const DB_FILE_NAME: &str = "agenda.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

type SqliteCalendar<'conn> = CalendarService<JsonEventPersistence<SqliteKeyValueStore<'conn>>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by every calendar call.
///
/// Must run before the first calendar call; later calls keep the first
/// path and report it in the error string. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!("db path already set to `{}`", active.display())
    }
}

/// One grid cell for the month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayView {
    pub date: String,
    pub day_of_month: u32,
    pub in_month: bool,
    pub is_today: bool,
    /// Titles of the first events of the day.
    pub preview_titles: Vec<String>,
    /// Events hidden behind the "+N more" marker.
    pub overflow: u32,
}

/// Month view envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthResponse {
    pub ok: bool,
    pub year: i32,
    pub month: u32,
    /// 42 cells, Sunday-first, row-major.
    pub days: Vec<CalendarDayView>,
    pub message: String,
}

/// Event as shown in lists and the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub category_label: String,
    pub location: String,
    pub attendees: Vec<String>,
    /// `past`, `today`, `tomorrow` or `later` against the caller's today.
    pub relative_day: String,
}

/// Event list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventsResponse {
    pub ok: bool,
    pub items: Vec<CalendarEventView>,
    pub message: String,
}

/// Header statistics envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarOverviewResponse {
    pub ok: bool,
    pub today_count: u32,
    pub upcoming_count: u32,
    pub month_count: u32,
    pub message: String,
}

/// Raw form fields from the event dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEventInput {
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub location: String,
    /// Comma-separated names.
    pub attendees: String,
}

/// Mutation result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarActionResponse {
    pub ok: bool,
    pub event_id: Option<String>,
    pub message: String,
}

impl CalendarActionResponse {
    fn success(message: impl Into<String>, event_id: String) -> Self {
        Self {
            ok: true,
            event_id: Some(event_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            event_id: None,
            message: message.into(),
        }
    }
}

/// Builds the 42-day grid for `year`/`month`.
///
/// `today` is `YYYY-MM-DD`; `None` uses the host's local date.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month_grid(year: i32, month: u32, today: Option<String>) -> CalendarMonthResponse {
    let failure = |message: String| CalendarMonthResponse {
        ok: false,
        year,
        month,
        days: Vec::new(),
        message,
    };

    let Some(reference) = YearMonth::new(year, month) else {
        return failure(format!("invalid month {year}-{month}"));
    };
    let today = match resolve_today(today) {
        Ok(today) => today,
        Err(message) => return failure(message),
    };

    let result = with_calendar(reference.first_day(), |service| {
        let days: Vec<CalendarDayView> = service
            .grid_summaries(today)
            .into_iter()
            .map(|(cell, summary)| CalendarDayView {
                date: format_date_key(cell.date),
                day_of_month: cell.date.day(),
                in_month: cell.in_month,
                is_today: cell.is_today,
                preview_titles: summary
                    .visible
                    .iter()
                    .map(|event| event.title.clone())
                    .collect(),
                overflow: to_u32(summary.overflow),
            })
            .collect();
        Ok(days)
    });

    match result {
        Ok(days) => CalendarMonthResponse {
            ok: true,
            year,
            month,
            days,
            message: String::new(),
        },
        Err(message) => failure(format!("calendar_month_grid failed: {message}")),
    }
}

/// Lists events on `date` in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_events_on(date: String) -> CalendarEventsResponse {
    let Some(date) = parse_date_key(&date) else {
        return events_failure(format!("invalid date `{date}`; expected YYYY-MM-DD"));
    };
    let result = with_calendar(date, |service| {
        let today = Local::now().date_naive();
        Ok(service
            .events_on(date)
            .into_iter()
            .map(|event| to_event_view(event, today))
            .collect())
    });
    events_response("calendar_events_on", result)
}

/// Lists the next events from `today` on (bounded to five).
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_upcoming(today: Option<String>) -> CalendarEventsResponse {
    let today = match resolve_today(today) {
        Ok(today) => today,
        Err(message) => return events_failure(message),
    };
    let result = with_calendar(today, |service| {
        Ok(service
            .upcoming(today)
            .into_iter()
            .map(|event| to_event_view(event, today))
            .collect())
    });
    events_response("calendar_upcoming", result)
}

/// Header statistics for `year`/`month`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_overview(year: i32, month: u32, today: Option<String>) -> CalendarOverviewResponse {
    let failure = |message: String| CalendarOverviewResponse {
        ok: false,
        today_count: 0,
        upcoming_count: 0,
        month_count: 0,
        message,
    };

    let Some(reference) = YearMonth::new(year, month) else {
        return failure(format!("invalid month {year}-{month}"));
    };
    let today = match resolve_today(today) {
        Ok(today) => today,
        Err(message) => return failure(message),
    };

    match with_calendar(reference.first_day(), |service| Ok(service.overview(today))) {
        Ok(overview) => CalendarOverviewResponse {
            ok: true,
            today_count: to_u32(overview.today_count),
            upcoming_count: to_u32(overview.upcoming_count),
            month_count: to_u32(overview.month_count),
            message: String::new(),
        },
        Err(message) => failure(format!("calendar_overview failed: {message}")),
    }
}

/// Creates an event from dialog input.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_create_event(input: CalendarEventInput) -> CalendarActionResponse {
    let draft = to_draft(input);
    match with_calendar_today(|service| {
        service
            .create_event(&draft)
            .map_err(|err| err.to_string())
    }) {
        Ok(id) => CalendarActionResponse::success("Event created.", id.to_string()),
        Err(err) => {
            CalendarActionResponse::failure(format!("calendar_create_event failed: {err}"))
        }
    }
}

/// Replaces the fields of event `id`. Unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_update_event(id: String, input: CalendarEventInput) -> CalendarActionResponse {
    let draft = to_draft(input);
    let event_id = EventId::new(id.trim());
    match with_calendar_today(|service| {
        service
            .update_event(&event_id, &draft)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => CalendarActionResponse::success("Event updated.", event_id.to_string()),
        Ok(false) => CalendarActionResponse::success("Nothing to update.", event_id.to_string()),
        Err(err) => {
            CalendarActionResponse::failure(format!("calendar_update_event failed: {err}"))
        }
    }
}

/// Deletes event `id`. Unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_delete_event(id: String) -> CalendarActionResponse {
    let event_id = EventId::new(id.trim());
    match with_calendar_today(|service| {
        service
            .delete_event(&event_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => CalendarActionResponse::success("Event deleted.", event_id.to_string()),
        Ok(false) => CalendarActionResponse::success("Nothing to delete.", event_id.to_string()),
        Err(err) => {
            CalendarActionResponse::failure(format!("calendar_delete_event failed: {err}"))
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("AGENDA_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn resolve_today(today: Option<String>) -> Result<NaiveDate, String> {
    match today.as_deref().map(str::trim) {
        None | Some("") => Ok(Local::now().date_naive()),
        Some(text) => {
            parse_date_key(text).ok_or_else(|| format!("invalid today `{text}`; expected YYYY-MM-DD"))
        }
    }
}

fn with_calendar_today<T>(
    f: impl FnOnce(&mut SqliteCalendar<'_>) -> Result<T, String>,
) -> Result<T, String> {
    with_calendar(Local::now().date_naive(), f)
}

fn with_calendar<T>(
    reference: NaiveDate,
    f: impl FnOnce(&mut SqliteCalendar<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(|poisoned| {
        warn!("event=store_lock module=ffi status=recovered");
        poisoned.into_inner()
    });

    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("calendar DB open failed: {err}"))?;
    let kv = SqliteKeyValueStore::try_new(&conn)
        .map_err(|err| format!("calendar storage init failed: {err}"))?;
    let config = CalendarConfig::default();
    let persistence = JsonEventPersistence::with_key(kv, config.storage_key.clone());
    let store = EventStore::load(persistence).map_err(|err| err.to_string())?;
    let mut service = CalendarService::new(store, reference, config);
    f(&mut service)
}

fn to_draft(input: CalendarEventInput) -> EventDraft {
    EventDraft {
        title: input.title,
        description: input.description,
        date: input.date,
        start_time: input.start_time,
        end_time: input.end_time,
        category: input.category,
        location: input.location,
        attendees: input.attendees,
    }
}

fn to_event_view(event: &Event, today: NaiveDate) -> CalendarEventView {
    let draft = EventDraft::from_event(event);
    CalendarEventView {
        id: event.id.to_string(),
        title: draft.title,
        description: draft.description,
        date: draft.date,
        start_time: draft.start_time,
        end_time: draft.end_time,
        category: draft.category,
        category_label: event.category.label().to_string(),
        location: draft.location,
        attendees: event.attendees.clone(),
        relative_day: relative_day(event.date, today).as_str().to_string(),
    }
}

fn events_response(
    operation: &str,
    result: Result<Vec<CalendarEventView>, String>,
) -> CalendarEventsResponse {
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No events.".to_string()
            } else {
                format!("Found {} event(s).", items.len())
            };
            CalendarEventsResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => events_failure(format!("{operation} failed: {err}")),
    }
}

fn events_failure(message: String) -> CalendarEventsResponse {
    CalendarEventsResponse {
        ok: false,
        items: Vec::new(),
        message,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_create_event, calendar_delete_event, calendar_events_on, calendar_month_grid,
        calendar_overview, calendar_update_event, calendar_upcoming, configure_db_path,
        core_version, init_logging, ping, CalendarEventInput,
    };
    use std::sync::Once;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB: Once = Once::new();

    fn use_test_db() {
        TEST_DB.call_once(|| {
            let path = std::env::temp_dir().join(format!(
                "agenda-ffi-test-{}-{}.sqlite3",
                std::process::id(),
                unique_nanos()
            ));
            let error = configure_db_path(path.to_string_lossy().into_owned());
            assert!(error.is_empty(), "{error}");
        });
    }

    fn input(title: &str, date: &str) -> CalendarEventInput {
        CalendarEventInput {
            title: title.to_string(),
            date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            category: "meeting".to_string(),
            attendees: "João, Maria ,  , Pedro".to_string(),
            ..CalendarEventInput::default()
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/agenda-logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn configure_db_path_rejects_blank_input() {
        assert!(!configure_db_path("   ".to_string()).is_empty());
    }

    #[test]
    fn month_grid_has_42_days_and_rejects_bad_month() {
        use_test_db();
        let response = calendar_month_grid(2025, 9, Some("2025-09-10".to_string()));
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.days.len(), 42);
        assert_eq!(response.days[0].date, "2025-08-31");
        assert!(!response.days[0].in_month);
        assert_eq!(response.days.iter().filter(|day| day.is_today).count(), 1);

        let invalid = calendar_month_grid(2025, 13, None);
        assert!(!invalid.ok);
    }

    #[test]
    fn create_update_delete_roundtrip() {
        use_test_db();
        let date = "3011-04-05";
        let created = calendar_create_event(input("planning", date));
        assert!(created.ok, "{}", created.message);
        let id = created.event_id.expect("create should return event_id");

        let listed = calendar_events_on(date.to_string());
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("created event should be listed");
        assert_eq!(item.attendees, vec!["João", "Maria", "Pedro"]);
        assert_eq!(item.category_label, "Meeting");

        let updated = calendar_update_event(id.clone(), input("renamed", date));
        assert!(updated.ok, "{}", updated.message);
        let listed = calendar_events_on(date.to_string());
        assert!(listed
            .items
            .iter()
            .any(|item| item.id == id && item.title == "renamed"));

        let deleted = calendar_delete_event(id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let listed = calendar_events_on(date.to_string());
        assert!(listed.items.iter().all(|item| item.id != id));

        let again = calendar_delete_event(id);
        assert!(again.ok);
        assert_eq!(again.message, "Nothing to delete.");
    }

    #[test]
    fn create_rejects_missing_title() {
        use_test_db();
        let response = calendar_create_event(input("  ", "2025-01-01"));
        assert!(!response.ok);
        assert!(response.message.contains("title"));
    }

    #[test]
    fn upcoming_is_bounded_and_sorted() {
        use_test_db();
        for offset in 0..7 {
            let created =
                calendar_create_event(input("upcoming", &format!("4020-01-{:02}", 10 - offset)));
            assert!(created.ok, "{}", created.message);
        }

        let response = calendar_upcoming(Some("4020-01-01".to_string()));
        assert!(response.ok, "{}", response.message);
        assert!(response.items.len() <= 5);
        let dates: Vec<_> = response.items.iter().map(|item| item.date.clone()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert!(response
            .items
            .iter()
            .all(|item| item.relative_day == "later"));
    }

    #[test]
    fn overview_counts_month_events() {
        use_test_db();
        let created = calendar_create_event(input("stat", "5000-06-15"));
        assert!(created.ok, "{}", created.message);

        let response = calendar_overview(5000, 6, Some("5000-06-15".to_string()));
        assert!(response.ok, "{}", response.message);
        assert!(response.month_count >= 1);
        assert!(response.today_count >= 1);
    }

    fn unique_nanos() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos()
    }
}
