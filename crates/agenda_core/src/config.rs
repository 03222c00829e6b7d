//! Calendar view configuration.

use crate::calendar::upcoming::UPCOMING_LIMIT;
use crate::repo::event_repo::DEFAULT_EVENTS_KEY;

/// Tunables for the calendar page and dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    /// Maximum length of the upcoming list.
    pub upcoming_limit: usize,
    /// Events shown inside one grid cell before the "+N more" marker.
    pub day_preview_limit: usize,
    /// Maximum length of the dashboard's "next" list (excludes today).
    pub dashboard_upcoming_limit: usize,
    /// Key under which the event blob is persisted.
    pub storage_key: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: UPCOMING_LIMIT,
            day_preview_limit: 2,
            dashboard_upcoming_limit: 3,
            storage_key: DEFAULT_EVENTS_KEY.to_string(),
        }
    }
}
