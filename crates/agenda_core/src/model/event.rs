//! Calendar event domain model.
//!
//! # Responsibility
//! - Define the canonical `Event` record owned by the event store.
//! - Parse raw form input (`EventDraft`) into typed fields exactly once.
//!
//! # Invariants
//! - `EventId` is unique inside one store for the store lifetime.
//! - `title` is never empty after trimming.
//! - `date` is always a valid calendar date (`YYYY-MM-DD` on the wire).
//! - `start_time < end_time` is NOT enforced; see `has_inverted_time_range`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Opaque event identifier.
///
/// Freshly created events get UUID v4 text. Restored data may carry any
/// non-empty token (for example `"1"`), which is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Empty or whitespace-only ids are never valid in a store.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Meeting,
    /// Default for new events.
    #[default]
    Personal,
    Work,
    Health,
    Study,
}

impl EventCategory {
    /// All categories in picker order.
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Meeting,
        EventCategory::Personal,
        EventCategory::Work,
        EventCategory::Health,
        EventCategory::Study,
    ];

    /// Wire name used in persisted blobs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Health => "health",
            Self::Study => "study",
        }
    }

    /// Human-readable label for badges and legends.
    pub fn label(self) -> &'static str {
        match self {
            Self::Meeting => "Meeting",
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Health => "Health",
            Self::Study => "Study",
        }
    }

    /// Parses a wire name, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meeting" => Some(Self::Meeting),
            "personal" => Some(Self::Personal),
            "work" => Some(Self::Work),
            "health" => Some(Self::Health),
            "study" => Some(Self::Study),
            _ => None,
        }
    }
}

/// Validated mutable fields of an event, without identity.
///
/// Produced by `EventDraft::validate` and consumed by store create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub category: EventCategory,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

/// Scheduled calendar item.
///
/// Serialized with camelCase names and `type` for the category, matching
/// the blob layout the app shell already keeps in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(rename = "type")]
    pub category: EventCategory,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl Event {
    /// Builds an event from an identifier and validated fields.
    pub fn from_fields(id: EventId, fields: EventFields) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            category: fields.category,
            location: fields.location,
            attendees: fields.attendees,
        }
    }

    /// Replaces every mutable field; `id` is untouched.
    pub fn apply(&mut self, fields: EventFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.date = fields.date;
        self.start_time = fields.start_time;
        self.end_time = fields.end_time;
        self.category = fields.category;
        self.location = fields.location;
        self.attendees = fields.attendees;
    }

    /// Returns a copy of the mutable fields (edit-form prefill).
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            location: self.location.clone(),
            attendees: self.attendees.clone(),
        }
    }

    /// Returns true when the start time is not before the end time.
    ///
    /// Such events are accepted; callers may surface a hint.
    pub fn has_inverted_time_range(&self) -> bool {
        self.start_time >= self.end_time
    }

    /// `YYYY-MM-DD` key used by date lookups in the rendering layer.
    pub fn date_key(&self) -> String {
        format_date_key(self.date)
    }
}

/// Field-level validation failures raised at the form boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyTitle,
    EmptyDate,
    EmptyStartTime,
    EmptyEndTime,
    InvalidDate(String),
    InvalidTime(String),
    UnknownCategory(String),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyDate => write!(f, "date cannot be empty"),
            Self::EmptyStartTime => write!(f, "start time cannot be empty"),
            Self::EmptyEndTime => write!(f, "end time cannot be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTime(value) => write!(f, "invalid time `{value}`; expected HH:MM"),
            Self::UnknownCategory(value) => write!(
                f,
                "unknown category `{value}`; expected meeting|personal|work|health|study"
            ),
        }
    }
}

impl Error for EventValidationError {}

/// Raw event form input.
///
/// All fields are the strings a form produces. Nothing here is trusted
/// until `validate` succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub location: String,
    /// Comma-separated attendee names.
    pub attendees: String,
}

impl EventDraft {
    /// Prefills a draft from an existing event (edit flow).
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            date: format_date_key(event.date),
            start_time: event.start_time.format(TIME_FORMAT).to_string(),
            end_time: event.end_time.format(TIME_FORMAT).to_string(),
            category: event.category.as_str().to_string(),
            location: event.location.clone().unwrap_or_default(),
            attendees: format_attendees(&event.attendees),
        }
    }

    /// Parses the draft into typed fields.
    ///
    /// # Errors
    /// - Required fields (title, date, start, end) are empty.
    /// - Date is not `YYYY-MM-DD` or time is not `HH:MM`.
    /// - Category is not one of the known names. An empty category falls
    ///   back to `personal`.
    pub fn validate(&self) -> Result<EventFields, EventValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }

        let date_text = self.date.trim();
        if date_text.is_empty() {
            return Err(EventValidationError::EmptyDate);
        }
        let date = parse_date_key(date_text)
            .ok_or_else(|| EventValidationError::InvalidDate(date_text.to_string()))?;

        let start_time = parse_required_time(&self.start_time, EventValidationError::EmptyStartTime)?;
        let end_time = parse_required_time(&self.end_time, EventValidationError::EmptyEndTime)?;

        let category_text = self.category.trim();
        let category = if category_text.is_empty() {
            EventCategory::default()
        } else {
            EventCategory::parse(category_text)
                .ok_or_else(|| EventValidationError::UnknownCategory(category_text.to_string()))?
        };

        Ok(EventFields {
            title: title.to_string(),
            description: non_empty(&self.description),
            date,
            start_time,
            end_time,
            category,
            location: non_empty(&self.location),
            attendees: parse_attendees(&self.attendees),
        })
    }
}

/// Splits comma-separated attendee text into trimmed, non-empty names.
pub fn parse_attendees(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins attendee names back into editable form text.
pub fn format_attendees(attendees: &[String]) -> String {
    attendees.join(", ")
}

/// Parses a `YYYY-MM-DD` date key.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Formats a date as its `YYYY-MM-DD` key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_required_time(
    value: &str,
    empty_error: EventValidationError,
) -> Result<NaiveTime, EventValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty_error);
    }
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .map_err(|_| EventValidationError::InvalidTime(trimmed.to_string()))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

/// `HH:MM` serde adapter for `NaiveTime`.
mod hhmm {
    use super::TIME_FORMAT;
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(text.trim(), TIME_FORMAT)
            .map_err(|_| de::Error::custom(format!("invalid time `{text}`; expected HH:MM")))
    }
}
