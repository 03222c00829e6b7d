use agenda_core::{Event, EventCategory, EventDraft, EventFields, EventId};
use chrono::{NaiveDate, NaiveTime};

fn team_meeting() -> Event {
    Event::from_fields(
        EventId::new("1"),
        EventFields {
            title: "Team meeting".to_string(),
            description: Some("Quarterly review".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 12, 22).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            category: EventCategory::Meeting,
            location: Some("Conference room".to_string()),
            attendees: vec!["João".to_string(), "Maria".to_string(), "Pedro".to_string()],
        },
    )
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let event = team_meeting();

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], "1");
    assert_eq!(json["date"], "2024-12-22");
    assert_eq!(json["startTime"], "09:00");
    assert_eq!(json["endTime"], "10:30");
    assert_eq!(json["type"], "meeting");
    assert_eq!(json["location"], "Conference room");
    assert_eq!(json["attendees"][2], "Pedro");

    let decoded: Event = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn absent_optional_fields_are_omitted() {
    let mut event = team_meeting();
    event.description = None;
    event.location = None;

    let json = serde_json::to_value(&event).unwrap();
    assert!(json.get("description").is_none());
    assert!(json.get("location").is_none());
}

#[test]
fn draft_prefilled_from_event_validates_back_to_same_fields() {
    let event = team_meeting();
    let draft = EventDraft::from_event(&event);

    assert_eq!(draft.attendees, "João, Maria, Pedro");
    assert_eq!(draft.start_time, "09:00");
    assert_eq!(draft.validate().unwrap(), event.fields());
}

#[test]
fn draft_trims_text_and_splits_attendees() {
    let draft = EventDraft {
        title: "  Dentist ".to_string(),
        description: "   ".to_string(),
        date: "2025-09-10".to_string(),
        start_time: "16:30".to_string(),
        end_time: "17:00".to_string(),
        category: "HEALTH".to_string(),
        location: " Clinic ".to_string(),
        attendees: "João, Maria ,  , Pedro".to_string(),
    };

    let fields = draft.validate().unwrap();
    assert_eq!(fields.title, "Dentist");
    assert_eq!(fields.description, None);
    assert_eq!(fields.location.as_deref(), Some("Clinic"));
    assert_eq!(fields.category, EventCategory::Health);
    assert_eq!(fields.attendees, vec!["João", "Maria", "Pedro"]);
}

#[test]
fn inverted_time_range_is_accepted_but_detectable() {
    let draft = EventDraft {
        title: "Late shift".to_string(),
        date: "2025-01-10".to_string(),
        start_time: "22:00".to_string(),
        end_time: "06:00".to_string(),
        ..EventDraft::default()
    };

    let event = Event::from_fields(EventId::generate(), draft.validate().unwrap());
    assert!(event.has_inverted_time_range());
    assert!(!team_meeting().has_inverted_time_range());
}

#[test]
fn generated_ids_are_distinct() {
    assert_ne!(EventId::generate(), EventId::generate());
}
