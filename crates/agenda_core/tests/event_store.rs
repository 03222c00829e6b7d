use agenda_core::db::open_db;
use agenda_core::{
    EventCategory, EventFields, EventId, EventPersistence, EventStore, JsonEventPersistence,
    KeyValueStore, MemoryKeyValueStore, NullPersistence, RepoError, SqliteKeyValueStore,
    StoreError,
};
use chrono::{NaiveDate, NaiveTime};

fn fields(title: &str, date: &str) -> EventFields {
    EventFields {
        title: title.to_string(),
        description: None,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        category: EventCategory::Work,
        location: None,
        attendees: Vec::new(),
    }
}

fn ids<P: EventPersistence>(store: &EventStore<P>) -> Vec<&str> {
    store.events().iter().map(|event| event.id.as_str()).collect()
}

fn seeded_store() -> EventStore<NullPersistence> {
    let mut store = EventStore::load(NullPersistence).unwrap();
    for (id, date) in [("1", "2024-12-21"), ("2", "2024-12-22"), ("3", "2024-12-24")] {
        store
            .create_with_id(EventId::new(id), fields(id, date))
            .unwrap();
    }
    store
}

#[test]
fn create_appends_in_insertion_order() {
    let mut store = EventStore::load(NullPersistence).unwrap();
    let late = store.create(fields("late", "2025-03-01")).unwrap().id.clone();
    let early = store.create(fields("early", "2024-01-01")).unwrap().id.clone();

    assert_eq!(ids(&store), vec![late.as_str(), early.as_str()]);
    assert_ne!(late, early);
}

#[test]
fn delete_removes_only_the_matching_id() {
    let mut store = seeded_store();

    assert!(store.delete(&EventId::new("2")).unwrap());
    assert_eq!(ids(&store), vec!["1", "3"]);
}

#[test]
fn delete_and_update_of_unknown_id_are_noops() {
    let mut store = seeded_store();
    let missing = EventId::new("42");

    assert!(!store.delete(&missing).unwrap());
    assert!(!store.update(&missing, fields("x", "2024-12-25")).unwrap());
    assert_eq!(ids(&store), vec!["1", "2", "3"]);
}

#[test]
fn update_preserves_id_and_position() {
    let mut store = seeded_store();
    let id = EventId::new("2");

    let mut changed = fields("moved", "2025-01-05");
    changed.category = EventCategory::Study;
    changed.attendees = vec!["Ana".to_string()];
    assert!(store.update(&id, changed.clone()).unwrap());

    assert_eq!(ids(&store), vec!["1", "2", "3"]);
    let updated = store.get(&id).unwrap();
    assert_eq!(updated.fields(), changed);
}

#[test]
fn update_with_same_fields_leaves_event_unchanged() {
    let mut store = EventStore::load(NullPersistence).unwrap();
    let original = store.create(fields("same", "2024-12-22")).unwrap().clone();

    assert!(store.update(&original.id, original.fields()).unwrap());
    assert_eq!(store.get(&original.id), Some(&original));
}

#[test]
fn mutations_are_persisted_and_restored() {
    let mut store = EventStore::load(JsonEventPersistence::new(MemoryKeyValueStore::new())).unwrap();
    let kept = store.create(fields("kept", "2024-12-22")).unwrap().id.clone();
    let dropped = store.create(fields("dropped", "2024-12-23")).unwrap().id.clone();
    store.delete(&dropped).unwrap();

    let kv = store.into_persistence().into_inner();
    let blob = kv.get("calendar_events").unwrap().unwrap();
    assert!(blob.contains(kept.as_str()));
    assert!(!blob.contains(dropped.as_str()));

    let restored = EventStore::load(JsonEventPersistence::new(kv)).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.events()[0].id, kept);
}

#[test]
fn sqlite_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut store = EventStore::load(JsonEventPersistence::new(kv)).unwrap();
        store.create(fields("persisted", "2025-09-10")).unwrap().clone()
    };

    let conn = open_db(&path).unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let store = EventStore::load(JsonEventPersistence::new(kv)).unwrap();
    assert_eq!(store.events(), std::slice::from_ref(&created));
}

#[test]
fn custom_storage_key_is_isolated() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set("calendar_events", "not json").unwrap();

    let mut store =
        EventStore::load(JsonEventPersistence::with_key(kv, "agenda.v2.events")).unwrap();
    store.create(fields("fresh", "2025-01-01")).unwrap();

    let kv = store.into_persistence().into_inner();
    assert_eq!(kv.get("calendar_events").unwrap().as_deref(), Some("not json"));
    assert!(kv.get("agenda.v2.events").unwrap().is_some());
}

#[test]
fn corrupt_blob_fails_to_load() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set("calendar_events", "{oops").unwrap();
    assert!(EventStore::load(JsonEventPersistence::new(kv)).is_err());
}

#[test]
fn blank_persisted_event_fails_to_load() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set(
        "calendar_events",
        r#"[{"id":"","title":"   ","date":"2024-12-22","startTime":"09:00","endTime":"10:00","type":"work"}]"#,
    )
    .unwrap();

    let err = EventStore::load(JsonEventPersistence::new(kv)).err().unwrap();
    assert!(matches!(err, StoreError::Repo(RepoError::InvalidData(_))));
}

#[test]
fn create_with_blank_id_is_rejected() {
    let mut store = seeded_store();
    for blank in ["", "   "] {
        let err = store
            .create_with_id(EventId::new(blank), fields("Standup", "2024-12-22"))
            .unwrap_err();
        assert!(matches!(err, StoreError::BlankId));
    }
    assert_eq!(ids(&store), vec!["1", "2", "3"]);
    assert!(!store.delete(&EventId::new("")).unwrap());
}
