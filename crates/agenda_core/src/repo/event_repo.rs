//! Event sequence persistence adapters.
//!
//! # Responsibility
//! - Load the full event sequence on store init.
//! - Save the full sequence after every store mutation.
//!
//! # Invariants
//! - A missing key loads as an empty sequence.
//! - Loaded sequences keep blob order and carry unique, non-blank ids.
//! - Loaded titles are non-blank.

use crate::model::event::Event;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use std::collections::HashSet;

/// Storage key used by the app shell for calendar events.
pub const DEFAULT_EVENTS_KEY: &str = "calendar_events";

/// Load/save contract injected into `EventStore`.
pub trait EventPersistence {
    fn load(&self) -> RepoResult<Vec<Event>>;
    fn save(&mut self, events: &[Event]) -> RepoResult<()>;
}

/// Keeps nothing; for stores that live only in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPersistence;

impl EventPersistence for NullPersistence {
    fn load(&self) -> RepoResult<Vec<Event>> {
        Ok(Vec::new())
    }

    fn save(&mut self, _events: &[Event]) -> RepoResult<()> {
        Ok(())
    }
}

/// JSON array of events stored under one key.
pub struct JsonEventPersistence<K: KeyValueStore> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> JsonEventPersistence<K> {
    /// Uses `DEFAULT_EVENTS_KEY`.
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, DEFAULT_EVENTS_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Gives the backing storage back, e.g. to inspect it in tests.
    pub fn into_inner(self) -> K {
        self.kv
    }
}

impl<K: KeyValueStore> EventPersistence for JsonEventPersistence<K> {
    fn load(&self) -> RepoResult<Vec<Event>> {
        let Some(blob) = self.kv.get(&self.key)? else {
            debug!(
                "event=events_load module=repo status=empty key={}",
                self.key
            );
            return Ok(Vec::new());
        };

        let events: Vec<Event> = serde_json::from_str(&blob).map_err(|err| {
            warn!(
                "event=events_load module=repo status=error error_code=decode_failed key={}",
                self.key
            );
            RepoError::Decode(err)
        })?;
        validate_loaded(&events).inspect_err(|err| {
            warn!(
                "event=events_load module=repo status=error error_code=invalid_data key={} error={err}",
                self.key
            );
        })?;

        debug!(
            "event=events_load module=repo status=ok key={} count={}",
            self.key,
            events.len()
        );
        Ok(events)
    }

    fn save(&mut self, events: &[Event]) -> RepoResult<()> {
        let blob = serde_json::to_string(events).map_err(RepoError::Encode)?;
        self.kv.set(&self.key, &blob)?;
        debug!(
            "event=events_save module=repo status=ok key={} count={} bytes={}",
            self.key,
            events.len(),
            blob.len()
        );
        Ok(())
    }
}

/// Rejects blobs that decode but break event invariants.
fn validate_loaded(events: &[Event]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(events.len());
    for (position, event) in events.iter().enumerate() {
        if event.id.is_blank() {
            return Err(RepoError::InvalidData(format!(
                "blank event id at position {position}"
            )));
        }
        if event.title.trim().is_empty() {
            return Err(RepoError::InvalidData(format!(
                "blank title for event `{}`",
                event.id
            )));
        }
        if !seen.insert(event.id.as_str()) {
            return Err(RepoError::InvalidData(format!(
                "duplicate event id `{}`",
                event.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{EventPersistence, JsonEventPersistence, DEFAULT_EVENTS_KEY};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore};
    use crate::repo::RepoError;

    #[test]
    fn missing_key_loads_empty() {
        let persistence = JsonEventPersistence::new(MemoryKeyValueStore::new());
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn loads_blob_written_by_the_app_shell() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(
            DEFAULT_EVENTS_KEY,
            r#"[{"id":"1","title":"Team meeting","description":"","date":"2024-12-22",
                "startTime":"09:00","endTime":"10:30","type":"meeting",
                "location":"Room 4","attendees":["João","Maria"]},
               {"id":"2","title":"Doctor","date":"2024-12-23",
                "startTime":"14:00","endTime":"15:00","type":"health"}]"#,
        )
        .unwrap();

        let events = JsonEventPersistence::new(kv).load().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, None);
        assert_eq!(events[0].location.as_deref(), Some("Room 4"));
        assert_eq!(events[0].attendees, vec!["João", "Maria"]);
        assert!(events[1].attendees.is_empty());
    }

    #[test]
    fn malformed_date_is_a_decode_error() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(
            DEFAULT_EVENTS_KEY,
            r#"[{"id":"1","title":"x","date":"22/12/2024","startTime":"09:00","endTime":"10:00","type":"work"}]"#,
        )
        .unwrap();

        let err = JsonEventPersistence::new(kv).load().unwrap_err();
        assert!(matches!(err, RepoError::Decode(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(
            DEFAULT_EVENTS_KEY,
            r#"[{"id":"1","title":"a","date":"2024-12-22","startTime":"09:00","endTime":"10:00","type":"work"},
               {"id":"1","title":"b","date":"2024-12-23","startTime":"09:00","endTime":"10:00","type":"work"}]"#,
        )
        .unwrap();

        let err = JsonEventPersistence::new(kv).load().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn blank_id_is_rejected() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(
            DEFAULT_EVENTS_KEY,
            r#"[{"id":"","title":"Standup","date":"2024-12-22","startTime":"09:00","endTime":"10:00","type":"work"}]"#,
        )
        .unwrap();

        let err = JsonEventPersistence::new(kv).load().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("blank event id")));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(
            DEFAULT_EVENTS_KEY,
            r#"[{"id":"1","title":"   ","date":"2024-12-22","startTime":"09:00","endTime":"10:00","type":"work"}]"#,
        )
        .unwrap();

        let err = JsonEventPersistence::new(kv).load().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("blank title")));
    }
}
