//! In-memory event store with injected persistence.
//!
//! # Responsibility
//! - Own the ordered event collection (the single source of truth).
//! - Apply create/update/delete, persist, then notify subscribers.
//!
//! # Invariants
//! - Iteration order is insertion order; the store never sorts.
//! - Ids are unique and non-blank for the store lifetime.
//! - Update/delete of an unknown id is a no-op returning `false`.
//! - Subscribers run synchronously after a successful save.

use crate::model::event::{Event, EventFields, EventId};
use crate::repo::event_repo::EventPersistence;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// Import path tried to reuse an id already in the store.
    DuplicateId(EventId),
    /// Import path supplied an empty or whitespace-only id.
    BlankId,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "event id already exists: {id}"),
            Self::BlankId => write!(f, "event id must not be blank"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::DuplicateId(_) | Self::BlankId => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Mutation notice delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Created(EventId),
    Updated(EventId),
    Deleted(EventId),
}

impl StoreChange {
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => id,
        }
    }
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Ordered event collection.
pub struct EventStore<P: EventPersistence> {
    events: Vec<Event>,
    persistence: P,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<P: EventPersistence> EventStore<P> {
    /// Restores the collection from `persistence`.
    pub fn load(persistence: P) -> StoreResult<Self> {
        let events = persistence.load()?;
        info!(
            "event=store_load module=store status=ok count={}",
            events.len()
        );
        Ok(Self {
            events,
            persistence,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Current events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends a new event under a freshly generated id.
    pub fn create(&mut self, fields: EventFields) -> StoreResult<&Event> {
        let mut id = EventId::generate();
        while self.position(&id).is_some() {
            id = EventId::generate();
        }
        self.insert(id, fields)
    }

    /// Appends a new event under a caller-provided id.
    ///
    /// # Errors
    /// - `BlankId` when `id` is empty after trimming.
    /// - `DuplicateId` when `id` is already present.
    pub fn create_with_id(&mut self, id: EventId, fields: EventFields) -> StoreResult<&Event> {
        if id.is_blank() {
            return Err(StoreError::BlankId);
        }
        if self.position(&id).is_some() {
            return Err(StoreError::DuplicateId(id));
        }
        self.insert(id, fields)
    }

    /// Replaces all mutable fields of `id` in place.
    ///
    /// Returns `Ok(false)` without saving when `id` is unknown.
    pub fn update(&mut self, id: &EventId, fields: EventFields) -> StoreResult<bool> {
        let Some(position) = self.position(id) else {
            info!("event=store_update module=store status=noop event_id={id}");
            return Ok(false);
        };

        let previous = self.events[position].clone();
        self.events[position].apply(fields);
        warn_if_inverted(&self.events[position]);

        if let Err(err) = self.persistence.save(&self.events) {
            self.events[position] = previous;
            return Err(save_failed("store_update", id, err));
        }

        info!("event=store_update module=store status=ok event_id={id}");
        self.notify(&StoreChange::Updated(id.clone()));
        Ok(true)
    }

    /// Removes `id`. Returns `Ok(false)` when nothing matched.
    pub fn delete(&mut self, id: &EventId) -> StoreResult<bool> {
        let Some(position) = self.position(id) else {
            info!("event=store_delete module=store status=noop event_id={id}");
            return Ok(false);
        };

        let removed = self.events.remove(position);
        if let Err(err) = self.persistence.save(&self.events) {
            self.events.insert(position, removed);
            return Err(save_failed("store_delete", id, err));
        }

        info!(
            "event=store_delete module=store status=ok event_id={id} total={}",
            self.events.len()
        );
        self.notify(&StoreChange::Deleted(removed.id));
        Ok(true)
    }

    /// Registers a listener called after every successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Gives the persistence adapter back.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn insert(&mut self, id: EventId, fields: EventFields) -> StoreResult<&Event> {
        self.events.push(Event::from_fields(id.clone(), fields));
        if let Err(err) = self.persistence.save(&self.events) {
            self.events.pop();
            return Err(save_failed("store_create", &id, err));
        }

        let position = self.events.len() - 1;
        warn_if_inverted(&self.events[position]);
        info!(
            "event=store_create module=store status=ok event_id={id} total={}",
            self.events.len()
        );
        self.notify(&StoreChange::Created(id));
        Ok(&self.events[position])
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|event| &event.id == id)
    }

    fn notify(&mut self, change: &StoreChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

fn warn_if_inverted(event: &Event) {
    if event.has_inverted_time_range() {
        warn!(
            "event=time_range_inverted module=store status=accepted event_id={}",
            event.id
        );
    }
}

fn save_failed(operation: &str, id: &EventId, err: RepoError) -> StoreError {
    warn!("event={operation} module=store status=error event_id={id} error_code=save_failed error={err}");
    StoreError::Repo(err)
}
