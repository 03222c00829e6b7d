//! Calendar domain model.
//!
//! # Responsibility
//! - Define the canonical event record shared by store, derivations and FFI.
//! - Keep form parsing at the boundary so the store only sees typed fields.
//!
//! # Invariants
//! - Every event is identified by a store-unique `EventId`.
//! - Deletion is a hard remove; there is no tombstone or history.

pub mod event;
