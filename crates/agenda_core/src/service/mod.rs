//! Core use-case services.
//!
//! # Responsibility
//! - Combine the event store with calendar derivations for one view.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod calendar_service;
