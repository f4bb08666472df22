//! Session state container and command handlers.
//!
//! # Responsibility
//! - Own the in-memory state of one journal/tracker session.
//! - Apply user commands atomically and persist the touched collection.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # See also
//! - `crate::view` for the pure projections commands rely on.

pub mod draft;
pub mod journal_service;
