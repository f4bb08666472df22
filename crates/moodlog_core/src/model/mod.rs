//! Domain model shared by the journal and tracker profiles.
//!
//! # Responsibility
//! - Define the persisted record shapes (entries, habits, completion log,
//!   theme) and their serialized form.
//! - Provide small lifecycle helpers that keep record invariants local.
//!
//! # Invariants
//! - Entries reference habits by *name* snapshot, never by id.
//! - Every persisted type round-trips through `serde_json` unchanged.

pub mod entry;
pub mod habit;
pub mod theme;
