//! Derivation layer: pure projections over session state.
//!
//! # Invariants
//! - Nothing in this module mutates entries, habits or completion logs.
//! - Projections preserve the stored (most-recent-first) order.

pub mod filter;
pub mod streak;
