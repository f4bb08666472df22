//! Flutter-facing bindings for `moodlog_core`.

pub mod api;
