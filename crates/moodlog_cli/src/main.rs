//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `moodlog_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use moodlog_core::{AppProfile, CoreConfig};

fn main() {
    println!("moodlog_core ping={}", moodlog_core::ping());
    println!("moodlog_core version={}", moodlog_core::core_version());
    for profile in [AppProfile::Journal, AppProfile::Tracker] {
        let keys = CoreConfig::for_profile(profile).store_keys();
        println!(
            "moodlog_core profile={} entries_key={} theme_key={} habits_key={}",
            profile.as_str(),
            keys.entries,
            keys.theme,
            keys.habits
        );
    }
}
