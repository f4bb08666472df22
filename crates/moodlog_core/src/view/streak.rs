//! Consecutive-day streak counting.

use crate::clock::format_day;
use chrono::NaiveDate;

/// Counts consecutive days, walking back from `today`, whose formatted date
/// is recorded in `completed`. Stops at the first missing day.
///
/// Each recorded date can contribute at most once, which bounds the walk
/// even for patterns that render several days identically.
pub fn streak(completed: &[String], today: NaiveDate, date_format: &str) -> u32 {
    let mut count: u32 = 0;
    let mut day = today;

    while (count as usize) < completed.len() {
        let formatted = format_day(day, date_format);
        if !completed.iter().any(|recorded| *recorded == formatted) {
            break;
        }
        count += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    count
}
