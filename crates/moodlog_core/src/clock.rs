//! Time source for entry ids, entry dates and streaks.
//!
//! # Invariants
//! - `today()` is the local calendar date matching `now_millis()`.

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use std::cell::Cell;
use std::fmt::Write;
use std::rc::Rc;

/// Supplies the current instant and calendar day.
pub trait Clock {
    /// Unix epoch milliseconds.
    fn now_millis(&self) -> i64;
    /// Local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock. Clones share the same instant, so a test can keep
/// one handle and advance the clock owned by a service.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Starts at noon of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance_days(&self, days: u64) {
        let current = self.now.get();
        self.now
            .set(current.checked_add_days(Days::new(days)).unwrap_or(current));
    }

    pub fn advance_millis(&self, millis: i64) {
        let current = self.now.get();
        self.now
            .set(current + chrono::Duration::milliseconds(millis));
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.get().and_utc().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Renders `day` with a strftime pattern, or `None` when the pattern is
/// malformed or asks for fields a date does not have (e.g. `%H`).
pub fn try_format_day(day: NaiveDate, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", day.format(format)).ok()?;
    Some(rendered)
}

/// Renders `day` with a strftime pattern.
///
/// Falls back to ISO `YYYY-MM-DD` when the pattern cannot be rendered, so an
/// unvalidated pattern never panics.
pub fn format_day(day: NaiveDate, format: &str) -> String {
    try_format_day(day, format).unwrap_or_else(|| day.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_day, try_format_day, Clock, FixedClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_clones_share_time() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let handle = clock.clone();
        let before = clock.now_millis();

        handle.advance_days(1);

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(clock.now_millis() - before, 86_400_000);
    }

    #[test]
    fn format_day_renders_locale_style_and_survives_bad_patterns() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_day(day, "%-m/%-d/%Y"), "3/7/2026");
        assert_eq!(format_day(day, "%Q"), "2026-03-07");
        assert_eq!(try_format_day(day, "%H:%M"), None);
        assert_eq!(format_day(day, "%H:%M"), "2026-03-07");
    }
}
