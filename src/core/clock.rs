//! Wall Clock Abstraction
//!
//! The only non-deterministic input besides the seed. Rounds are
//! timestamped and the daily challenge is keyed by calendar day, so both
//! go through a `Clock` that tests can pin.

use chrono::{Local, NaiveDate, TimeZone};

/// Source of wall-clock time.
pub trait Clock {
    /// Current calendar day in the player's local time zone.
    fn today(&self) -> NaiveDate;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system's local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Clock pinned to a fixed instant. Used for replays and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    /// Pin the clock to midnight (UTC) of the given day.
    pub fn on(day: NaiveDate) -> Self {
        let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
        Self {
            millis: chrono::Utc.from_utc_datetime(&midnight).timestamp_millis(),
        }
    }

    /// Pin the clock to an explicit epoch timestamp.
    pub const fn at_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Move the clock forward.
    pub fn advance_millis(&mut self, delta: i64) {
        self.millis = self.millis.saturating_add(delta);
    }

    /// Jump to midnight of the following day.
    pub fn next_day(&mut self) {
        *self = Self::on(self.today().succ_opt().unwrap_or(NaiveDate::MAX));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc
            .timestamp_millis_opt(self.millis)
            .single()
            .map(|dt| dt.date_naive())
            .unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let clock = FixedClock::on(day);
        assert_eq!(clock.today(), day);
    }

    #[test]
    fn test_fixed_clock_rollover() {
        let day = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let mut clock = FixedClock::on(day);

        clock.advance_millis(23 * 3_600_000);
        assert_eq!(clock.today(), day);

        clock.next_day();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }
}
