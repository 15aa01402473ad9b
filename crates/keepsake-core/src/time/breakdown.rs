//! "Time together" breakdown.
//!
//! All fields derive from one basis, in UTC: the anchor is `start` plus the
//! largest whole number of calendar months that does not pass `now`, and the
//! rest of the elapsed time (`now - anchor`) is split into days, hours,
//! minutes and seconds. Month addition clamps to the last day of a shorter
//! month, so Jan 31 + 1 month is Feb 28 (or 29).
//!
//! Because days and the clock fields come from the same remainder, applying
//! the breakdown back to `start` (see [`TimeBreakdown::reconstruct`]) lands
//! on `now` to the second, and no field can go negative.

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const SECS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub total_days: u64,
}

impl TimeBreakdown {
    /// Whole calendar months covered (years folded in).
    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    /// Apply this breakdown to `start`. Months are added in one step; adding
    /// years and months separately can clamp twice and drift.
    pub fn reconstruct(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let anchor = start.checked_add_months(Months::new(self.total_months()))?;
        let clock = Duration::days(i64::from(self.days))
            + Duration::hours(i64::from(self.hours))
            + Duration::minutes(i64::from(self.minutes))
            + Duration::seconds(i64::from(self.seconds));
        anchor.checked_add_signed(clock)
    }
}

impl fmt::Display for TimeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}y {}m {}d {:02}:{:02}:{:02}",
            self.years, self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

fn out_of_range() -> ValidationError {
    ValidationError::InvalidValue {
        field: "start".into(),
        message: "date arithmetic out of range".into(),
    }
}

/// Calendar-aware decomposition of `now - start`.
///
/// # Errors
/// [`ValidationError::InvalidRange`] when `now` precedes `start`.
pub fn breakdown(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<TimeBreakdown, ValidationError> {
    if now < start {
        return Err(ValidationError::InvalidRange { start, now });
    }

    // Month distance by calendar fields; at most one too many once time of
    // day and day-of-month are considered.
    let estimate = (now.year() - start.year()) * 12 + now.month() as i32 - start.month() as i32;
    let mut months_total = u32::try_from(estimate).map_err(|_| out_of_range())?;
    let mut anchor = start
        .checked_add_months(Months::new(months_total))
        .ok_or_else(out_of_range)?;
    if anchor > now {
        months_total -= 1;
        anchor = start
            .checked_add_months(Months::new(months_total))
            .ok_or_else(out_of_range)?;
    }

    let rest = (now - anchor).num_seconds();
    let days = rest / SECS_PER_DAY;
    let clock = rest % SECS_PER_DAY;

    Ok(TimeBreakdown {
        years: months_total / 12,
        months: months_total % 12,
        days: days as u32,
        hours: (clock / 3600) as u32,
        minutes: (clock % 3600 / 60) as u32,
        seconds: (clock % 60) as u32,
        total_days: (now - start).num_days() as u64,
    })
}
