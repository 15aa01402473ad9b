//! Recurring annual dates (anniversaries).

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Where a Feb 29 date lands in years without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeapDayPolicy {
    #[default]
    Feb28,
    Mar1,
}

/// A `{ month, day }` pair that recurs every year. Feb 29 is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnnualDate", into = "RawAnnualDate")]
pub struct AnnualDate {
    month: u32,
    day: u32,
}

#[derive(Serialize, Deserialize)]
struct RawAnnualDate {
    month: u32,
    day: u32,
}

impl TryFrom<RawAnnualDate> for AnnualDate {
    type Error = ValidationError;

    fn try_from(raw: RawAnnualDate) -> Result<Self, Self::Error> {
        AnnualDate::new(raw.month, raw.day)
    }
}

impl From<AnnualDate> for RawAnnualDate {
    fn from(date: AnnualDate) -> Self {
        RawAnnualDate {
            month: date.month,
            day: date.day,
        }
    }
}

impl AnnualDate {
    /// # Errors
    /// Returns an error if `day` does not exist in `month` of a leap year.
    pub fn new(month: u32, day: u32) -> Result<Self, ValidationError> {
        // 2000 is a leap year, so Feb 29 validates.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(ValidationError::InvalidValue {
                field: "annual_date".into(),
                message: format!("{month:02}-{day:02} is not a calendar date"),
            });
        }
        Ok(Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_leap_day(&self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// The concrete date in `year`, applying `policy` to Feb 29.
    pub fn in_year(&self, year: i32, policy: LeapDayPolicy) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            if !self.is_leap_day() {
                return None;
            }
            match policy {
                LeapDayPolicy::Feb28 => NaiveDate::from_ymd_opt(year, 2, 28),
                LeapDayPolicy::Mar1 => NaiveDate::from_ymd_opt(year, 3, 1),
            }
        })
    }
}

impl fmt::Display for AnnualDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextOccurrence {
    pub next_date: NaiveDate,
    pub is_today: bool,
    pub days_until: i64,
}

impl NextOccurrence {
    /// Midnight UTC at the start of `next_date`.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.next_date.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Nearest date on or after `now`'s date matching `target`.
///
/// Comparison is by calendar date in UTC. `is_today` holds when the resolved
/// date for this year equals today, so a Feb 29 target is "today" on its
/// policy date in non-leap years.
///
/// # Errors
/// Only when the year falls outside the supported calendar range.
pub fn next_annual_occurrence(
    target: AnnualDate,
    now: DateTime<Utc>,
    policy: LeapDayPolicy,
) -> Result<NextOccurrence, ValidationError> {
    let today = now.date_naive();
    let resolve = |year: i32| {
        target
            .in_year(year, policy)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "year".into(),
                message: format!("{year} is outside the supported range"),
            })
    };

    let mut next_date = resolve(today.year())?;
    if next_date < today {
        next_date = resolve(today.year() + 1)?;
    }

    Ok(NextOccurrence {
        next_date,
        is_today: next_date == today,
        days_until: (next_date - today).num_days(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn anniversary_today() {
        let target = AnnualDate::new(7, 11).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 7, 11, 0, 0, 0).unwrap();
        let next = next_annual_occurrence(target, now, LeapDayPolicy::default()).unwrap();
        assert!(next.is_today);
        assert_eq!(next.next_date, date(2025, 7, 11));
        assert_eq!(next.days_until, 0);
    }

    #[test]
    fn today_holds_until_midnight() {
        let target = AnnualDate::new(7, 11).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 7, 11, 23, 59, 59).unwrap();
        let next = next_annual_occurrence(target, now, LeapDayPolicy::default()).unwrap();
        assert!(next.is_today);
    }

    #[test]
    fn day_after_rolls_to_next_year() {
        let target = AnnualDate::new(7, 11).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap();
        let next = next_annual_occurrence(target, now, LeapDayPolicy::default()).unwrap();
        assert!(!next.is_today);
        assert_eq!(next.next_date, date(2026, 7, 11));
        assert_eq!(next.days_until, 364);
    }

    #[test]
    fn later_this_year() {
        let target = AnnualDate::new(12, 25).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 8, 0, 0).unwrap();
        let next = next_annual_occurrence(target, now, LeapDayPolicy::default()).unwrap();
        assert_eq!(next.next_date, date(2025, 12, 25));
        assert_eq!(next.days_until, 24);
        assert_eq!(
            next.starts_at(),
            Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn invalid_dates_rejected() {
        assert!(AnnualDate::new(2, 30).is_err());
        assert!(AnnualDate::new(13, 1).is_err());
        assert!(AnnualDate::new(4, 31).is_err());
        assert!(AnnualDate::new(0, 1).is_err());
        assert!(AnnualDate::new(2, 29).is_ok());
    }

    #[test]
    fn leap_day_policies_in_common_year() {
        let target = AnnualDate::new(2, 29).unwrap();
        assert_eq!(target.in_year(2025, LeapDayPolicy::Feb28), Some(date(2025, 2, 28)));
        assert_eq!(target.in_year(2025, LeapDayPolicy::Mar1), Some(date(2025, 3, 1)));
        assert_eq!(target.in_year(2028, LeapDayPolicy::Mar1), Some(date(2028, 2, 29)));
    }

    #[test]
    fn leap_day_is_today_on_policy_date() {
        let target = AnnualDate::new(2, 29).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mar1 = next_annual_occurrence(target, now, LeapDayPolicy::Mar1).unwrap();
        assert!(mar1.is_today);

        let feb28 = next_annual_occurrence(target, now, LeapDayPolicy::Feb28).unwrap();
        assert!(!feb28.is_today);
        assert_eq!(feb28.next_date, date(2026, 2, 28));
    }

    #[test]
    fn leap_day_from_common_year_reaches_real_leap_day() {
        let target = AnnualDate::new(2, 29).unwrap();
        let now = Utc.with_ymd_and_hms(2027, 6, 1, 0, 0, 0).unwrap();
        let next = next_annual_occurrence(target, now, LeapDayPolicy::Feb28).unwrap();
        assert_eq!(next.next_date, date(2028, 2, 29));
    }

    #[test]
    fn annual_date_deserialization_validates() {
        let ok: AnnualDate = serde_json::from_str(r#"{"month":7,"day":11}"#).unwrap();
        assert_eq!(ok.to_string(), "07-11");
        assert!(serde_json::from_str::<AnnualDate>(r#"{"month":2,"day":31}"#).is_err());
    }
}
