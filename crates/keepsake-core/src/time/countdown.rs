//! Plain-duration countdown. No calendar reasoning: days are 24 hours.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400
            + u64::from(self.hours) * 3600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Time remaining until `target`, floored to whole seconds.
///
/// `None` once `target <= now`; callers render that as "arrived".
pub fn countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<Countdown> {
    if target <= now {
        return None;
    }
    let secs = (target - now).num_milliseconds() / 1000;
    let secs = u64::try_from(secs).ok()?;
    Some(Countdown {
        days: secs / 86_400,
        hours: (secs % 86_400 / 3600) as u32,
        minutes: (secs % 3600 / 60) as u32,
        seconds: (secs % 60) as u32,
    })
}
