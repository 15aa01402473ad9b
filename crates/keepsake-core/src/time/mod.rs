mod annual;
mod breakdown;
mod countdown;

pub use annual::{next_annual_occurrence, AnnualDate, LeapDayPolicy, NextOccurrence};
pub use breakdown::{breakdown, TimeBreakdown};
pub use countdown::{countdown, Countdown};
