//! # Keepsake Core Library
//!
//! This library provides the shared logic behind the Keepsake pages: the
//! quizzes, puzzles and toy games all lean on the same few pieces, which live
//! here so the CLI (and any other shell) is a thin layer over them.
//!
//! ## Architecture
//!
//! - **Feedback**: a cooldown-gated dispatcher that decides whether a trigger
//!   should actually produce sound/haptic output
//! - **Time**: calendar-aware "time together" breakdown, next anniversary and
//!   plain countdowns. Every function takes `now` explicitly
//! - **Storage**: SQLite-backed key-value store, progress counters (streaks,
//!   high scores, unlocked notes) and TOML configuration
//!
//! ## Key Components
//!
//! - [`FeedbackDispatcher`]: per-category cooldown gate
//! - [`breakdown`], [`next_annual_occurrence`], [`countdown`]: time calculator
//! - [`KeyValueStore`]: persistence boundary, implemented by [`Database`]
//! - [`Progress`]: streaks, high scores and unlock flags
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod feedback;
pub mod storage;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use feedback::{
    CooldownTable, FeedbackCategory, FeedbackDispatcher, FeedbackSink, SinkError, Trigger,
};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, Progress, Streak};
pub use time::{
    breakdown, countdown, next_annual_occurrence, AnnualDate, Countdown, LeapDayPolicy,
    NextOccurrence, TimeBreakdown,
};
