//! Toy-game progress: daily visit streak, high scores, unlocked notes.
//!
//! Everything goes through a [`KeyValueStore`]. A store that fails is never
//! fatal here: reads fall back to defaults, writes are logged and skipped,
//! and the caller still gets the freshly computed value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;

const STREAK_KEY: &str = "progress.streak";
const HIGH_SCORE_PREFIX: &str = "progress.high_score.";
const UNLOCKED_PREFIX: &str = "progress.unlocked.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
    pub last_day: Option<NaiveDate>,
}

impl Streak {
    /// Streak after a visit on `day`.
    pub fn advance(self, day: NaiveDate) -> Streak {
        let current = match self.last_day {
            Some(last) if day == last => self.current,
            Some(last) if day < last => return self,
            Some(last) if last.succ_opt() == Some(day) => self.current + 1,
            _ => 1,
        };
        Streak {
            current,
            best: self.best.max(current),
            last_day: Some(day),
        }
    }
}

pub struct Progress<S> {
    store: S,
}

impl<S: KeyValueStore> Progress<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "progress read failed, using default");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "progress write failed, not persisted");
        }
    }

    pub fn streak(&self) -> Streak {
        self.read(STREAK_KEY)
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(streak) => Some(streak),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding corrupt streak record");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Record a visit on `day` and return the updated streak.
    pub fn record_visit(&self, day: NaiveDate) -> Streak {
        let before = self.streak();
        let after = before.advance(day);
        if after != before {
            match serde_json::to_string(&after) {
                Ok(json) => self.write(STREAK_KEY, &json),
                Err(e) => tracing::warn!(error = %e, "could not encode streak"),
            }
        }
        after
    }

    pub fn high_score(&self, game: &str) -> u64 {
        self.read(&format!("{HIGH_SCORE_PREFIX}{game}"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Store `score` if it beats the current best. Returns whether it did.
    pub fn submit_score(&self, game: &str, score: u64) -> bool {
        if score <= self.high_score(game) {
            return false;
        }
        self.write(&format!("{HIGH_SCORE_PREFIX}{game}"), &score.to_string());
        tracing::debug!(game, score, "new high score");
        true
    }

    pub fn unlock(&self, note: &str) {
        self.write(&format!("{UNLOCKED_PREFIX}{note}"), "true");
    }

    pub fn is_unlocked(&self, note: &str) -> bool {
        self.read(&format!("{UNLOCKED_PREFIX}{note}")).as_deref() == Some("true")
    }
}
