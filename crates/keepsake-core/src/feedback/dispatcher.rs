//! Cooldown-gated feedback dispatcher.
//!
//! Rapid taps on a quiz button should produce one click, not twelve
//! overlapping ones. The dispatcher keeps the last emission instant per
//! [`FeedbackCategory`] and refuses anything that arrives inside that
//! category's cooldown window. Categories never affect each other.
//!
//! The dispatcher owns no playback. [`FeedbackDispatcher::try_emit`] returns
//! a permission; [`FeedbackDispatcher::dispatch`] additionally forwards to a
//! [`FeedbackSink`] and swallows its failures.
//!
//! Methods that mutate take `&mut self`. Hosts with more than one thread wrap
//! the dispatcher in a `Mutex`.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::category::{resolve_name, CooldownTable, FeedbackCategory, Resolution, Trigger};
use super::sink::FeedbackSink;
use crate::storage::KeyValueStore;

/// Key under which the mute preference is persisted.
pub const MUTED_KEY: &str = "feedback.muted";

pub struct FeedbackDispatcher<S> {
    cooldowns: CooldownTable,
    last_emitted: HashMap<FeedbackCategory, DateTime<Utc>>,
    muted: bool,
    store: S,
}

impl<S: KeyValueStore> FeedbackDispatcher<S> {
    /// Create a dispatcher with default cooldowns, restoring the mute flag
    /// from `store`. An unreadable store means "not muted".
    pub fn new(store: S) -> Self {
        Self::with_cooldowns(store, CooldownTable::default())
    }

    pub fn with_cooldowns(store: S, cooldowns: CooldownTable) -> Self {
        let muted = match store.get(MUTED_KEY) {
            Ok(Some(value)) => value.parse::<bool>().unwrap_or_else(|_| {
                tracing::warn!(value = %value, "ignoring malformed mute flag");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "mute flag unreadable, assuming unmuted");
                false
            }
        };
        Self {
            cooldowns,
            last_emitted: HashMap::new(),
            muted,
            store,
        }
    }

    /// Replace the cooldown table. Emission history is kept.
    pub fn configure(&mut self, cooldowns: CooldownTable) {
        self.cooldowns = cooldowns;
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }

    pub fn cooldown(&self, category: FeedbackCategory) -> u64 {
        self.cooldowns.get(category)
    }

    pub fn last_emitted_at(&self, category: FeedbackCategory) -> Option<DateTime<Utc>> {
        self.last_emitted.get(&category).copied()
    }

    pub fn try_emit(&mut self, trigger: Trigger, now: DateTime<Utc>) -> bool {
        self.try_emit_category(trigger.category(), now)
    }

    /// Name-keyed variant for callers that only have a string. Unknown
    /// names share the baseline category's cooldown.
    pub fn try_emit_named(&mut self, name: &str, now: DateTime<Utc>) -> bool {
        let (category, resolution) = resolve_name(name);
        if resolution == Resolution::Fallback {
            tracing::warn!(
                trigger = name,
                category = %category,
                "unregistered trigger, using baseline category"
            );
        }
        self.try_emit_category(category, now)
    }

    pub fn try_emit_category(&mut self, category: FeedbackCategory, now: DateTime<Utc>) -> bool {
        if self.muted {
            return false;
        }

        if let Some(last) = self.last_emitted.get(&category) {
            let elapsed_ms = (now - *last).num_milliseconds();
            let cooldown_ms = i64::try_from(self.cooldowns.get(category)).unwrap_or(i64::MAX);
            if elapsed_ms < cooldown_ms {
                tracing::debug!(%category, elapsed_ms, cooldown_ms, "feedback suppressed");
                return false;
            }
        }

        self.last_emitted.insert(category, now);
        tracing::debug!(%category, at = %now, "feedback emitted");
        true
    }

    /// Gate `trigger` and, when allowed, hand it to `sink`. Sink failures are
    /// logged; the return value only says whether emission was permitted.
    pub fn dispatch<K>(&mut self, trigger: Trigger, now: DateTime<Utc>, sink: &mut K) -> bool
    where
        K: FeedbackSink + ?Sized,
    {
        if !self.try_emit(trigger, now) {
            return false;
        }
        if let Err(e) = sink.emit(trigger.category()) {
            tracing::warn!(trigger = %trigger, error = %e, "feedback playback failed");
        }
        true
    }

    /// Set the global mute flag and persist it. Persistence failures are
    /// logged; the flag still applies for this process.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Err(e) = self.store.set(MUTED_KEY, if muted { "true" } else { "false" }) {
            tracing::warn!(error = %e, muted, "could not persist mute flag");
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Forget all emission history.
    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}
