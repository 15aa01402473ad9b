//! Property tests for the feedback dispatcher.

use chrono::{DateTime, Duration, TimeZone, Utc};
use keepsake_core::{CooldownTable, FeedbackCategory, FeedbackDispatcher, MemoryStore, Trigger};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 26, 0, 0, 0).unwrap()
}

fn trigger() -> impl Strategy<Value = Trigger> {
    prop::sample::select(Trigger::ALL.to_vec())
}

fn cooldowns() -> impl Strategy<Value = CooldownTable> {
    prop::collection::vec(0u64..2_000, 7).prop_map(|ms| {
        let mut table = CooldownTable::default();
        for (category, value) in FeedbackCategory::ALL.into_iter().zip(ms) {
            table.set(category, value);
        }
        table
    })
}

proptest! {
    #[test]
    fn emission_blocks_its_category_for_the_cooldown(
        table in cooldowns(),
        events in prop::collection::vec((trigger(), 0i64..5_000), 1..40),
    ) {
        let mut dispatcher = FeedbackDispatcher::with_cooldowns(MemoryStore::new(), table.clone());
        let mut sorted = events;
        sorted.sort_by_key(|(_, ms)| *ms);

        let mut emitted: Vec<(FeedbackCategory, i64)> = Vec::new();
        for (trigger, ms) in sorted {
            let allowed = dispatcher.try_emit(trigger, base() + Duration::milliseconds(ms));
            let category = trigger.category();
            let last = emitted.iter().rev().find(|(c, _)| *c == category).map(|(_, at)| *at);
            let expected = match last {
                Some(at) => ms - at >= table.get(category) as i64,
                None => true,
            };
            prop_assert_eq!(allowed, expected);
            if allowed {
                emitted.push((category, ms));
            }
        }
    }

    #[test]
    fn other_categories_are_untouched(
        first in trigger(),
        second in trigger(),
        gap in 0i64..10_000,
    ) {
        prop_assume!(first.category() != second.category());
        let mut dispatcher = FeedbackDispatcher::new(MemoryStore::new());
        prop_assert!(dispatcher.try_emit(first, base()));
        let before: Vec<_> = FeedbackCategory::ALL
            .into_iter()
            .filter(|c| *c != second.category())
            .map(|c| dispatcher.last_emitted_at(c))
            .collect();

        prop_assert!(dispatcher.try_emit(second, base() + Duration::milliseconds(gap)));
        let after: Vec<_> = FeedbackCategory::ALL
            .into_iter()
            .filter(|c| *c != second.category())
            .map(|c| dispatcher.last_emitted_at(c))
            .collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn muted_dispatcher_is_inert(
        events in prop::collection::vec((trigger(), 0i64..100_000), 0..30),
    ) {
        let mut dispatcher = FeedbackDispatcher::new(MemoryStore::new());
        dispatcher.set_muted(true);
        for (trigger, ms) in events {
            prop_assert!(!dispatcher.try_emit(trigger, base() + Duration::milliseconds(ms)));
        }
        for category in FeedbackCategory::ALL {
            prop_assert_eq!(dispatcher.last_emitted_at(category), None);
        }
    }

    #[test]
    fn any_name_resolves(name in "\\PC{0,24}") {
        let mut dispatcher = FeedbackDispatcher::new(MemoryStore::new());
        prop_assert!(dispatcher.try_emit_named(&name, base()));
    }
}
