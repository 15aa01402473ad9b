//! Feedback categories, the trigger registry and the cooldown table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A class of triggers sharing one cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Tap,
    Navigate,
    Success,
    Error,
    Special,
    Game,
    Ambient,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 7] = [
        FeedbackCategory::Tap,
        FeedbackCategory::Navigate,
        FeedbackCategory::Success,
        FeedbackCategory::Error,
        FeedbackCategory::Special,
        FeedbackCategory::Game,
        FeedbackCategory::Ambient,
    ];

    /// Category used for anything that doesn't resolve.
    pub const BASELINE: FeedbackCategory = FeedbackCategory::Tap;

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCategory::Tap => "tap",
            FeedbackCategory::Navigate => "navigate",
            FeedbackCategory::Success => "success",
            FeedbackCategory::Error => "error",
            FeedbackCategory::Special => "special",
            FeedbackCategory::Game => "game",
            FeedbackCategory::Ambient => "ambient",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown feedback category: {s}"))
    }
}

/// Every named trigger the pages fire, mapped to its category at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    ButtonTap,
    Toggle,
    PageNavigate,
    BackNavigate,
    CorrectAnswer,
    PuzzleSolved,
    WrongAnswer,
    InvalidMove,
    NoteUnlocked,
    Heartbeat,
    Confetti,
    GameHit,
    GameOver,
    AmbientChime,
}

impl Trigger {
    pub const ALL: [Trigger; 14] = [
        Trigger::ButtonTap,
        Trigger::Toggle,
        Trigger::PageNavigate,
        Trigger::BackNavigate,
        Trigger::CorrectAnswer,
        Trigger::PuzzleSolved,
        Trigger::WrongAnswer,
        Trigger::InvalidMove,
        Trigger::NoteUnlocked,
        Trigger::Heartbeat,
        Trigger::Confetti,
        Trigger::GameHit,
        Trigger::GameOver,
        Trigger::AmbientChime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Trigger::ButtonTap => "button-tap",
            Trigger::Toggle => "toggle",
            Trigger::PageNavigate => "page-navigate",
            Trigger::BackNavigate => "back-navigate",
            Trigger::CorrectAnswer => "correct-answer",
            Trigger::PuzzleSolved => "puzzle-solved",
            Trigger::WrongAnswer => "wrong-answer",
            Trigger::InvalidMove => "invalid-move",
            Trigger::NoteUnlocked => "note-unlocked",
            Trigger::Heartbeat => "heartbeat",
            Trigger::Confetti => "confetti",
            Trigger::GameHit => "game-hit",
            Trigger::GameOver => "game-over",
            Trigger::AmbientChime => "ambient-chime",
        }
    }

    pub fn category(self) -> FeedbackCategory {
        match self {
            Trigger::ButtonTap | Trigger::Toggle => FeedbackCategory::Tap,
            Trigger::PageNavigate | Trigger::BackNavigate => FeedbackCategory::Navigate,
            Trigger::CorrectAnswer | Trigger::PuzzleSolved => FeedbackCategory::Success,
            Trigger::WrongAnswer | Trigger::InvalidMove => FeedbackCategory::Error,
            Trigger::NoteUnlocked | Trigger::Heartbeat | Trigger::Confetti => {
                FeedbackCategory::Special
            }
            Trigger::GameHit | Trigger::GameOver => FeedbackCategory::Game,
            Trigger::AmbientChime => FeedbackCategory::Ambient,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Trigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trigger::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown trigger: {s}"))
    }
}

/// How a free-form trigger name was resolved to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Matched a registered trigger.
    Registered(Trigger),
    /// Matched a category name directly.
    Category,
    /// Nothing matched; baseline category used.
    Fallback,
}

/// Resolve a trigger name to a category. Total: unknown names land in
/// [`FeedbackCategory::BASELINE`].
pub fn resolve_name(name: &str) -> (FeedbackCategory, Resolution) {
    if let Ok(trigger) = name.parse::<Trigger>() {
        return (trigger.category(), Resolution::Registered(trigger));
    }
    if let Ok(category) = name.parse::<FeedbackCategory>() {
        return (category, Resolution::Category);
    }
    (FeedbackCategory::BASELINE, Resolution::Fallback)
}

/// Per-category cooldowns in milliseconds.
///
/// Deserializes from a partial `category = ms` table through
/// [`CooldownTable::from_map`], so categories left out of a config file take
/// the `tap` cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<FeedbackCategory, u64>")]
pub struct CooldownTable {
    pub tap: u64,
    pub navigate: u64,
    pub success: u64,
    pub error: u64,
    pub special: u64,
    pub game: u64,
    pub ambient: u64,
}

fn default_tap() -> u64 {
    120
}
fn default_navigate() -> u64 {
    250
}
fn default_success() -> u64 {
    600
}
fn default_error() -> u64 {
    600
}
fn default_special() -> u64 {
    1500
}
fn default_game() -> u64 {
    80
}
fn default_ambient() -> u64 {
    4000
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self {
            tap: default_tap(),
            navigate: default_navigate(),
            success: default_success(),
            error: default_error(),
            special: default_special(),
            game: default_game(),
            ambient: default_ambient(),
        }
    }
}

impl From<HashMap<FeedbackCategory, u64>> for CooldownTable {
    fn from(cooldowns: HashMap<FeedbackCategory, u64>) -> Self {
        Self::from_map(&cooldowns)
    }
}

impl CooldownTable {
    /// Every category gets the same cooldown.
    pub fn uniform(ms: u64) -> Self {
        Self {
            tap: ms,
            navigate: ms,
            success: ms,
            error: ms,
            special: ms,
            game: ms,
            ambient: ms,
        }
    }

    /// Build from a partial map. Missing categories take the baseline
    /// (`tap`) cooldown; a missing `tap` takes its default.
    pub fn from_map(cooldowns: &HashMap<FeedbackCategory, u64>) -> Self {
        let baseline = cooldowns
            .get(&FeedbackCategory::BASELINE)
            .copied()
            .unwrap_or_else(default_tap);
        let mut table = Self::uniform(baseline);
        for (&category, &ms) in cooldowns {
            table.set(category, ms);
        }
        table
    }

    pub fn get(&self, category: FeedbackCategory) -> u64 {
        match category {
            FeedbackCategory::Tap => self.tap,
            FeedbackCategory::Navigate => self.navigate,
            FeedbackCategory::Success => self.success,
            FeedbackCategory::Error => self.error,
            FeedbackCategory::Special => self.special,
            FeedbackCategory::Game => self.game,
            FeedbackCategory::Ambient => self.ambient,
        }
    }

    pub fn set(&mut self, category: FeedbackCategory, ms: u64) {
        let slot = match category {
            FeedbackCategory::Tap => &mut self.tap,
            FeedbackCategory::Navigate => &mut self.navigate,
            FeedbackCategory::Success => &mut self.success,
            FeedbackCategory::Error => &mut self.error,
            FeedbackCategory::Special => &mut self.special,
            FeedbackCategory::Game => &mut self.game,
            FeedbackCategory::Ambient => &mut self.ambient,
        };
        *slot = ms;
    }
}
