//! Learner progress data model
//!
//! These types are serialized as-is into the stored progress document, so
//! field names follow the camelCase shape of that document. Derived values
//! such as accuracy are computed on demand and never stored.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CatalogMismatch, InvalidMasteryLevel};
use crate::catalog::{Catalog, VocabularyItem};

/// XP granted for each correct practice attempt
pub const CORRECT_ATTEMPT_XP: u32 = 10;

/// XP granted for each scenario completion
pub const SCENARIO_COMPLETION_XP: u32 = 100;

/// Upper bound for pronunciation and scenario scores
pub const MAX_SCORE: u8 = 100;

/// Single learner profile id
pub const DEFAULT_USER_ID: &str = "user_1";

/// Scenario selected for a fresh learner
pub const DEFAULT_SCENARIO: &str = "auto_negotiation";

const STAGE_NAMES: [&str; 8] = [
    "unknown",
    "introduced",
    "recognized",
    "recalled",
    "pronounced",
    "contextualized",
    "applied",
    "mastered",
];

/// How well a learner knows a word, from 0 (unknown) to 7 (mastered)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const UNKNOWN: Self = Self(0);
    pub const CONTEXTUALIZED: Self = Self(5);
    pub const MASTERED: Self = Self(7);

    /// Raw level value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Next level, saturating at mastered
    pub fn advance(self) -> Self {
        Self((self.0 + 1).min(Self::MASTERED.0))
    }

    /// Stage name for display
    pub fn name(self) -> &'static str {
        STAGE_NAMES[self.0 as usize]
    }

    pub fn is_mastered(self) -> bool {
        self == Self::MASTERED
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = InvalidMasteryLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MASTERED.0 { Err(InvalidMasteryLevel(value)) } else { Ok(Self(value)) }
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.0
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// A learner's state for one vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    /// The catalog item this entry tracks
    #[serde(flatten)]
    pub item: VocabularyItem,

    pub mastery_level: MasteryLevel,

    pub times_correct: u32,

    pub times_incorrect: u32,

    /// Last recorded pronunciation score (0-100)
    pub pronunciation_score: u8,

    /// Time of the last correct or incorrect attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Utc>>,
}

impl WordProgress {
    /// Fresh, unpractised entry for a catalog item
    pub fn new(item: VocabularyItem) -> Self {
        Self {
            item,
            mastery_level: MasteryLevel::UNKNOWN,
            times_correct: 0,
            times_incorrect: 0,
            pronunciation_score: 0,
            last_practiced: None,
        }
    }

    pub fn word_id(&self) -> &str {
        &self.item.word_id
    }

    pub fn attempts(&self) -> u64 {
        u64::from(self.times_correct) + u64::from(self.times_incorrect)
    }

    /// Percentage of correct attempts, or `None` before the first attempt
    pub fn accuracy(&self) -> Option<f32> {
        let attempts = self.attempts();
        if attempts == 0 {
            return None;
        }
        Some((f64::from(self.times_correct) / attempts as f64 * 100.0) as f32)
    }

    /// Mastery as a percentage of the maximum level
    pub fn mastery_percent(&self) -> f32 {
        f32::from(self.mastery_level.value()) / f32::from(MasteryLevel::MASTERED.value()) * 100.0
    }

    pub(crate) fn record_correct(&mut self, now: DateTime<Utc>) {
        self.mastery_level = self.mastery_level.advance();
        self.times_correct = self.times_correct.saturating_add(1);
        self.last_practiced = Some(now);
    }

    pub(crate) fn record_incorrect(&mut self, now: DateTime<Utc>) {
        self.times_incorrect = self.times_incorrect.saturating_add(1);
        self.last_practiced = Some(now);
    }
}

/// The whole learner aggregate, persisted as one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,

    #[serde(rename = "totalXP")]
    pub total_xp: u32,

    pub current_streak: u32,

    /// One entry per catalog word, created at initialization
    pub words_learned: Vec<WordProgress>,

    /// Completed scenario ids in completion order, without duplicates
    pub scenarios_completed: Vec<String>,

    /// Best completion score per scenario
    #[serde(default)]
    pub scenario_scores: BTreeMap<String, u8>,

    pub badges: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_scenario: Option<String>,
}

impl UserProgress {
    /// State for a learner who has never practised
    pub fn initial(catalog: &Catalog) -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            total_xp: 0,
            current_streak: 0,
            words_learned: catalog.list_words().iter().cloned().map(WordProgress::new).collect(),
            scenarios_completed: Vec::new(),
            scenario_scores: BTreeMap::new(),
            badges: Vec::new(),
            current_scenario: catalog.get_scenario(DEFAULT_SCENARIO).map(|s| s.id.clone()),
        }
    }

    /// Check that there is exactly one word entry per catalog word
    pub fn check_catalog(&self, catalog: &Catalog) -> Result<(), CatalogMismatch> {
        let mut seen = HashSet::new();
        for word in &self.words_learned {
            if catalog.get_word(word.word_id()).is_none() {
                return Err(CatalogMismatch::UnknownWord(word.word_id().to_string()));
            }
            if !seen.insert(word.word_id()) {
                return Err(CatalogMismatch::DuplicateWord(word.word_id().to_string()));
            }
        }

        match catalog.list_words().iter().find(|w| !seen.contains(w.word_id.as_str())) {
            Some(missing) => Err(CatalogMismatch::MissingWord(missing.word_id.clone())),
            None => Ok(()),
        }
    }

    /// Find progress for a word
    pub fn word(&self, word_id: &str) -> Option<&WordProgress> {
        self.words_learned.iter().find(|w| w.word_id() == word_id)
    }

    pub(crate) fn word_mut(&mut self, word_id: &str) -> Option<&mut WordProgress> {
        self.words_learned.iter_mut().find(|w| w.word_id() == word_id)
    }

    pub fn is_scenario_completed(&self, scenario_id: &str) -> bool {
        self.scenarios_completed.iter().any(|id| id == scenario_id)
    }

    /// Number of words that reached the final level
    pub fn mastered_count(&self) -> usize {
        self.words_learned.iter().filter(|w| w.mastery_level.is_mastered()).count()
    }
}

/// Derived figures for a dashboard view
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub total_xp: u32,
    pub current_streak: u32,
    pub words_total: usize,
    /// Words at or above the scenario gating threshold
    pub words_contextualized: usize,
    pub words_mastered: usize,
    pub scenarios_completed: usize,
    /// Readiness of the current scenario (0-100), if one is selected
    pub current_scenario_readiness: Option<f32>,
}
