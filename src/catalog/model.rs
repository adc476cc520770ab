//! Catalog data model
//!
//! Vocabulary items and scenarios are defined once and never mutated.
//! Learner state lives in [`crate::progress`], keyed by the ids defined here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single phrase the learner can practise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    /// Unique identifier for the item
    pub word_id: String,
    /// Source-language text (English)
    pub english: String,
    /// Target-language text (Kannada script)
    pub kannada: String,
    /// Romanized pronunciation guide
    pub pronunciation: String,
}

impl VocabularyItem {
    pub fn new(word_id: &str, english: &str, kannada: &str, pronunciation: &str) -> Self {
        Self {
            word_id: word_id.to_string(),
            english: english.to_string(),
            kannada: kannada.to_string(),
            pronunciation: pronunciation.to_string(),
        }
    }
}

/// Scenario difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// A real-world situation that requires a set of vocabulary items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Unique identifier for the scenario
    pub id: String,
    /// Display title
    pub title: String,
    /// Short description
    pub description: String,
    /// Where the scenario takes place
    pub location: String,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Word ids required before the scenario is practice-ready (may be empty)
    pub prerequisite_words: Vec<String>,
    /// Estimated duration in minutes
    pub estimated_minutes: u32,
    /// Seeded by the catalog; not derived at runtime
    pub unlocked: bool,
    /// Seeded by the catalog; learner completions live in progress state
    pub completed: bool,
}

impl Scenario {
    /// Check whether a word is one of this scenario's prerequisites
    pub fn requires(&self, word_id: &str) -> bool {
        self.prerequisite_words.iter().any(|w| w == word_id)
    }
}
