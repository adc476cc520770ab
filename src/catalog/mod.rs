//! Static vocabulary and scenario catalog
//!
//! The catalog is loaded once and is read-only afterwards. Lookups that miss
//! return `None`; absence is not an error at this layer.

pub mod data;
pub mod model;

pub use model::{Difficulty, Scenario, VocabularyItem};

/// The fixed universe of words and scenarios
#[derive(Debug, Clone)]
pub struct Catalog {
    words: Vec<VocabularyItem>,
    scenarios: Vec<Scenario>,
}

impl Catalog {
    /// Build a catalog from explicit definitions, keeping definition order
    pub fn new(words: Vec<VocabularyItem>, scenarios: Vec<Scenario>) -> Self {
        Self { words, scenarios }
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self::new(data::auto_negotiation_words(), data::scenarios())
    }

    /// All words in definition order
    pub fn list_words(&self) -> &[VocabularyItem] {
        &self.words
    }

    /// All scenarios in definition order
    pub fn list_scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Find a scenario by id
    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Find a word by id
    pub fn get_word(&self, word_id: &str) -> Option<&VocabularyItem> {
        self.words.iter().find(|w| w.word_id == word_id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
