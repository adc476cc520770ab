//! Scenario readiness derived from prerequisite word mastery

use super::model::{MasteryLevel, WordProgress};
use crate::catalog::Scenario;

/// Level a prerequisite word must reach before a scenario counts as ready
pub const GATING_THRESHOLD: MasteryLevel = MasteryLevel::CONTEXTUALIZED;

/// Prerequisite counts for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioGating {
    /// Prerequisite words at or above the threshold
    pub words_at_required_level: usize,
    /// Prerequisite words the learner has progress entries for
    pub total_prerequisite_words: usize,
    /// True when every counted prerequisite meets the threshold.
    /// Vacuously true for a scenario without prerequisites.
    pub prerequisites_complete: bool,
}

impl ScenarioGating {
    /// Derive gating for `scenario` from the learner's word entries
    pub fn compute(scenario: &Scenario, words: &[WordProgress]) -> Self {
        let mut total = 0;
        let mut ready = 0;

        for word in words.iter().filter(|w| scenario.requires(w.word_id())) {
            total += 1;
            if word.mastery_level >= GATING_THRESHOLD {
                ready += 1;
            }
        }

        Self {
            words_at_required_level: ready,
            total_prerequisite_words: total,
            prerequisites_complete: ready == total,
        }
    }

    /// Share of prerequisite words at the threshold (0-100), 0 when there are none
    pub fn readiness_percent(&self) -> f32 {
        if self.total_prerequisite_words == 0 {
            return 0.0;
        }
        self.words_at_required_level as f32 / self.total_prerequisite_words as f32 * 100.0
    }
}
