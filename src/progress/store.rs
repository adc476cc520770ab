//! The progress store
//!
//! [`ProgressStore`] owns the learner aggregate and is the only way to mutate
//! it. Every successful mutation is written to storage before the call
//! returns, so the stored document always reflects the latest action.

use chrono::Utc;

use super::error::ProgressError;
use super::gating::{GATING_THRESHOLD, ScenarioGating};
use super::model::{
    CORRECT_ATTEMPT_XP, MAX_SCORE, ProgressSummary, SCENARIO_COMPLETION_XP, UserProgress,
    WordProgress,
};
use super::storage::Storage;
use crate::catalog::{Catalog, Scenario};

/// Single-writer owner of a learner's progress
#[derive(Debug)]
pub struct ProgressStore<S: Storage> {
    catalog: Catalog,
    storage: S,
    progress: UserProgress,
}

impl<S: Storage> ProgressStore<S> {
    /// Load stored progress, or start fresh if none can be read
    pub fn initialize(catalog: Catalog, storage: S) -> Self {
        let stored = storage.load().filter(|progress| match progress.check_catalog(&catalog) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Discarding stored progress, starting fresh: {}", e);
                false
            }
        });

        let progress = match stored {
            Some(progress) => {
                tracing::debug!("Loaded progress for {}", progress.user_id);
                progress
            }
            None => {
                tracing::info!("No usable stored progress, starting fresh");
                UserProgress::initial(&catalog)
            }
        };

        Self { catalog, storage, progress }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current snapshot of the whole aggregate
    pub fn snapshot(&self) -> &UserProgress {
        &self.progress
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Advance a word one mastery level and grant attempt XP
    pub fn record_correct_attempt(&mut self, word_id: &str) -> Result<(), ProgressError> {
        let word = self
            .progress
            .word_mut(word_id)
            .ok_or_else(|| ProgressError::WordNotFound(word_id.to_string()))?;

        word.record_correct(Utc::now());
        tracing::debug!("{} correct, now level {}", word_id, word.mastery_level);
        self.progress.total_xp = self.progress.total_xp.saturating_add(CORRECT_ATTEMPT_XP);

        self.persist()
    }

    /// Count a missed attempt; level and XP are unchanged
    pub fn record_incorrect_attempt(&mut self, word_id: &str) -> Result<(), ProgressError> {
        let word = self
            .progress
            .word_mut(word_id)
            .ok_or_else(|| ProgressError::WordNotFound(word_id.to_string()))?;

        word.record_incorrect(Utc::now());
        tracing::debug!("{} incorrect ({} misses)", word_id, word.times_incorrect);

        self.persist()
    }

    /// Overwrite the last pronunciation score for a word
    pub fn set_pronunciation_score(&mut self, word_id: &str, score: u32) -> Result<(), ProgressError> {
        let word = self
            .progress
            .word_mut(word_id)
            .ok_or_else(|| ProgressError::WordNotFound(word_id.to_string()))?;
        let score = checked_score(score)?;

        word.pronunciation_score = score;
        tracing::debug!("{} pronunciation score {}", word_id, score);

        self.persist()
    }

    /// Record a scenario completion and grant completion XP
    ///
    /// Replaying a scenario grants XP again and keeps the best score, but the
    /// id is listed only once.
    pub fn complete_scenario(&mut self, scenario_id: &str, score: u32) -> Result<(), ProgressError> {
        let scenario_id = self.known_scenario(scenario_id)?.id.clone();
        let score = checked_score(score)?;

        self.progress.total_xp = self.progress.total_xp.saturating_add(SCENARIO_COMPLETION_XP);
        if !self.progress.is_scenario_completed(&scenario_id) {
            self.progress.scenarios_completed.push(scenario_id.clone());
        }
        let best = self.progress.scenario_scores.entry(scenario_id.clone()).or_insert(score);
        *best = (*best).max(score);

        tracing::info!("Completed scenario {} with score {}", scenario_id, score);
        self.persist()
    }

    /// Make a scenario the learner's current one
    pub fn start_scenario(&mut self, scenario_id: &str) -> Result<(), ProgressError> {
        let scenario_id = self.known_scenario(scenario_id)?.id.clone();

        tracing::debug!("Current scenario is now {}", scenario_id);
        self.progress.current_scenario = Some(scenario_id);

        self.persist()
    }

    pub fn get_word_progress(&self, word_id: &str) -> Option<&WordProgress> {
        self.progress.word(word_id)
    }

    /// Prerequisite counts for a scenario, `None` if it is not in the catalog
    pub fn get_scenario_gating(&self, scenario_id: &str) -> Option<ScenarioGating> {
        let scenario = self.catalog.get_scenario(scenario_id)?;
        Some(ScenarioGating::compute(scenario, &self.progress.words_learned))
    }

    pub fn is_scenario_completed(&self, scenario_id: &str) -> bool {
        self.progress.is_scenario_completed(scenario_id)
    }

    pub fn scenario_ids_completed(&self) -> &[String] {
        &self.progress.scenarios_completed
    }

    /// Dashboard figures derived from the current snapshot
    pub fn summary(&self) -> ProgressSummary {
        let words = &self.progress.words_learned;
        let current_scenario_readiness = self
            .progress
            .current_scenario
            .as_deref()
            .and_then(|id| self.get_scenario_gating(id))
            .map(|gating| gating.readiness_percent());

        ProgressSummary {
            total_xp: self.progress.total_xp,
            current_streak: self.progress.current_streak,
            words_total: words.len(),
            words_contextualized: words
                .iter()
                .filter(|w| w.mastery_level >= GATING_THRESHOLD)
                .count(),
            words_mastered: self.progress.mastered_count(),
            scenarios_completed: self.progress.scenarios_completed.len(),
            current_scenario_readiness,
        }
    }

    /// Discard all progress and persist the fresh state
    pub fn reset_all(&mut self) -> Result<(), ProgressError> {
        self.progress = UserProgress::initial(&self.catalog);
        tracing::info!("Progress reset");
        self.persist()
    }

    fn known_scenario(&self, scenario_id: &str) -> Result<&Scenario, ProgressError> {
        self.catalog
            .get_scenario(scenario_id)
            .ok_or_else(|| ProgressError::ScenarioNotFound(scenario_id.to_string()))
    }

    fn persist(&mut self) -> Result<(), ProgressError> {
        self.storage.save(&self.progress)?;
        Ok(())
    }
}

fn checked_score(score: u32) -> Result<u8, ProgressError> {
    u8::try_from(score)
        .ok()
        .filter(|s| *s <= MAX_SCORE)
        .ok_or(ProgressError::ScoreOutOfRange(score))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::progress::model::MasteryLevel;
    use crate::progress::storage::MemoryStorage;

    fn fresh_store() -> ProgressStore<MemoryStorage> {
        ProgressStore::initialize(Catalog::builtin(), MemoryStorage::new())
    }

    fn level(store: &ProgressStore<MemoryStorage>, word_id: &str) -> u8 {
        store.get_word_progress(word_id).unwrap().mastery_level.value()
    }

    #[test]
    fn fresh_store_starts_at_zero() {
        let store = fresh_store();
        assert_eq!(store.snapshot(), &UserProgress::initial(&Catalog::builtin()));
    }

    #[test]
    fn correct_attempt_advances_level_and_xp() {
        let mut store = fresh_store();
        store.record_correct_attempt("price_inquiry").unwrap();

        let word = store.get_word_progress("price_inquiry").unwrap();
        assert_eq!(word.mastery_level.value(), 1);
        assert_eq!(word.times_correct, 1);
        assert!(word.last_practiced.is_some());
        assert_eq!(store.snapshot().total_xp, 10);
    }

    #[test]
    fn incorrect_attempt_leaves_level_and_xp() {
        let mut store = fresh_store();
        store.record_correct_attempt("okay_agreed").unwrap();
        store.record_incorrect_attempt("okay_agreed").unwrap();
        store.record_incorrect_attempt("okay_agreed").unwrap();

        let word = store.get_word_progress("okay_agreed").unwrap();
        assert_eq!(word.mastery_level.value(), 1);
        assert_eq!(word.times_incorrect, 2);
        assert_eq!(store.snapshot().total_xp, 10);
    }

    #[test]
    fn unknown_word_is_not_found_and_not_persisted() {
        let mut store = fresh_store();
        let err = store.record_correct_attempt("no_such_word").unwrap_err();

        assert!(err.is_not_found());
        assert!(store.record_incorrect_attempt("no_such_word").unwrap_err().is_not_found());
        assert!(store.set_pronunciation_score("no_such_word", 50).unwrap_err().is_not_found());
        assert_eq!(store.snapshot().total_xp, 0);
        assert_eq!(store.storage().contents(), None);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut store = fresh_store();
        store.record_correct_attempt("reduce_please").unwrap();

        assert_eq!(store.storage().load().as_ref(), Some(store.snapshot()));

        store.complete_scenario("auto_negotiation", 90).unwrap();
        assert_eq!(store.storage().load().as_ref(), Some(store.snapshot()));
    }

    #[test]
    fn pronunciation_score_is_last_write_wins() {
        let mut store = fresh_store();
        store.set_pronunciation_score("meter_please", 80).unwrap();
        store.set_pronunciation_score("meter_please", 35).unwrap();

        assert_eq!(store.get_word_progress("meter_please").unwrap().pronunciation_score, 35);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let mut store = fresh_store();
        store.set_pronunciation_score("meter_please", 40).unwrap();

        let err = store.set_pronunciation_score("meter_please", 101).unwrap_err();
        assert!(matches!(err, ProgressError::ScoreOutOfRange(101)));
        assert!(matches!(
            store.complete_scenario("auto_negotiation", 1000),
            Err(ProgressError::ScoreOutOfRange(1000))
        ));
        assert_eq!(store.get_word_progress("meter_please").unwrap().pronunciation_score, 40);
        assert_eq!(store.snapshot().total_xp, 0);
    }

    #[test]
    fn correct_attempt_then_completion_yields_110_xp() {
        let mut store = fresh_store();
        store.record_correct_attempt("too_expensive").unwrap();
        store.complete_scenario("auto_negotiation", 70).unwrap();

        assert_eq!(store.snapshot().total_xp, 110);
    }

    #[test]
    fn replayed_scenario_is_listed_once_with_best_score() {
        let mut store = fresh_store();
        store.complete_scenario("auto_negotiation", 70).unwrap();
        store.complete_scenario("auto_negotiation", 95).unwrap();
        store.complete_scenario("auto_negotiation", 60).unwrap();

        assert_eq!(store.scenario_ids_completed(), ["auto_negotiation".to_string()]);
        assert_eq!(store.snapshot().scenario_scores["auto_negotiation"], 95);
        assert_eq!(store.snapshot().total_xp, 300);
        assert!(store.is_scenario_completed("auto_negotiation"));
    }

    #[test]
    fn unknown_scenario_is_not_found() {
        let mut store = fresh_store();
        assert!(store.complete_scenario("moon_landing", 50).unwrap_err().is_not_found());
        assert!(store.start_scenario("moon_landing").unwrap_err().is_not_found());
        assert!(store.get_scenario_gating("moon_landing").is_none());
        assert_eq!(store.snapshot().total_xp, 0);
    }

    #[test]
    fn start_scenario_sets_current() {
        let mut store = fresh_store();
        store.start_scenario("market_shopping").unwrap();
        assert_eq!(store.snapshot().current_scenario.as_deref(), Some("market_shopping"));
    }

    #[test]
    fn gating_for_scenario_without_prerequisites_is_complete() {
        let store = fresh_store();
        let gating = store.get_scenario_gating("restaurant_ordering").unwrap();

        assert!(gating.prerequisites_complete);
        assert_eq!(gating.total_prerequisite_words, 0);
    }

    #[test]
    fn gating_tracks_prerequisite_levels() {
        let mut store = fresh_store();
        for _ in 0..5 {
            store.record_correct_attempt("price_inquiry").unwrap();
            store.record_correct_attempt("too_expensive").unwrap();
        }
        // not a prerequisite of auto_negotiation
        for _ in 0..7 {
            store.record_correct_attempt("meter_please").unwrap();
        }

        let gating = store.get_scenario_gating("auto_negotiation").unwrap();
        assert_eq!(gating.words_at_required_level, 2);
        assert_eq!(gating.total_prerequisite_words, 5);
        assert!(!gating.prerequisites_complete);
    }

    #[test]
    fn summary_reports_dashboard_figures() {
        let mut store = fresh_store();
        for _ in 0..7 {
            store.record_correct_attempt("price_inquiry").unwrap();
        }
        for _ in 0..5 {
            store.record_correct_attempt("okay_agreed").unwrap();
        }

        let summary = store.summary();
        assert_eq!(summary.total_xp, 120);
        assert_eq!(summary.words_total, 6);
        assert_eq!(summary.words_contextualized, 2);
        assert_eq!(summary.words_mastered, 1);
        assert_eq!(summary.current_scenario_readiness, Some(40.0));
    }

    #[test]
    fn reset_restores_initial_state_and_persists() {
        let mut store = fresh_store();
        store.record_correct_attempt("price_inquiry").unwrap();
        store.complete_scenario("auto_negotiation", 80).unwrap();
        store.start_scenario("market_shopping").unwrap();

        store.reset_all().unwrap();

        let initial = UserProgress::initial(&Catalog::builtin());
        assert_eq!(store.snapshot(), &initial);
        assert_eq!(store.storage().load(), Some(initial));
    }

    #[test]
    fn initialize_reloads_saved_state() {
        let mut store = fresh_store();
        store.record_correct_attempt("reduce_please").unwrap();
        store.set_pronunciation_score("reduce_please", 77).unwrap();
        let saved = store.storage().clone();

        let reloaded = ProgressStore::initialize(Catalog::builtin(), saved);
        assert_eq!(reloaded.snapshot(), store.snapshot());
    }

    #[test]
    fn initialize_with_corrupt_document_starts_fresh() {
        let storage = MemoryStorage::with_contents(r#"{"version":1,"progress":{"totalXP":"lots"}}"#);
        let store = ProgressStore::initialize(Catalog::builtin(), storage);

        assert_eq!(store.snapshot(), &UserProgress::initial(&Catalog::builtin()));
        assert!(
            store
                .snapshot()
                .words_learned
                .iter()
                .all(|w| w.mastery_level == MasteryLevel::UNKNOWN)
        );
    }

    #[test]
    fn initialize_with_words_missing_starts_fresh() {
        let mut stale = UserProgress::initial(&Catalog::builtin());
        stale.total_xp = 500;
        stale.words_learned.clear();
        let mut storage = MemoryStorage::new();
        storage.save(&stale).unwrap();

        let mut store = ProgressStore::initialize(Catalog::builtin(), storage);

        assert_eq!(store.snapshot(), &UserProgress::initial(&Catalog::builtin()));
        let gating = store.get_scenario_gating("auto_negotiation").unwrap();
        assert_eq!(gating.total_prerequisite_words, 5);
        assert!(!gating.prerequisites_complete);
        assert!(store.record_correct_attempt("price_inquiry").is_ok());
    }

    #[test]
    fn initialize_with_unknown_word_starts_fresh() {
        let catalog = Catalog::builtin();
        let mut stale = UserProgress::initial(&catalog);
        stale.words_learned[0].item.word_id = "retired_phrase".to_string();
        let mut storage = MemoryStorage::new();
        storage.save(&stale).unwrap();

        let store = ProgressStore::initialize(catalog.clone(), storage);
        assert_eq!(store.snapshot(), &UserProgress::initial(&catalog));
    }

    proptest! {
        #[test]
        fn k_correct_attempts_reach_min_k_7(k in 0usize..20) {
            let mut store = fresh_store();
            for _ in 0..k {
                store.record_correct_attempt("forum_to_koramangala").unwrap();
            }

            let word = store.get_word_progress("forum_to_koramangala").unwrap();
            prop_assert_eq!(level(&store, "forum_to_koramangala") as usize, k.min(7));
            prop_assert_eq!(word.times_correct as usize, k);
            prop_assert_eq!(store.snapshot().total_xp as usize, k * 10);
        }

        #[test]
        fn incorrect_attempts_never_change_level_or_xp(correct in 0usize..10, misses in 1usize..10) {
            let mut store = fresh_store();
            for _ in 0..correct {
                store.record_correct_attempt("okay_agreed").unwrap();
            }
            let before_level = level(&store, "okay_agreed");
            let before_xp = store.snapshot().total_xp;

            for _ in 0..misses {
                store.record_incorrect_attempt("okay_agreed").unwrap();
            }

            prop_assert_eq!(level(&store, "okay_agreed"), before_level);
            prop_assert_eq!(store.snapshot().total_xp, before_xp);
            prop_assert_eq!(
                store.get_word_progress("okay_agreed").unwrap().times_incorrect as usize,
                misses
            );
        }
    }
}
