//! Plain-text views of the progress snapshot

use crate::catalog::Scenario;
use crate::progress::{ProgressSummary, ScenarioGating, WordProgress};

/// Accuracy label, guarded for words with no attempts
pub fn accuracy_label(word: &WordProgress) -> String {
    match word.accuracy() {
        Some(percent) => format!("{:.0}% accuracy", percent),
        None => "no attempts yet".to_string(),
    }
}

pub fn word_line(word: &WordProgress) -> String {
    format!(
        "{:<22} {:<28} {:<32} level {} {:.0}% | {}",
        word.word_id(),
        word.item.kannada,
        word.item.pronunciation,
        word.mastery_level,
        word.mastery_percent(),
        accuracy_label(word)
    )
}

pub fn words_table(words: &[WordProgress]) -> String {
    words.iter().map(word_line).collect::<Vec<_>>().join("\n")
}

pub fn gating_line(gating: &ScenarioGating) -> String {
    format!(
        "{}/{} prerequisite words ready{}",
        gating.words_at_required_level,
        gating.total_prerequisite_words,
        if gating.prerequisites_complete { " (ready)" } else { "" }
    )
}

pub fn scenario_line(scenario: &Scenario, gating: &ScenarioGating, completed: bool) -> String {
    let mut line = format!(
        "{:<20} {} [{}, {} min] {}",
        scenario.id,
        scenario.title,
        scenario.difficulty,
        scenario.estimated_minutes,
        gating_line(gating)
    );
    if !scenario.unlocked {
        line.push_str(" locked");
    }
    if completed {
        line.push_str(" completed");
    }
    line
}

pub fn summary(summary: &ProgressSummary, current_scenario: Option<&str>) -> String {
    let mut lines = vec![
        format!("{} XP, {} day streak", summary.total_xp, summary.current_streak),
        format!(
            "{}/{} words contextualized, {} mastered",
            summary.words_contextualized, summary.words_total, summary.words_mastered
        ),
        format!("{} scenarios completed", summary.scenarios_completed),
    ];
    if let (Some(id), Some(readiness)) = (current_scenario, summary.current_scenario_readiness) {
        lines.push(format!("current scenario {}: {:.0}% ready", id, readiness));
    }
    lines.join("\n")
}
