//! Guided practice for one word: introduction, recognition, then typing
//!
//! The typing check decides whether the attempt counts as correct; the
//! recognition round is feedback only.

use anyhow::Result;
use rand::Rng;
use rand::seq::SliceRandom;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};

use crate::catalog::VocabularyItem;

/// Wrong answers mixed into the recognition round
const DISTRACTORS: [&str; 3] = ["Where are you going?", "Stop here please", "Turn left"];

/// Shuffled meanings for the recognition round, exactly one of them correct
pub fn recognition_options<R: Rng + ?Sized>(item: &VocabularyItem, rng: &mut R) -> Vec<String> {
    let mut options = vec![item.english.clone()];
    options.extend(DISTRACTORS.iter().filter(|d| **d != item.english).map(|d| d.to_string()));
    options.shuffle(rng);
    options
}

/// Check a 1-based menu choice against the word's meaning
pub fn check_recognition(item: &VocabularyItem, options: &[String], choice: &str) -> bool {
    choice
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| options.get(index))
        .is_some_and(|option| *option == item.english)
}

/// Check a typed answer against the target-language text
pub fn check_typed_answer(item: &VocabularyItem, answer: &str) -> bool {
    answer.trim() == item.kannada
}

/// How a practice round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeOutcome {
    /// Recognition and typing rounds were answered; `correct` is the typing result
    Finished { recognized: bool, correct: bool },
    /// Input ended before the rounds were answered
    Abandoned,
}

/// Run the three rounds, prompting on `out` and reading answers from `lines`
pub async fn run<R, W, G>(
    item: &VocabularyItem,
    lines: &mut Lines<R>,
    out: &mut W,
    rng: &mut G,
) -> Result<PracticeOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    G: Rng + ?Sized,
{
    let intro = format!(
        "{}  ({})\nmeans \"{}\"\n\nWhat does {} mean?\n",
        item.kannada, item.pronunciation, item.english, item.kannada
    );
    out.write_all(intro.as_bytes()).await?;

    let options = recognition_options(item, rng);
    for (i, option) in options.iter().enumerate() {
        out.write_all(format!("  {}. {}\n", i + 1, option).as_bytes()).await?;
    }
    out.write_all(b"choice> ").await?;
    out.flush().await?;

    let Some(choice) = lines.next_line().await? else {
        return Ok(PracticeOutcome::Abandoned);
    };
    let recognized = check_recognition(item, &options, &choice);
    let feedback = if recognized {
        "Correct!\n".to_string()
    } else {
        format!("It means \"{}\"\n", item.english)
    };
    out.write_all(feedback.as_bytes()).await?;

    let prompt = format!(
        "\nType the Kannada phrase for \"{}\" ({})\nanswer> ",
        item.english, item.pronunciation
    );
    out.write_all(prompt.as_bytes()).await?;
    out.flush().await?;

    let Some(answer) = lines.next_line().await? else {
        return Ok(PracticeOutcome::Abandoned);
    };
    let correct = check_typed_answer(item, &answer);
    let feedback = if correct {
        "Excellent! Perfect spelling!\n".to_string()
    } else {
        format!("Correct answer: {}\n", item.kannada)
    };
    out.write_all(feedback.as_bytes()).await?;
    out.flush().await?;

    Ok(PracticeOutcome::Finished { recognized, correct })
}
