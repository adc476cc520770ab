//! Application layer: executes learner commands against the progress store

pub mod command;
pub mod practice;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::progress::{FileStorage, ProgressError, ProgressStore, Storage};
use crate::speech::{
    ApiKeyManager, Playback, SPEED_RANGE, Speaker, SpeechError, TEST_PHRASE, Voice,
};
use command::{Command, HELP, ParseResult, parse_command};
use practice::PracticeOutcome;

/// Outcome of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show the learner
    Text(String),
    /// The learner asked to leave
    Quit,
}

/// The main application
pub struct App<S: Storage> {
    /// Single owner of learner progress
    store: ProgressStore<S>,

    /// Pronunciation playback
    speaker: Speaker,

    /// Settings changed from the shell are written back here
    config: Config,

    /// Where `config` is saved; `None` keeps changes in memory
    config_path: Option<PathBuf>,
}

impl App<FileStorage> {
    /// Create the application from configuration, loading stored progress
    pub fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let storage = FileStorage::new(config.progress_path()?);
        let store = ProgressStore::initialize(Catalog::builtin(), storage);

        let api_key = match ApiKeyManager::get_api_key() {
            Ok(key) => Some(key),
            Err(SpeechError::ApiKeyNotFound) => None,
            Err(e) => {
                tracing::warn!("Could not read voice API key: {}", e);
                None
            }
        };
        let speaker = Speaker::new(&config.speech, api_key, Config::audio_cache_dir()?);

        Ok(Self { store, speaker, config, config_path: Some(config_path) })
    }
}

impl<S: Storage> App<S> {
    pub fn with_parts(
        store: ProgressStore<S>,
        speaker: Speaker,
        config: Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self { store, speaker, config, config_path }
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one command
    ///
    /// Unknown ids, bad scores and failed playback become learner-facing
    /// text; only key management and config write failures are returned as
    /// errors.
    pub async fn execute(&mut self, command: Command) -> Result<Reply> {
        let text = match command {
            Command::Nop => String::new(),
            Command::Quit => return Ok(Reply::Quit),
            Command::Help => HELP.to_string(),
            Command::Words => render::words_table(&self.store.snapshot().words_learned),
            Command::Scenarios => self.scenarios_view(),
            Command::Status => {
                let snapshot = self.store.snapshot();
                render::summary(&self.store.summary(), snapshot.current_scenario.as_deref())
            }
            Command::Correct(word_id) => {
                let result = self.store.record_correct_attempt(&word_id);
                self.word_outcome(&word_id, result, "Great job! Word mastery increased")
            }
            Command::Incorrect(word_id) => {
                let result = self.store.record_incorrect_attempt(&word_id);
                self.word_outcome(&word_id, result, "Keep practising")
            }
            Command::Score(word_id, score) => {
                let result = self.store.set_pronunciation_score(&word_id, score);
                self.word_outcome(&word_id, result, "Pronunciation score saved")
            }
            Command::Start(scenario_id) => match self.store.start_scenario(&scenario_id) {
                Ok(()) => self.gating_view(&scenario_id),
                Err(e) => outcome_error(e),
            },
            Command::Complete(scenario_id, score) => {
                match self.store.complete_scenario(&scenario_id, score) {
                    Ok(()) => format!(
                        "Completed {} (+100 XP, {} XP total)",
                        scenario_id,
                        self.store.snapshot().total_xp
                    ),
                    Err(e) => outcome_error(e),
                }
            }
            Command::Gating(scenario_id) => self.gating_view(&scenario_id),
            Command::Practice(word_id) => {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                let mut stdout = tokio::io::stdout();
                self.practice(&word_id, &mut lines, &mut stdout, &mut StdRng::from_entropy())
                    .await?
            }
            Command::Speak(word_id) => self.speak(&word_id).await,
            Command::Voices => self.voices_view(),
            Command::Voice(voice) => {
                self.speaker.set_voice(voice);
                self.config.speech.voice = voice;
                self.save_config()?;
                format!("Voice set to {}", voice.voice_id())
            }
            Command::Speed(speed) => {
                if !SPEED_RANGE.contains(&speed) {
                    return Ok(Reply::Text(format!(
                        "Speed must be between {} and {}",
                        SPEED_RANGE.start(),
                        SPEED_RANGE.end()
                    )));
                }
                self.speaker.set_speed(speed);
                self.config.speech.speed = speed;
                self.save_config()?;
                format!("Speaking rate set to {}", speed)
            }
            Command::TestAudio => match self.speaker.speak(TEST_PHRASE).await {
                Ok(playback) => format!("Audio works ({})", playback_label(playback)),
                Err(e) => e.to_string(),
            },
            Command::VoiceKey(key) => {
                ApiKeyManager::set_api_key(&key).context("Failed to store voice API key")?;
                format!("Voice API key saved ({})", ApiKeyManager::mask_key(key.trim()))
            }
            Command::VoiceKeyClear => {
                ApiKeyManager::delete_api_key().context("Failed to remove voice API key")?;
                "Voice API key removed".to_string()
            }
            Command::Reset => match self.store.reset_all() {
                Ok(()) => "Progress reset".to_string(),
                Err(e) => outcome_error(e),
            },
        };

        Ok(Reply::Text(text))
    }

    /// Read commands from stdin until quit or end of input
    pub async fn run_shell(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        stdout.write_all(b"Type 'help' for commands.\n").await?;
        loop {
            stdout.write_all(b"sakhi> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            // Practice reads its answers from the shell's own input
            let result = match parse_command(&line) {
                ParseResult::Ok(Command::Practice(word_id)) => self
                    .practice(&word_id, &mut lines, &mut stdout, &mut StdRng::from_entropy())
                    .await
                    .map(Reply::Text),
                ParseResult::Ok(command) => self.execute(command).await,
                ParseResult::UnknownCommand(cmd) => {
                    Ok(Reply::Text(format!("Unknown command: {}", cmd)))
                }
                ParseResult::MissingArgument(cmd) => {
                    Ok(Reply::Text(format!("{} needs an argument", cmd)))
                }
                ParseResult::InvalidArgument(message) => Ok(Reply::Text(message)),
            };

            let text = match result {
                Ok(Reply::Quit) => break,
                Ok(Reply::Text(text)) => text,
                Err(e) => {
                    tracing::error!("Command failed: {:#}", e);
                    format!("Error: {:#}", e)
                }
            };

            if !text.is_empty() {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
        }

        Ok(())
    }

    /// Practice one word, recording the typed answer as a correct or missed attempt
    pub async fn practice<R, W, G>(
        &mut self,
        word_id: &str,
        lines: &mut Lines<R>,
        out: &mut W,
        rng: &mut G,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        G: Rng + ?Sized,
    {
        let Some(word) = self.store.get_word_progress(word_id) else {
            return Ok(ProgressError::WordNotFound(word_id.to_string()).to_string());
        };
        let item = word.item.clone();

        let text = match practice::run(&item, lines, out, rng).await? {
            PracticeOutcome::Finished { correct: true, .. } => {
                let result = self.store.record_correct_attempt(word_id);
                self.word_outcome(word_id, result, "Great job! Word mastery increased")
            }
            PracticeOutcome::Finished { correct: false, .. } => {
                let result = self.store.record_incorrect_attempt(word_id);
                self.word_outcome(word_id, result, "Keep practising")
            }
            PracticeOutcome::Abandoned => "Practice cancelled".to_string(),
        };
        Ok(text)
    }

    fn save_config(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => Ok(()),
        }
    }

    fn voices_view(&self) -> String {
        let current = self.speaker.voice();
        let mut lines: Vec<String> = Voice::all()
            .iter()
            .map(|voice| {
                let marker = if *voice == current { "*" } else { " " };
                format!("{} {:<6} {}", marker, voice.voice_id(), voice.description())
            })
            .collect();
        lines.push(if self.speaker.has_remote() {
            "Remote voice configured".to_string()
        } else {
            "No voice API key stored, pronunciations use the local voice".to_string()
        });
        lines.join("\n")
    }

    fn scenarios_view(&self) -> String {
        self.store
            .catalog()
            .list_scenarios()
            .iter()
            .filter_map(|scenario| {
                let gating = self.store.get_scenario_gating(&scenario.id)?;
                let completed = self.store.is_scenario_completed(&scenario.id);
                Some(render::scenario_line(scenario, &gating, completed))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn gating_view(&self, scenario_id: &str) -> String {
        match self.store.get_scenario_gating(scenario_id) {
            Some(gating) => format!("{}: {}", scenario_id, render::gating_line(&gating)),
            None => ProgressError::ScenarioNotFound(scenario_id.to_string()).to_string(),
        }
    }

    fn word_outcome(
        &self,
        word_id: &str,
        result: Result<(), ProgressError>,
        success: &str,
    ) -> String {
        match (result, self.store.get_word_progress(word_id)) {
            (Ok(()), Some(word)) => format!("{}\n{}", success, render::word_line(word)),
            (Ok(()), None) => success.to_string(),
            (Err(e), _) => outcome_error(e),
        }
    }

    async fn speak(&self, word_id: &str) -> String {
        let Some(word) = self.store.get_word_progress(word_id) else {
            return ProgressError::WordNotFound(word_id.to_string()).to_string();
        };

        match self.speaker.speak(&word.item.kannada).await {
            Ok(playback) => {
                format!("Played {} ({})", word.item.pronunciation, playback_label(playback))
            }
            Err(e) => e.to_string(),
        }
    }
}

fn playback_label(playback: Playback) -> &'static str {
    match playback {
        Playback::Remote => "remote voice",
        Playback::Local => "local voice",
    }
}

/// Learner-facing text for a failed store operation
fn outcome_error(err: ProgressError) -> String {
    let ProgressError::Storage(e) = &err else {
        return err.to_string();
    };

    tracing::error!("Progress not saved: {}", e);
    if err.is_recoverable() {
        format!("{}. Your progress is kept and will be saved with your next change", err)
    } else {
        format!("{}. Your progress is kept for this session", err)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::progress::{MemoryStorage, StorageError};

    fn config() -> Config {
        let mut config = Config::default();
        config.speech.local_program = "sakhi-no-such-synth".to_string();
        config
    }

    fn app_with_config_path(config_path: Option<PathBuf>) -> App<MemoryStorage> {
        let store = ProgressStore::initialize(Catalog::builtin(), MemoryStorage::new());
        let config = config();
        let speaker = Speaker::new(&config.speech, None, std::env::temp_dir());
        App::with_parts(store, speaker, config, config_path)
    }

    fn app() -> App<MemoryStorage> {
        app_with_config_path(None)
    }

    async fn practice_with_input(
        app: &mut App<MemoryStorage>,
        word_id: &str,
        input: &str,
    ) -> String {
        let mut lines = BufReader::new(input.as_bytes()).lines();
        let mut out = Vec::new();
        app.practice(word_id, &mut lines, &mut out, &mut StdRng::seed_from_u64(7)).await.unwrap()
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn correct_command_updates_store() {
        let mut app = app();
        let reply = text(app.execute(Command::Correct("okay_agreed".into())).await.unwrap());

        assert!(reply.starts_with("Great job!"));
        assert_eq!(app.store().snapshot().total_xp, 10);
    }

    #[tokio::test]
    async fn unknown_word_is_reported_not_raised() {
        let mut app = app();
        let reply = text(app.execute(Command::Incorrect("ghost".into())).await.unwrap());
        assert_eq!(reply, "Unknown word: ghost");
    }

    #[tokio::test]
    async fn out_of_range_score_is_reported() {
        let mut app = app();
        let reply = text(app.execute(Command::Score("okay_agreed".into(), 150)).await.unwrap());
        assert_eq!(reply, "Score 150 is out of range (expected 0-100)");
    }

    #[tokio::test]
    async fn complete_reports_total_xp() {
        let mut app = app();
        app.execute(Command::Correct("okay_agreed".into())).await.unwrap();
        let reply =
            text(app.execute(Command::Complete("auto_negotiation".into(), 80)).await.unwrap());
        assert_eq!(reply, "Completed auto_negotiation (+100 XP, 110 XP total)");
    }

    #[tokio::test]
    async fn gating_for_unknown_scenario_is_reported() {
        let mut app = app();
        let reply = text(app.execute(Command::Gating("moon".into())).await.unwrap());
        assert_eq!(reply, "Unknown scenario: moon");
    }

    #[tokio::test]
    async fn scenarios_view_lists_catalog() {
        let mut app = app();
        let reply = text(app.execute(Command::Scenarios).await.unwrap());
        assert_eq!(reply.lines().count(), 3);
        assert!(reply.contains("restaurant_ordering"));
    }

    #[tokio::test]
    async fn failed_playback_is_a_retry_notice() {
        let mut app = app();
        let reply = text(app.execute(Command::Speak("okay_agreed".into())).await.unwrap());
        assert_eq!(reply, "Could not play pronunciation. Please try again");
    }

    #[tokio::test]
    async fn practice_with_correct_spelling_records_correct_attempt() {
        let mut app = app();
        let reply = practice_with_input(&mut app, "okay_agreed", "1\nಸರಿ\n").await;

        assert!(reply.starts_with("Great job!"));
        let word = app.store().get_word_progress("okay_agreed").unwrap();
        assert_eq!(word.times_correct, 1);
        assert_eq!(word.mastery_level.value(), 1);
        assert_eq!(app.store().snapshot().total_xp, 10);
    }

    #[tokio::test]
    async fn practice_with_wrong_spelling_records_missed_attempt() {
        let mut app = app();
        let reply = practice_with_input(&mut app, "okay_agreed", "1\nsari\n").await;

        assert!(reply.starts_with("Keep practising"));
        let word = app.store().get_word_progress("okay_agreed").unwrap();
        assert_eq!(word.times_incorrect, 1);
        assert_eq!(app.store().snapshot().total_xp, 0);
    }

    #[tokio::test]
    async fn abandoned_practice_records_nothing() {
        let mut app = app();
        let reply = practice_with_input(&mut app, "okay_agreed", "").await;

        assert_eq!(reply, "Practice cancelled");
        assert_eq!(app.store().get_word_progress("okay_agreed").unwrap().attempts(), 0);
    }

    #[tokio::test]
    async fn practice_unknown_word_is_reported() {
        let mut app = app();
        assert_eq!(practice_with_input(&mut app, "ghost", "").await, "Unknown word: ghost");
    }

    #[tokio::test]
    async fn voices_marks_current_voice() {
        let mut app = app();
        let reply = text(app.execute(Command::Voices).await.unwrap());

        assert!(reply.lines().any(|l| l.starts_with("* Aria")));
        assert!(reply.contains("Friendly female voice"));
        assert!(reply.ends_with("pronunciations use the local voice"));
    }

    #[tokio::test]
    async fn voice_choice_is_saved_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = app_with_config_path(Some(path.clone()));

        let reply = text(app.execute(Command::Voice(Voice::Brian)).await.unwrap());
        assert_eq!(reply, "Voice set to Brian");
        assert_eq!(app.config().speech.voice, Voice::Brian);

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.speech.voice, Voice::Brian);
        assert!(text(app.execute(Command::Voices).await.unwrap()).contains("* Brian"));
    }

    #[tokio::test]
    async fn speed_is_range_checked_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = app_with_config_path(Some(path.clone()));

        let reply = text(app.execute(Command::Speed(5.0)).await.unwrap());
        assert_eq!(reply, "Speed must be between 0.25 and 2");
        assert!(!path.exists());

        let reply = text(app.execute(Command::Speed(1.5)).await.unwrap());
        assert_eq!(reply, "Speaking rate set to 1.5");
        assert_eq!(Config::load_from(&path).unwrap().speech.speed, 1.5);
    }

    #[tokio::test]
    async fn test_audio_without_synthesizer_is_a_retry_notice() {
        let mut app = app();
        let reply = text(app.execute(Command::TestAudio).await.unwrap());
        assert_eq!(reply, "Could not play pronunciation. Please try again");
    }

    #[test]
    fn io_failure_promises_a_later_save() {
        let err = ProgressError::Storage(StorageError::Io {
            path: PathBuf::from("/read-only/progress.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(outcome_error(err).ends_with("will be saved with your next change"));
        assert_eq!(
            outcome_error(ProgressError::ScoreOutOfRange(101)),
            "Score 101 is out of range (expected 0-100)"
        );
    }

    #[tokio::test]
    async fn quit_ends_session() {
        let mut app = app();
        assert_eq!(app.execute(Command::Quit).await.unwrap(), Reply::Quit);
    }
}
