//! Pronunciation playback
//!
//! Plays target-language text through a remote voice API when a key is
//! configured, falling back to a local synthesizer otherwise. Playback never
//! touches learner progress.

pub mod auth;
pub mod client;
pub mod error;
pub mod local;
pub mod models;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use auth::ApiKeyManager;
pub use client::ElevenLabsClient;
pub use error::SpeechError;
pub use local::{AudioPlayer, LocalVoice};
pub use models::Voice;

/// Speech settings stored in the application config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Remote voice
    #[serde(default)]
    pub voice: Voice,

    /// Speaking rate for the local synthesizer (1.0 = normal)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Local synthesizer program
    #[serde(default = "default_local_program")]
    pub local_program: String,

    /// Language code passed to the local synthesizer
    #[serde(default = "default_language")]
    pub language: String,

    /// Command used to play downloaded audio
    #[serde(default = "default_player")]
    pub player: String,
}

fn default_speed() -> f32 {
    0.8
}

fn default_local_program() -> String {
    "espeak-ng".to_string()
}

fn default_language() -> String {
    "kn".to_string()
}

fn default_player() -> String {
    "mpv --really-quiet --no-video".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            speed: default_speed(),
            local_program: default_local_program(),
            language: default_language(),
            player: default_player(),
        }
    }
}

/// Slowest and fastest accepted speaking rates
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.25..=2.0;

/// Phrase used to check audio output
pub const TEST_PHRASE: &str = "ಎಷ್ಟು ಆಗುತ್ತೆ?";

/// Which path ended up playing the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Remote,
    Local,
}

/// Normalize text before synthesis
pub fn clean_text(text: &str) -> String {
    text.replace('।', ".").trim().to_string()
}

/// Plays pronunciations, remote first with local fallback
pub struct Speaker {
    voice: Voice,
    remote: Option<ElevenLabsClient>,
    local: LocalVoice,
    player: AudioPlayer,
    audio_dir: PathBuf,
}

impl Speaker {
    /// Create a speaker; without an API key only the local voice is used
    pub fn new(config: &SpeechConfig, api_key: Option<String>, audio_dir: PathBuf) -> Self {
        let remote = api_key.and_then(|key| match ElevenLabsClient::new(key) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Remote voice unavailable: {}", e);
                None
            }
        });

        Self {
            voice: config.voice,
            remote,
            local: LocalVoice::new(&config.local_program, &config.language, config.speed),
            player: AudioPlayer::new(&config.player),
            audio_dir,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn set_voice(&mut self, voice: Voice) {
        self.voice = voice;
    }

    /// Change the local speaking rate
    pub fn set_speed(&mut self, speed: f32) {
        self.local.set_speed(speed);
    }

    /// Play `text`, reporting which path succeeded
    pub async fn speak(&self, text: &str) -> Result<Playback, SpeechError> {
        let text = clean_text(text);
        tracing::info!("Playing pronunciation for: {}", text);

        if let Some(client) = &self.remote {
            match self.speak_remote(client, &text).await {
                Ok(()) => return Ok(Playback::Remote),
                Err(e) if e.requires_reauth() => {
                    tracing::warn!("Remote voice rejected the API key, using local voice: {}", e);
                    tracing::warn!("Store a new key with `sakhi voice-key <key>`");
                }
                Err(e) => tracing::warn!("Remote voice failed, using local voice: {}", e),
            }
        }

        match self.local.speak(&text).await {
            Ok(()) => Ok(Playback::Local),
            Err(e) => {
                tracing::error!("Local voice failed: {}", e);
                Err(SpeechError::Unavailable)
            }
        }
    }

    async fn speak_remote(&self, client: &ElevenLabsClient, text: &str) -> Result<(), SpeechError> {
        let audio = client.synthesize(self.voice, text).await?;

        tokio::fs::create_dir_all(&self.audio_dir).await?;
        let path = self.audio_dir.join("pronunciation.mp3");
        tokio::fs::write(&path, audio).await?;

        self.player.play(&path).await
    }
}
