//! Local speech synthesis and audio playback through external programs

use std::path::Path;

use tokio::process::Command;

use super::error::SpeechError;

/// Default speaking rate of the local synthesizer, in words per minute
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Local speech synthesizer (espeak-ng compatible command line)
#[derive(Debug, Clone)]
pub struct LocalVoice {
    program: String,
    language: String,
    speed: f32,
}

impl LocalVoice {
    pub fn new(program: impl Into<String>, language: impl Into<String>, speed: f32) -> Self {
        Self { program: program.into(), language: language.into(), speed }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn words_per_minute(&self) -> u32 {
        (BASE_WORDS_PER_MINUTE * self.speed.clamp(0.1, 3.0)).round() as u32
    }

    fn args(&self, text: &str) -> Vec<String> {
        vec![
            "-v".to_string(),
            self.language.clone(),
            "-s".to_string(),
            self.words_per_minute().to_string(),
            text.to_string(),
        ]
    }

    /// Speak `text` and wait for playback to finish
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        run(&self.program, &self.args(text)).await
    }
}

/// Plays audio files with an external player command
#[derive(Debug, Clone)]
pub struct AudioPlayer {
    command: Vec<String>,
}

impl AudioPlayer {
    /// Build from a command line such as `mpv --really-quiet`
    pub fn new(command_line: &str) -> Self {
        Self { command: command_line.split_whitespace().map(str::to_string).collect() }
    }

    pub async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        let Some((program, rest)) = self.command.split_first() else {
            return Err(SpeechError::Process {
                program: String::new(),
                message: "no audio player configured".to_string(),
            });
        };

        let mut args = rest.to_vec();
        args.push(path.display().to_string());
        run(program, &args).await
    }
}

async fn run(program: &str, args: &[String]) -> Result<(), SpeechError> {
    let output = Command::new(program).args(args).output().await.map_err(|e| {
        SpeechError::Process { program: program.to_string(), message: e.to_string() }
    })?;

    if !output.status.success() {
        return Err(SpeechError::Process {
            program: program.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
