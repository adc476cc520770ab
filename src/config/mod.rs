//! Configuration management for Sakhi

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::speech::SpeechConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pronunciation playback settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Override for the progress file location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `config_path`, writing defaults if it is missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to `config_path`
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "sakhi").context("Failed to determine application directories")
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Directory for downloaded pronunciation audio
    pub fn audio_cache_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.cache_dir().join("audio"))
    }

    /// Where learner progress is stored
    pub fn progress_path(&self) -> Result<PathBuf> {
        match &self.progress_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("progress.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::Voice;

    #[test]
    fn default_config_uses_default_voice() {
        let config = Config::default();
        assert_eq!(config.speech.voice, Voice::Aria);
        assert!(config.progress_file.is_none());
    }

    #[test]
    fn config_serializes_to_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("espeak-ng"));
        assert!(!json.contains("progress_file"));
    }

    #[test]
    fn config_deserializes_partial_json() {
        let json = r#"{"speech":{"voice":"Brian","speed":1.2}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.speech.voice, Voice::Brian);
        assert_eq!(config.speech.speed, 1.2);
        assert_eq!(config.speech.language, "kn");
    }

    #[test]
    fn load_from_creates_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sakhi").join("config.json");

        let mut config = Config::load_from(&path).unwrap();
        assert!(path.exists());

        config.speech.voice = Voice::Laura;
        config.speech.speed = 1.1;
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.speech.voice, Voice::Laura);
        assert_eq!(reloaded.speech.speed, 1.1);
    }

    #[test]
    fn progress_file_override_is_used() {
        let config = Config {
            progress_file: Some(PathBuf::from("/tmp/sakhi/progress.json")),
            ..Config::default()
        };
        assert_eq!(config.progress_path().unwrap(), PathBuf::from("/tmp/sakhi/progress.json"));
    }
}
