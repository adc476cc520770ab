//! Voice options and remote synthesis request bodies

use serde::{Deserialize, Serialize};

/// Voices offered for remote pronunciation playback
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Voice {
    /// Natural, clear female voice
    #[default]
    Aria,
    /// Professional male voice
    Roger,
    /// Warm female voice
    Sarah,
    /// Clear male voice
    Brian,
    /// Friendly female voice
    Laura,
}

impl Voice {
    /// Voice identifier used in the API path
    pub fn voice_id(&self) -> &'static str {
        match self {
            Self::Aria => "Aria",
            Self::Roger => "Roger",
            Self::Sarah => "Sarah",
            Self::Brian => "Brian",
            Self::Laura => "Laura",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Aria => "Natural, clear female voice",
            Self::Roger => "Professional male voice",
            Self::Sarah => "Warm female voice",
            Self::Brian => "Clear male voice",
            Self::Laura => "Friendly female voice",
        }
    }

    /// Parse a voice name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.voice_id().eq_ignore_ascii_case(s.trim()))
    }

    pub fn all() -> &'static [Voice] {
        &[Self::Aria, Self::Roger, Self::Sarah, Self::Brian, Self::Laura]
    }
}

impl std::str::FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("Unknown voice: {}. Options: aria, roger, sarah, brian, laura", s))
    }
}

/// Voice tuning sent with each request
#[derive(Debug, Clone, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self { stability: 0.5, similarity_boost: 0.75, style: 0.0, use_speaker_boost: true }
    }
}

/// Request body for the text-to-speech endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

impl SynthesisRequest {
    /// Multilingual model, needed for Kannada script
    pub const MODEL_ID: &'static str = "eleven_multilingual_v2";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model_id: Self::MODEL_ID.to_string(),
            voice_settings: VoiceSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_voice_names() {
        assert_eq!(Voice::parse("aria"), Some(Voice::Aria));
        assert_eq!(Voice::parse("BRIAN"), Some(Voice::Brian));
        assert_eq!(Voice::parse("nobody"), None);
        assert!("laura".parse::<Voice>().is_ok());
        assert!("zed".parse::<Voice>().is_err());
    }

    #[test]
    fn request_serializes_voice_settings() {
        let request = SynthesisRequest::new("ಸರಿ");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model_id"], "eleven_multilingual_v2");
        assert_eq!(json["voice_settings"]["stability"], 0.5);
        assert_eq!(json["voice_settings"]["similarity_boost"], 0.75);
        assert_eq!(json["voice_settings"]["use_speaker_boost"], true);
        assert_eq!(json["text"], "ಸರಿ");
    }
}
