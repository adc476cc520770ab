//! HTTP client for the remote voice API

use reqwest::Client;

use super::error::SpeechError;
use super::models::{SynthesisRequest, Voice};

/// Remote text-to-speech client
pub struct ElevenLabsClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
}

impl ElevenLabsClient {
    /// Text-to-speech endpoint, the voice id is appended
    const API_URL: &'static str = "https://api.elevenlabs.io/v1/text-to-speech/";

    /// Create a new client with the given API key
    pub fn new(api_key: String) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(std::time::Duration::from_secs(30)).build()?;

        Ok(Self { client, api_key })
    }

    fn endpoint(voice: Voice) -> String {
        format!("{}{}", Self::API_URL, voice.voice_id())
    }

    /// Synthesize `text` and return MP3 bytes
    pub async fn synthesize(&self, voice: Voice, text: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .post(Self::endpoint(voice))
            .header("accept", "audio/mpeg")
            .header("content-type", "application/json")
            .header("xi-api-key", &self.api_key)
            .json(&SynthesisRequest::new(text))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SpeechError::ApiError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::ApiError { status: status.as_u16(), message });
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}
