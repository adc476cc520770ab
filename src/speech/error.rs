//! Error types for pronunciation playback

use thiserror::Error;

/// Errors that can occur while playing a pronunciation
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No remote voice API key is stored
    #[error("Voice API key not configured. Run `sakhi voice-key <key>` to configure")]
    ApiKeyNotFound,

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    /// Invalid API key format
    #[error("Invalid API key format")]
    InvalidApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// A local program (synthesizer or audio player) failed
    #[error("{program} failed: {message}")]
    Process {
        /// Program that was run
        program: String,
        /// What went wrong
        message: String,
    },

    /// Could not write audio to disk
    #[error("Audio I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the remote voice nor the local synthesizer could play the text
    #[error("Could not play pronunciation. Please try again")]
    Unavailable,
}

impl SpeechError {
    /// Check if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SpeechError::RequestError(_) | SpeechError::Unavailable | SpeechError::Process { .. }
        )
    }

    /// Check if this error requires a new API key
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            SpeechError::ApiKeyNotFound
                | SpeechError::InvalidApiKey
                | SpeechError::ApiError { status: 401, .. }
        )
    }
}
