//! Voice API key management using system keyring

use keyring::Entry;

use super::error::SpeechError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "sakhi";
/// Entry name for the API key
const API_KEY_ENTRY: &str = "voice-api-key";

/// Manages the remote voice API key in the system keyring
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Get the API key from system keyring
    pub fn get_api_key() -> Result<String, SpeechError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| SpeechError::KeyringError(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => SpeechError::ApiKeyNotFound,
            _ => SpeechError::KeyringError(e.to_string()),
        })
    }

    /// Store the API key in system keyring
    pub fn set_api_key(key: &str) -> Result<(), SpeechError> {
        let key = key.trim();
        if !Self::validate_key_format(key) {
            return Err(SpeechError::InvalidApiKey);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| SpeechError::KeyringError(e.to_string()))?;

        entry.set_password(key).map_err(|e| SpeechError::KeyringError(e.to_string()))
    }

    /// Delete the stored API key
    pub fn delete_api_key() -> Result<(), SpeechError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| SpeechError::KeyringError(e.to_string()))?;

        entry.delete_credential().map_err(|e| SpeechError::KeyringError(e.to_string()))
    }

    /// Keys are opaque tokens; reject blanks and anything with whitespace
    fn validate_key_format(key: &str) -> bool {
        key.len() >= 16 && !key.chars().any(char::is_whitespace)
    }

    /// Mask an API key for display (show first and last 4 chars)
    pub fn mask_key(key: &str) -> String {
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len());
        }
        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", prefix, suffix)
    }
}
