//! Error types for progress tracking and persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by progress store operations
#[derive(Debug, Error)]
pub enum ProgressError {
    /// No progress entry exists for the word
    #[error("Unknown word: {0}")]
    WordNotFound(String),

    /// The scenario is not in the catalog
    #[error("Unknown scenario: {0}")]
    ScenarioNotFound(String),

    /// A score outside 0-100 was supplied
    #[error("Score {0} is out of range (expected 0-100)")]
    ScoreOutOfRange(u32),

    /// The mutation was applied in memory but could not be written
    #[error("Failed to persist progress: {0}")]
    Storage(#[from] StorageError),
}

impl ProgressError {
    /// Check if this error only signals a stale or unknown id
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProgressError::WordNotFound(_) | ProgressError::ScenarioNotFound(_))
    }

    /// Check if retrying the same call could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProgressError::Storage(StorageError::Io { .. }))
    }
}

/// Errors raised while reading or writing the stored progress document
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Progress could not be encoded
    #[error("Failed to serialize progress: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Stored document is not valid progress JSON
    #[error("Stored progress is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Stored document carries no version tag or an unknown one
    #[error("Unsupported progress document version: {found:?}")]
    UnsupportedVersion {
        /// Version found in the document, if any
        found: Option<u32>,
    },
}

/// Stored word entries that do not line up with the catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogMismatch {
    /// A catalog word has no progress entry
    #[error("no progress entry for catalog word {0}")]
    MissingWord(String),

    /// A progress entry names a word the catalog does not define
    #[error("progress entry for unknown word {0}")]
    UnknownWord(String),

    /// A word has more than one progress entry
    #[error("duplicate progress entries for word {0}")]
    DuplicateWord(String),
}

/// A mastery level outside 0-7
#[derive(Debug, Error)]
#[error("Mastery level {0} exceeds the maximum of 7")]
pub struct InvalidMasteryLevel(pub u8);
