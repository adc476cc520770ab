//! Persistence of the progress document
//!
//! The document is a versioned JSON envelope holding the whole
//! [`UserProgress`] aggregate. Loading never fails: unreadable, malformed or
//! wrongly versioned documents are logged and reported as absent so callers
//! fall back to fresh state.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::error::StorageError;
use super::model::UserProgress;

/// Version tag written into every progress document
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    progress: &'a UserProgress,
}

#[derive(Deserialize)]
struct VersionTag {
    version: Option<u32>,
}

#[derive(Deserialize)]
struct StoredEnvelope {
    progress: UserProgress,
}

/// Serialize progress into a versioned document
pub fn encode(progress: &UserProgress) -> Result<String, StorageError> {
    serde_json::to_string_pretty(&Envelope { version: SCHEMA_VERSION, progress })
        .map_err(StorageError::Serialize)
}

/// Parse a versioned document
pub fn decode(contents: &str) -> Result<UserProgress, StorageError> {
    let tag: VersionTag = serde_json::from_str(contents).map_err(StorageError::Malformed)?;
    if tag.version != Some(SCHEMA_VERSION) {
        return Err(StorageError::UnsupportedVersion { found: tag.version });
    }

    let envelope: StoredEnvelope =
        serde_json::from_str(contents).map_err(StorageError::Malformed)?;
    Ok(envelope.progress)
}

/// A durable slot holding one progress document
pub trait Storage {
    /// Read the raw stored document, `None` if nothing has been stored
    fn read_raw(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored document; readers never observe a partial write
    fn write_raw(&mut self, contents: &str) -> Result<(), StorageError>;

    /// Save a progress snapshot
    fn save(&mut self, progress: &UserProgress) -> Result<(), StorageError> {
        let contents = encode(progress)?;
        self.write_raw(&contents)
    }

    /// Load the stored snapshot, treating any failure as absent
    fn load(&self) -> Option<UserProgress> {
        let contents = match self.read_raw() {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read stored progress, starting fresh: {}", e);
                return None;
            }
        };

        match decode(&contents) {
            Ok(progress) => Some(progress),
            Err(e) => {
                tracing::warn!("Discarding stored progress, starting fresh: {}", e);
                None
            }
        }
    }
}

/// Progress stored in a JSON file, replaced atomically on save
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl Storage for FileStorage {
    fn read_raw(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_raw(&mut self, contents: &str) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| self.io_error(e))?;

        let mut temp_file = NamedTempFile::new_in(&parent).map_err(|e| self.io_error(e))?;
        temp_file.write_all(contents.as_bytes()).map_err(|e| self.io_error(e))?;
        temp_file.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp_file.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        tracing::debug!("Saved progress to {:?}", self.path);
        Ok(())
    }
}

/// In-memory slot, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-existing document
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self { contents: Some(contents.into()) }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn read_raw(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn write_raw(&mut self, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}
