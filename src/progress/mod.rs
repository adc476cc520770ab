//! Learner progress tracking
//!
//! Mastery counters, XP, completed scenarios and the scenario gating that is
//! derived from them, plus the persistence contract for the whole aggregate.

pub mod error;
pub mod gating;
pub mod model;
pub mod storage;
pub mod store;

pub use error::{CatalogMismatch, ProgressError, StorageError};
pub use gating::{GATING_THRESHOLD, ScenarioGating};
pub use model::{MasteryLevel, ProgressSummary, UserProgress, WordProgress};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::ProgressStore;
