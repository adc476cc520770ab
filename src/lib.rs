//! Sakhi - scenario-driven Kannada vocabulary practice
//!
//! Learners build mastery of everyday phrases and unlock real-world
//! scenarios once the phrases they need are known well enough. Progress is
//! tracked per word and persisted after every action.

pub mod app;
pub mod catalog;
pub mod config;
pub mod progress;
pub mod speech;

pub use app::App;
pub use catalog::Catalog;
pub use config::Config;
pub use progress::ProgressStore;
