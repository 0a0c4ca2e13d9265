//! Persisted online/offline state
//!
//! The last known state is a single boolean kept on durable storage. It is
//! only rewritten when a check observes a transition.

pub mod file;

pub use file::FileStateStore;

use std::path::PathBuf;

/// Storage for the last known upstream state
pub trait StateStore {
    /// Load the persisted state. Never substitutes a default.
    fn read(&self) -> Result<bool, StateError>;

    /// Replace the persisted state
    fn write(&self, state: bool) -> Result<(), StateError>;
}

/// State store errors
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("State unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("Failed to write state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
