//! File-backed state store

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{StateError, StateStore};

/// Keeps the state as the literal `true` or `false` in a single file
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the new content is staged in before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unavailable(&self, reason: impl Into<String>) -> StateError {
        StateError::Unavailable {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn write_failed(&self, source: std::io::Error) -> StateError {
        StateError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

/// Parse a persisted token. Only exact `true` / `false` are accepted.
pub fn parse_state(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Write and fsync the new content to the staging file
fn stage(path: &Path, state: bool) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    file.write_all(state.to_string().as_bytes())?;
    file.sync_all()
}

impl StateStore for FileStateStore {
    fn read(&self) -> Result<bool, StateError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| self.unavailable(e.to_string()))?;

        parse_state(&raw).ok_or_else(|| self.unavailable(format!("invalid state token {:?}", raw.trim())))
    }

    fn write(&self, state: bool) -> Result<(), StateError> {
        let staging = self.staging_path();

        // Any failure leaves the previous state in place and no staging file behind
        if let Err(e) = stage(&staging, state).and_then(|_| std::fs::rename(&staging, &self.path)) {
            let _ = std::fs::remove_file(&staging);
            return Err(self.write_failed(e));
        }

        tracing::debug!(path = %self.path.display(), state, "State persisted");

        Ok(())
    }
}
