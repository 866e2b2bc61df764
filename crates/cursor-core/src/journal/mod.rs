//! Append-only diagnostic journal.
//!
//! Controllers write one human-readable line per operation or failure.  The
//! journal is injected, so tests can inspect it and embedders can route it
//! anywhere; [`MemoryJournal`] keeps lines in memory and can export them to a
//! text file.
//!
//! The journal complements `tracing`: tracing output is for whoever runs the
//! process, the journal is a record the embedding application can collect
//! and hand back to the user.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

/// File stem used when the caller does not choose one.
pub const DEFAULT_EXPORT_STEM: &str = "defaultLogs";

/// Error type for journal export.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The export directory does not exist.  It is never created implicitly.
    #[error("export directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    /// Writing the export file failed.
    #[error("I/O error writing journal to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Receives diagnostic lines.
pub trait Journal: Send + Sync {
    fn append(&self, line: String);
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullJournal;

impl Journal for NullJournal {
    fn append(&self, _line: String) {}
}

/// Keeps every appended line in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    lines: Mutex<Vec<String>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all lines appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes all lines, joined by `\n`, to `<dir>/<file_stem>.txt`.
    ///
    /// An existing file is overwritten.  Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::DirectoryNotFound`] if `dir` is not an existing
    /// directory, and [`JournalError::Io`] if the write fails.
    pub fn export(&self, dir: &Path, file_stem: &str) -> Result<PathBuf, JournalError> {
        if !dir.is_dir() {
            return Err(JournalError::DirectoryNotFound(dir.to_path_buf()));
        }

        let path = dir.join(format!("{file_stem}.txt"));
        let content = self.lines().join("\n");
        std::fs::write(&path, content).map_err(|source| JournalError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("journal exported to {}", path.display());
        Ok(path)
    }
}

impl Journal for MemoryJournal {
    fn append(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}
