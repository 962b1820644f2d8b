//! Key-Value Snapshot Stores
//!
//! The session writes one JSON record after every mutating action.
//! Stores only move strings around; decoding lives in `saved`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Single-record key-value store.
pub trait SnapshotStore {
    /// Read the stored record, if any.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Overwrite the stored record.
    fn save(&mut self, record: &str) -> Result<(), StoreError>;
}

/// In-memory store. Used for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    record: Option<String>,
    writes: usize,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            writes: 0,
        }
    }

    /// Current record.
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of saves so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &str) -> Result<(), StoreError> {
        self.record = Some(record.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Store backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, record: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Atomic replace via rename
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, record).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}
