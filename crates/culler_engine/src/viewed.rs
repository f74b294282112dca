use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use culler_logging::culler_debug;

use crate::{AtomicFileWriter, PersistError};

pub const DEFAULT_VIEWED_FILE: &str = "viewed_photos.json";

/// Append-only ledger of item identifiers that were already shown.
///
/// Stored as one JSON array in insertion order. Every call reloads the file,
/// so edits made by another process between calls are picked up.
#[derive(Debug)]
pub struct ViewedSet {
    writer: AtomicFileWriter,
    lock: Mutex<()>,
}

impl ViewedSet {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(path.into()),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }

    pub fn load(&self) -> Result<HashSet<String>, PersistError> {
        let _guard = self.guard();
        Ok(self.read_ids()?.into_iter().collect())
    }

    pub fn len(&self) -> Result<usize, PersistError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, PersistError> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, id: &str) -> Result<bool, PersistError> {
        let _guard = self.guard();
        Ok(self.read_ids()?.iter().any(|known| known == id))
    }

    /// Adds `id` and persists the whole ledger. Returns `false` if it was already present.
    pub fn record(&self, id: &str) -> Result<bool, PersistError> {
        let _guard = self.guard();
        let mut ids = self.read_ids()?;
        if ids.iter().any(|known| known == id) {
            return Ok(false);
        }
        ids.push(id.to_string());

        let content = serde_json::to_vec(&ids).map_err(|err| PersistError::Corrupt {
            path: self.path().to_path_buf(),
            message: err.to_string(),
        })?;
        self.writer.write(&content)?;
        culler_debug!("Recorded {} as viewed ({} total)", id, ids.len());
        Ok(true)
    }

    fn read_ids(&self) -> Result<Vec<String>, PersistError> {
        let path = self.path();
        let content = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(PersistError::Io(err)),
        };
        serde_json::from_slice(&content).map_err(|err| PersistError::Corrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    // The guard protects no data, so a poisoned lock is still usable.
    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
