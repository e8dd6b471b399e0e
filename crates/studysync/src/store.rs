//! File-backed record store
//!
//! Each collection lives in its own JSON array file inside the data
//! directory. Every call reads or rewrites the whole file; there is no
//! locking, so overlapping writers to one collection are last-write-wins.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::AppError;

/// The named collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Groups,
    Todos,
    Classes,
    Exams,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Groups,
        Collection::Todos,
        Collection::Classes,
        Collection::Exams,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Groups => "groups",
            Collection::Todos => "todos",
            Collection::Classes => "classes",
            Collection::Exams => "exams",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Create the data directory and an empty array file for every
    /// collection that does not have one yet. Existing files are left alone.
    pub fn init(&self) -> Result<Vec<Collection>, AppError> {
        std::fs::create_dir_all(&self.data_dir)?;

        let mut created = Vec::new();
        for collection in Collection::ALL {
            if self.path(collection).exists() {
                continue;
            }
            self.write::<serde_json::Value>(collection, &[])?;
            info!(collection = %collection, "Created collection file");
            created.push(collection);
        }
        Ok(created)
    }

    /// Read and decode the full collection
    pub fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, AppError> {
        let path = self.path(collection);
        let content = std::fs::read_to_string(&path)?;
        let records: Vec<T> = serde_json::from_str(&content)?;

        debug!(collection = %collection, count = records.len(), "Loaded collection");
        Ok(records)
    }

    /// Replace the full collection. The new content is written to a
    /// temporary file next to the target and renamed over it, so readers
    /// never observe a partial write.
    pub fn write<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<(), AppError> {
        let path = self.path(collection);
        let json = serde_json::to_string_pretty(records)?;

        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| AppError::Io(e.error))?;

        debug!(collection = %collection, count = records.len(), "Saved collection");
        Ok(())
    }
}
