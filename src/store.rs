//! Persistence layer for the task list.
//!
//! Tasks are kept as one ordered list, serialized as a single JSON blob under
//! the well-known key `tasks`. The key-value `Storage` trait hides the actual
//! backend so the submit logic can be exercised against an in-memory store in
//! tests; `FileStorage` is the backend the binary uses, writing one file per
//! key inside the data directory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::task::Task;

/// Storage key holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";

/// Errors surfaced by storage backends and blob (de)serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed task list blob: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A minimal key-value store for string blobs.
///
/// Mirrors the get-item/set-item surface of mobile local storage engines:
/// a missing key is `Ok(None)`, not an error.
pub trait Storage {
    /// Read the blob stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write `value` under `key`, replacing any previous blob.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed storage: each key lives in `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at the given data directory.
    pub fn new(dir: &Path) -> Self {
        FileStorage {
            dir: dir.to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&path)?.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        // Atomic-ish write via temp + rename.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// In-memory storage backend, used by the test suites.
#[derive(Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Outcome of an upsert against the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Added,
    Replaced,
}

/// The persisted task list, read and written as a whole through a `Storage`
/// backend.
pub struct TaskStore<S: Storage> {
    storage: S,
}

impl<S: Storage> TaskStore<S> {
    /// Create a store over the given backend.
    pub fn new(storage: S) -> Self {
        TaskStore { storage }
    }

    /// Load the full task list. An absent blob reads as an empty list.
    pub fn all(&self) -> Result<Vec<Task>, StorageError> {
        match self.storage.get_item(TASKS_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Write the full task list back as a single serialized blob.
    pub fn save_all(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let blob = serde_json::to_string_pretty(tasks)?;
        self.storage.set_item(TASKS_KEY, &blob)
    }

    /// Look up a task by id.
    pub fn find(&self, id: &str) -> Result<Option<Task>, StorageError> {
        Ok(self.all()?.into_iter().find(|t| t.id == id))
    }

    /// Insert-or-replace by id.
    ///
    /// A task whose id already appears in the list replaces that record in
    /// place, keeping its position; otherwise the task is appended.
    pub fn upsert(&mut self, task: Task) -> Result<Upserted, StorageError> {
        let mut tasks = self.all()?;
        let outcome = match tasks.iter().position(|t| t.id == task.id) {
            Some(i) => {
                tasks[i] = task;
                Upserted::Replaced
            }
            None => {
                tasks.push(task);
                Upserted::Added
            }
        };
        self.save_all(&tasks)?;
        Ok(outcome)
    }

    /// Remove a task by id. Returns whether a record was deleted.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut tasks = self.all()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save_all(&tasks)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            start_date: "2024-01-01T09:00".into(),
            end_date: "2024-01-01T10:00".into(),
            status: Status::Open,
        }
    }

    #[test]
    fn test_absent_blob_reads_as_empty_list() {
        let store = TaskStore::new(MemoryStorage::new());
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TaskStore::new(FileStorage::new(dir.path()));
        let tasks = vec![task("a", "first"), task("b", "second"), task("c", "third")];
        store.save_all(&tasks).unwrap();

        let reread = TaskStore::new(FileStorage::new(dir.path()));
        assert_eq!(reread.all().unwrap(), tasks);
    }

    #[test]
    fn test_upsert_appends_then_replaces_in_place() {
        let mut store = TaskStore::new(MemoryStorage::new());
        assert_eq!(store.upsert(task("a", "one")).unwrap(), Upserted::Added);
        assert_eq!(store.upsert(task("b", "two")).unwrap(), Upserted::Added);

        let mut edited = task("a", "one, edited");
        edited.status = Status::Closed;
        assert_eq!(store.upsert(edited.clone()).unwrap(), Upserted::Replaced);

        let tasks = store.all().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], edited);
        assert_eq!(tasks[1].title, "two");
    }

    #[test]
    fn test_remove_reports_whether_anything_was_deleted() {
        let mut store = TaskStore::new(MemoryStorage::new());
        store.upsert(task("a", "one")).unwrap();
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_blob_is_a_parse_error() {
        let mut backend = MemoryStorage::new();
        backend.set_item(TASKS_KEY, "not json").unwrap();
        let store = TaskStore::new(backend);
        assert!(matches!(store.all(), Err(StorageError::Parse(_))));
    }

    #[test]
    fn test_file_storage_overwrites_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set_item(TASKS_KEY, "[1]").unwrap();
        storage.set_item(TASKS_KEY, "[1,2]").unwrap();
        assert_eq!(storage.get_item(TASKS_KEY).unwrap().as_deref(), Some("[1,2]"));
    }
}
