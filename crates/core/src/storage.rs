//! Key/value storage behind the session
//!
//! The interface mirrors browser `localStorage`: string keys, string values,
//! synchronous best-effort writes. Backends never surface write failures to
//! callers; they log them and keep going.

use crate::error::CoreResult;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Synchronous string key/value store
#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str);

    /// Remove `key` if present
    fn remove_item(&self, key: &str);
}

/// In-process storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Storage persisted as a JSON object in a single file
///
/// Every read goes back to disk, so a logout performed by another process is
/// visible on the next call. Writes replace the file atomically.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (or lazily create) storage at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        debug!("Using session storage at {}", path.display());

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Session storage is not valid JSON, treating it as empty"
                );
                BTreeMap::new()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to read session storage");
                BTreeMap::new()
            }
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> CoreResult<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Unique per writer; created with owner-only permissions on unix
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_all();
        apply(&mut items);
        if let Err(err) = self.write_all(&items) {
            warn!(path = %self.path.display(), error = %err, "Failed to persist session storage");
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        });
    }

    fn remove_item(&self, key: &str) {
        self.update(|items| {
            items.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::storage::StorageTestSuite;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_suite() {
        StorageTestSuite::new(MemoryStorage::new()).run_all();
    }

    #[test]
    fn test_file_storage_suite() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("session.json")).unwrap();
        StorageTestSuite::new(storage).run_all();
    }

    #[test]
    fn test_file_storage_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("session.json");
        let storage = FileStorage::open(&path).unwrap();

        storage.set_item("token", "abc");

        assert!(path.exists());
        assert_eq!(storage.path(), path.as_path());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        FileStorage::open(&path).unwrap().set_item("token", "abc");
        let reopened = FileStorage::open(&path).unwrap();

        assert_eq!(reopened.get_item("token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_storage_sees_removal_by_another_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let first = FileStorage::open(&path).unwrap();
        let second = FileStorage::open(&path).unwrap();

        first.set_item("token", "abc");
        assert_eq!(second.get_item("token").as_deref(), Some("abc"));

        second.remove_item("token");
        assert_eq!(first.get_item("token"), None);
    }

    #[test]
    fn test_file_storage_treats_corrupt_file_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("token"), None);

        storage.set_item("token", "abc");
        assert_eq!(storage.get_item("token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_independent_writers_leave_a_readable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        // Separate handles share no lock, like two CLI processes
        let writers: Vec<_> = (0..4)
            .map(|writer| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let storage = FileStorage::open(&path).unwrap();
                    for round in 0..25 {
                        storage.set_item("token", &format!("w{writer}-r{round}"));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let raw = fs::read(&path).unwrap();
        let items: BTreeMap<String, String> = serde_json::from_slice(&raw).unwrap();
        assert!(items["token"].ends_with("-r24"));

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "session.json")
            .collect();
        assert!(leftovers.is_empty(), "stray temp files: {leftovers:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("token", "abc");

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
