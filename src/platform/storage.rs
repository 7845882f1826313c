//! Durable key-value slots
//!
//! Every persisted value in the app (todo list, settings) is a JSON string
//! stored under a fixed key. Backends:
//! - `MemoryStorage`: in-process map, shared between clones
//! - `FileStorage`: one `<key>.json` file per slot (native only)
//! - `LocalStorage`: `window.localStorage` (WASM only)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes kept verbatim in slot file names; everything else is `%XX`
#[cfg(not(target_arch = "wasm32"))]
const SLOT_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Errors raised by a storage backend.
///
/// Callers in this crate log these and carry on; they never reach the UI.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-keyed durable slot store
pub trait KeyValueStore {
    /// Read the raw value under `key`, `None` if the slot is empty
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Clear the slot under `key` (no-op if already empty)
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory slots. Clones share the same underlying map, so a value written
/// through one handle is visible through every other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed over the slot, so a
/// crash mid-write leaves the previous value intact.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Open (and create if missing) the slot directory
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// File path backing `key`. Bytes outside `[A-Za-z0-9_-]` are
    /// percent-encoded, so distinct keys get distinct files and no key can
    /// escape the directory.
    pub fn slot_path(&self, key: &str) -> std::path::PathBuf {
        let name = utf8_percent_encode(key, SLOT_NAME);
        self.dir.join(format!("{name}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Browser `window.localStorage` (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Grab the window's LocalStorage. Fails when there is no window or the
    /// browser refuses access (e.g. some private browsing modes).
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_clones_share_slots() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.write("k", "v").unwrap();
        assert_eq!(b.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.len(), 1);

        b.remove("k").unwrap();
        assert!(a.read("k").unwrap().is_none());
        assert!(a.is_empty());
    }

    #[test]
    fn test_memory_storage_overwrite() {
        let s = MemoryStorage::new();
        s.write("k", "1").unwrap();
        s.write("k", "2").unwrap();
        assert_eq!(s.read("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_reference_impl() {
        let s = MemoryStorage::new();
        let r = &s;
        r.write("k", "v").unwrap();
        assert_eq!(s.read("k").unwrap().as_deref(), Some("v"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::open(dir.path().join("slots")).unwrap();

        assert!(s.read("TODO_LIST").unwrap().is_none());
        s.write("TODO_LIST", "[]").unwrap();
        assert_eq!(s.read("TODO_LIST").unwrap().as_deref(), Some("[]"));
        assert!(!s.slot_path("TODO_LIST").with_extension("json.tmp").exists());

        s.remove("TODO_LIST").unwrap();
        assert!(s.read("TODO_LIST").unwrap().is_none());
        // Removing an empty slot is fine
        s.remove("TODO_LIST").unwrap();
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_encodes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::open(dir.path()).unwrap();
        let path = s.slot_path("../escape/me");
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.file_name().unwrap(), "%2E%2E%2Fescape%2Fme.json");
        assert_eq!(s.slot_path("TODO_LIST").file_name().unwrap(), "TODO_LIST.json");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_similar_keys_do_not_share_a_slot() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::open(dir.path()).unwrap();
        let keys = ["a.b", "a/b", "a_b", "a%2Eb"];
        for key in keys {
            s.write(key, key).unwrap();
        }
        for key in keys {
            assert_eq!(s.read(key).unwrap().as_deref(), Some(key));
        }
    }
}
