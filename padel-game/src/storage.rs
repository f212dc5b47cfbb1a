//! Durable slot backends for save data.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::GameStorage;
use crate::constants::SLOT_FILE_EXTENSION;

/// Errors raised by the bundled storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid slot key `{0}`")]
    InvalidKey(String),
}

/// In-memory slots shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current raw payload of `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl GameStorage for MemoryStorage {
    type Error = StorageError;

    fn read_slot(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.get(key))
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn clear_slot(&self, key: &str) -> Result<(), Self::Error> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{SLOT_FILE_EXTENSION}")))
    }
}

impl GameStorage for FileStorage {
    type Error = StorageError;

    fn read_slot(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.root)?;
        // Write beside the slot and rename so a crash never leaves a torn save.
        let staging = path.with_extension(format!("{SLOT_FILE_EXTENSION}.tmp"));
        fs::write(&staging, payload)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn clear_slot(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "padel-game-storage-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn memory_slots_are_shared_between_clones() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.write_slot("slot", "{}").unwrap();
        assert_eq!(handle.read_slot("slot").unwrap().as_deref(), Some("{}"));
        handle.clear_slot("slot").unwrap();
        assert_eq!(storage.read_slot("slot").unwrap(), None);
    }

    #[test]
    fn file_slots_round_trip() {
        let dir = scratch_dir("round-trip");
        let storage = FileStorage::new(&dir);
        assert_eq!(storage.read_slot("save").unwrap(), None);

        storage.write_slot("save", "{\"points\":1}").unwrap();
        storage.write_slot("save", "{\"points\":2}").unwrap();
        assert_eq!(
            storage.read_slot("save").unwrap().as_deref(),
            Some("{\"points\":2}")
        );
        assert!(dir.join("save.json").exists());
        assert!(!dir.join("save.json.tmp").exists());

        storage.clear_slot("save").unwrap();
        storage.clear_slot("save").unwrap();
        assert_eq!(storage.read_slot("save").unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_keys_cannot_escape_root() {
        let storage = FileStorage::new(scratch_dir("keys"));
        for key in ["", "../evil", "a/b", ".hidden"] {
            assert!(
                matches!(storage.read_slot(key), Err(StorageError::InvalidKey(_))),
                "key {key:?} accepted"
            );
        }
    }
}
