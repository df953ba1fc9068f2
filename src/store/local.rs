use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::StorageError;
use super::port::KeyValuePort;
use crate::models::record::FlatRecord;

/// Key holding the whole record collection as a JSON array.
pub const STORAGE_KEY: &str = "arranchamento-entries";

/// Key-value port backed by one JSON file per key inside a directory.
pub struct FileKeyValue {
    dir: PathBuf,
}

impl FileKeyValue {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValuePort for FileKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Volatile key-value port.
#[derive(Default)]
pub struct MemoryKeyValue {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Port pre-loaded with one key, e.g. to simulate previously persisted data.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let port = Self::new();
        port.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        port
    }
}

impl KeyValuePort for MemoryKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
        Ok(())
    }
}

/// In-memory snapshot of the collection, written through to a key-value port
/// after every mutation. A mutation only lands in memory once the write succeeds.
pub struct LocalRecords {
    port: Box<dyn KeyValuePort>,
    entries: Mutex<Vec<FlatRecord>>,
}

impl LocalRecords {
    /// Load the persisted collection. Missing or malformed data loads as empty.
    pub fn open(port: Box<dyn KeyValuePort>) -> Self {
        let entries = load(port.as_ref());
        Self { port, entries: Mutex::new(entries) }
    }

    /// Rows ordered newest first; among equal timestamps the later insert wins.
    pub fn rows(&self) -> Vec<FlatRecord> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut rows: Vec<FlatRecord> = entries.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub fn insert(&self, row: FlatRecord) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = entries.clone();
        next.push(row);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if !entries.iter().any(|row| row.id == id) {
            return Ok(());
        }
        let next: Vec<FlatRecord> = entries.iter().filter(|row| row.id != id).cloned().collect();
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        self.port.remove(STORAGE_KEY)?;
        entries.clear();
        Ok(())
    }

    fn persist(&self, rows: &[FlatRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string(rows)?;
        self.port.set(STORAGE_KEY, &json)
    }
}

fn load(port: &dyn KeyValuePort) -> Vec<FlatRecord> {
    let stored = match port.get(STORAGE_KEY) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::error!("Failed to read stored records: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<FlatRecord>>(&stored) {
        Ok(rows) => {
            log::info!("Loaded {} stored record(s)", rows.len());
            rows
        }
        Err(e) => {
            log::warn!("Stored records are malformed, starting empty: {e}");
            Vec::new()
        }
    }
}
