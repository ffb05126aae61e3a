//! String key-value stores: in-memory and a JSON file with atomic writes.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::core::errors::{FolioError, Result};

/// Persistent string store. One instance per session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store. Can be switched off to simulate storage that the host
/// environment has disabled.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    disabled: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read and write fails.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: BTreeMap::new(),
            disabled: true,
        }
    }

    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    fn check(&self) -> Result<()> {
        if self.disabled {
            return Err(FolioError::StorageUnavailable {
                details: "memory store disabled".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk. Reads go to the file each time; writes use
/// serialize → temp file → fsync → rename so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(FolioError::io(&self.path, e)),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| FolioError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(entries)?;

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path).map_err(|e| FolioError::io(&tmp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| FolioError::io(&tmp_path, e))?;
            file.sync_all().map_err(|e| FolioError::io(&tmp_path, e))?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| FolioError::io(&self.path, e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking the write; a file
        // that cannot be read at all is left alone.
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(FolioError::Serialization { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}
