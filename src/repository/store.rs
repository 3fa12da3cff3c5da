//! Key-value byte stores backing the repository.
//!
//! Each collection lives under one key and is replaced wholesale on every
//! write.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::error::{AppError, AppResult};

/// Synchronous key-value byte store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> AppResult<()>;
}

/// Store keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory
    pub fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> AppResult<()> {
        // Write beside the target then rename so readers never see a partial value
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process store, used by tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
