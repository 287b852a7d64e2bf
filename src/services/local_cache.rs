use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::AppError;

/// Synchronous string key/value cache persisted as one JSON file.
///
/// Reads are served from memory; every write rewrites the file.
pub struct LocalCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl LocalCache {
    pub fn open(cache_dir: &Path) -> Result<Self, AppError> {
        let path = cache_dir.join("local_storage.json");
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| AppError::Cache(e.to_string()))?;
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Discarding unreadable cache {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Memory only changes once the file write has succeeded.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| AppError::Cache(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(entries).map_err(|e| AppError::Cache(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| AppError::Cache(e.to_string()))
    }
}
