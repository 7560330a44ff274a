//! JSON-file-backed store.
//!
//! The file holds one object mapping keys to tagged parameter values. Edits
//! made to the file by other tools are picked up the next time keys are
//! enumerated; every `set` rewrites the file atomically.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use paramsync_types::{ParamValue, StoreError};

use super::{validate_key, ParamStore};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

#[derive(Debug, Default)]
struct FileState {
    entries: BTreeMap<String, ParamValue>,
    modified: Option<SystemTime>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`. A missing file is an
    /// empty store; it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = if path.exists() {
            FileState { entries: read_entries(&path)?, modified: modified_time(&path) }
        } else {
            FileState::default()
        };
        info!("Opened parameter file {} ({} keys)", path.display(), state.entries.len());
        Ok(Self { path, state: Mutex::new(state) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reload_if_changed(&self, state: &mut FileState) -> Result<(), StoreError> {
        let modified = modified_time(&self.path);
        if modified.is_none() || modified == state.modified {
            return Ok(());
        }
        state.entries = read_entries(&self.path)?;
        state.modified = modified;
        debug!("Reloaded {} after external change ({} keys)", self.path.display(), state.entries.len());
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, ParamValue>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Io { message: format!("serialize failed: {}", e) })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::from_io_error(&e))?;
        }

        // Atomic write
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp_path = PathBuf::from(temp);
        fs::write(&temp_path, content).map_err(|e| StoreError::from_io_error(&e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::from_io_error(&e))
    }
}

impl ParamStore for FileStore {
    fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut state = self.state.lock();
        self.reload_if_changed(&mut state)?;
        Ok(state.entries.keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<ParamValue, StoreError> {
        self.state
            .lock()
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { key: key.to_string() })
    }

    fn set(&self, key: &str, value: ParamValue) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut state = self.state.lock();
        // Pick up external edits first so the rewrite does not clobber them.
        self.reload_if_changed(&mut state)?;

        let previous = state.entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&state.entries) {
            match previous {
                Some(v) => state.entries.insert(key.to_string(), v),
                None => state.entries.remove(key),
            };
            return Err(e);
        }
        state.modified = modified_time(&self.path);
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, ParamValue>, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::from_io_error(&e))?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
