use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::PersistenceResult;
use crate::model::CanvasPhoto;

/// Key under which the placed photos are stored
pub const CANVAS_PHOTOS_KEY: &str = "canvasPhotos";

/// A keyed save/restore slot for the placed-photo list that survives restarts.
///
/// `get` returns `Ok(None)` when nothing has been stored under `key` yet.
pub trait PersistenceSlot {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<CanvasPhoto>>>;
    fn set(&mut self, key: &str, photos: &[CanvasPhoto]) -> PersistenceResult<()>;
}

/// In-memory slot. Clones share the same storage, so a host can hand one
/// clone to the editor and keep another to flush into its own storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with a previously saved JSON document
    pub fn with_raw(key: &str, json: String) -> Self {
        let slot = Self::new();
        slot.entries.lock().insert(key.to_owned(), json);
        slot
    }

    /// The stored JSON document, if any
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl PersistenceSlot for MemorySlot {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<CanvasPhoto>>> {
        match self.entries.lock().get(key) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, photos: &[CanvasPhoto]) -> PersistenceResult<()> {
        let json = serde_json::to_string(photos)?;
        self.entries.lock().insert(key.to_owned(), json);
        Ok(())
    }
}

/// Slot backed by one JSON file per key inside a state directory
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    state_dir: PathBuf,
}

impl JsonFileSlot {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{key}.json"))
    }
}

impl PersistenceSlot for JsonFileSlot {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<CanvasPhoto>>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn set(&mut self, key: &str, photos: &[CanvasPhoto]) -> PersistenceResult<()> {
        fs::create_dir_all(&self.state_dir)?;
        let json = serde_json::to_string_pretty(photos)?;
        // Write then rename so a crash mid-write never leaves a truncated file
        let tmp = self.state_dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(tmp, self.path_for(key))?;
        Ok(())
    }
}
