use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Result, WardrobeError},
    styles::StylePreset,
};

/// Everything the wardrobe persists between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardrobeData {
    /// Favorite style ids, in the order they were starred
    #[serde(rename = "lumina_favorites", default)]
    pub favorites: Vec<String>,

    /// User-created styles, in creation order
    #[serde(rename = "lumina_user_styles", default)]
    pub user_styles: Vec<StylePreset>,
}

/// Persistence backend for favorites and custom styles
pub trait WardrobeStore: Send + Sync {
    /// Load the persisted collections; a store that was never written loads empty
    fn load(&self) -> Result<WardrobeData>;

    /// Replace the persisted collections
    fn save(&self, data: &WardrobeData) -> Result<()>;
}

/// JSON file store
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, reason: impl ToString) -> WardrobeError {
        WardrobeError::PersistFailed {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl WardrobeStore for JsonFileStore {
    fn load(&self) -> Result<WardrobeData> {
        if !self.path.exists() {
            debug!("No wardrobe file at {:?}, starting empty", self.path);
            return Ok(WardrobeData::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    fn save(&self, data: &WardrobeData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.persist_error(e))?;
        }

        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content).map_err(|e| self.persist_error(e))?;
        debug!("Saved wardrobe to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store; clones share the same contents
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<WardrobeData>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: WardrobeData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            saves: Arc::default(),
        }
    }

    /// Snapshot of the stored collections
    pub fn snapshot(&self) -> WardrobeData {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of completed saves
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }
}

impl WardrobeStore for MemoryStore {
    fn load(&self) -> Result<WardrobeData> {
        Ok(self.snapshot())
    }

    fn save(&self, data: &WardrobeData) -> Result<()> {
        let mut guard = self.data.lock().map_err(|_| WardrobeError::PersistFailed {
            path: "memory".to_string(),
            reason: "lock poisoned".to_string(),
        })?;
        *guard = data.clone();
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}
