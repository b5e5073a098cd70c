// ── Favorites persistence ──
//
// A small local key-value store, modeled as an injected capability so
// the core is testable without a real environment. Synchronous on
// purpose: the payload is a handful of ids.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Storage key for the persisted favorites set.
pub const FAVORITES_KEY: &str = "recipe-favorites";

/// Errors from a favorites store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed favorites data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no usable storage location")]
    NoStorageDir,
}

/// Persistent home for the favorites set.
///
/// `load` runs once at controller start; `save` after each confirmed,
/// non-stale favorite toggle. The format is a JSON array of recipe ids.
pub trait FavoriteStore: Send + Sync {
    fn load(&self) -> Result<HashSet<i64>, StoreError>;
    fn save(&self, favorites: &HashSet<i64>) -> Result<(), StoreError>;
}

// ── File-backed store ────────────────────────────────────────────────

/// JSON-file-backed store: one array of recipe ids under
/// `{dir}/{FAVORITES_KEY}.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store favorites under the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{FAVORITES_KEY}.json")),
        }
    }

    /// Store favorites in the platform data directory.
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let dirs =
            directories::ProjectDirs::from("", "", "ladle").ok_or(StoreError::NoStorageDir)?;
        fs::create_dir_all(dirs.data_dir())?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoriteStore for JsonFileStore {
    fn load(&self) -> Result<HashSet<i64>, StoreError> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        let ids: Vec<i64> = serde_json::from_str(&raw)?;
        Ok(ids.into_iter().collect())
    }

    fn save(&self, favorites: &HashSet<i64>) -> Result<(), StoreError> {
        let mut ids: Vec<i64> = favorites.iter().copied().collect();
        ids.sort_unstable();
        fs::write(&self.path, serde_json::to_vec(&ids)?)?;
        Ok(())
    }
}

// ── In-memory store ──────────────────────────────────────────────────

/// In-memory store for tests and embeddings without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    favorites: Mutex<HashSet<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently persisted set.
    pub fn persisted(&self) -> HashSet<i64> {
        self.favorites
            .lock()
            .expect("favorites lock poisoned")
            .clone()
    }
}

impl FavoriteStore for MemoryStore {
    fn load(&self) -> Result<HashSet<i64>, StoreError> {
        Ok(self.persisted())
    }

    fn save(&self, favorites: &HashSet<i64>) -> Result<(), StoreError> {
        *self.favorites.lock().expect("favorites lock poisoned") = favorites.clone();
        Ok(())
    }
}
