//! Player-state persistence over named JSON blobs.
//!
//! The storage medium only needs get/set/remove of a string blob under a
//! key ([`BlobStore`]). [`StateStore`] layers the game's key scheme on
//! top: three fixed, game-global keys shared by every locale, tolerant
//! loading, migration of legacy per-locale keys, and reset.
//!
//! # Key Patterns
//!
//! | Key | Content |
//! |-----|---------|
//! | `kitchen_ingredients` | JSON array of `Ingredient` |
//! | `kitchen_achievements` | JSON array of `Achievement` |
//! | `kitchen_custom_recipes` | JSON array of `CustomRecipe` |
//! | `<key>_<locale>` | Legacy per-locale copy, migrated on load |

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use kitchen_catalog::Catalog;
use kitchen_types::{Achievement, Ingredient};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::ledger::CustomRecipeLedger;
use crate::state::PlayerState;

/// Locales that used to keep their own copy of the progress blobs.
pub const LEGACY_LOCALES: [&str; 6] = ["en", "es", "fr", "de", "ja", "zh"];

/// Errors raised by a blob store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure for a key.
    #[error("storage I/O error for {key}: {source}")]
    Io {
        /// The key being accessed.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The medium refused the operation (full, disabled, read-only).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A named-blob storage medium.
pub trait BlobStore {
    /// Read the blob at `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` at `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the blob at `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the medium cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

/// The three persisted parts of the player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    /// The ingredient collection.
    Ingredients,
    /// Achievement flags.
    Achievements,
    /// The custom-recipe ledger.
    CustomRecipes,
}

impl StorageKey {
    /// Every key, in load order.
    pub const ALL: [Self; 3] = [Self::Ingredients, Self::Achievements, Self::CustomRecipes];

    /// The game-global key name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingredients => "kitchen_ingredients",
            Self::Achievements => "kitchen_achievements",
            Self::CustomRecipes => "kitchen_custom_recipes",
        }
    }

    /// The legacy per-locale key names, in migration preference order.
    pub fn legacy_keys(self) -> impl Iterator<Item = String> {
        LEGACY_LOCALES
            .into_iter()
            .map(move |locale| format!("{}_{locale}", self.as_str()))
    }
}

// ---------------------------------------------------------------------------
// In-memory medium
// ---------------------------------------------------------------------------

/// A blob store held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: BTreeMap<String, String>,
    fail_writes: bool,
}

impl MemoryBlobStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            blobs: BTreeMap::new(),
            fail_writes: false,
        }
    }

    /// The same store with `value` pre-loaded at `key`.
    pub fn with_blob(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.blobs.insert(key.into(), value.into());
        self
    }

    /// Make every subsequent write fail, simulating a full or disabled medium.
    pub const fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Whether a blob exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }

    /// Every stored key.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable(String::from("writes disabled")));
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.blobs.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.blobs.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filesystem medium
// ---------------------------------------------------------------------------

/// A blob store keeping one `<key>.json` file per key in a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so
/// a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    directory: PathBuf,
}

impl FileBlobStore {
    /// Open (creating if needed) a store rooted at `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|source| StoreError::Io {
            key: directory.display().to_string(),
            source,
        })?;
        debug!(directory = %directory.display(), "file blob store opened");
        Ok(Self { directory })
    }

    /// The root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            key: key.to_owned(),
            source,
        };
        let target = self.path_for(key);
        let staging = self.directory.join(format!("{key}.json.tmp"));
        let mut file = std::fs::File::create(&staging).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        std::fs::rename(&staging, &target).map_err(io_err)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// State store
// ---------------------------------------------------------------------------

/// Typed player-state persistence over a [`BlobStore`].
///
/// Loading never fails: absent, unreadable, or corrupt blobs are logged
/// and replaced by catalog defaults. Saving is fire-and-forget: failures
/// are logged and the in-memory state stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct StateStore<B> {
    backend: B,
}

impl<B: BlobStore> StateStore<B> {
    /// Wrap a storage medium.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying medium.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the underlying medium.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Load the saved state, falling back to catalog seeds per key.
    ///
    /// The loaded collection is merged with the catalog and the
    /// achievements are aligned with the catalog's rules.
    pub fn load(&mut self, catalog: &Catalog) -> PlayerState {
        let mut state = PlayerState::seed(catalog);

        if let Some(ingredients) = self.read::<Vec<Ingredient>>(StorageKey::Ingredients) {
            state.ingredients = ingredients;
        }
        if let Some(achievements) = self.read::<Vec<Achievement>>(StorageKey::Achievements) {
            state.achievements = achievements;
        }
        if let Some(ledger) = self.read::<CustomRecipeLedger>(StorageKey::CustomRecipes) {
            state.custom_recipes = ledger;
        }

        state.merge_catalog(catalog);
        state.sync_achievements(catalog.achievement_rules());

        let progress = state.progress();
        info!(
            discovered = progress.discovered,
            total = progress.total,
            custom_recipes = state.custom_recipes.len(),
            "player state loaded"
        );
        state
    }

    /// Write the given parts of `state`. Failures are logged, not returned.
    pub fn save(&mut self, state: &PlayerState, keys: &[StorageKey]) {
        for &key in keys {
            let written = match key {
                StorageKey::Ingredients => self.write(key, &state.ingredients),
                StorageKey::Achievements => self.write(key, &state.achievements),
                StorageKey::CustomRecipes => self.write(key, &state.custom_recipes),
            };
            if let Err(e) = written {
                warn!(key = key.as_str(), error = %e, "failed to save player state");
            }
        }
    }

    /// Write every part of `state`.
    pub fn save_all(&mut self, state: &PlayerState) {
        self.save(state, &StorageKey::ALL);
    }

    /// Remove the blob at `key`. Failures are logged, not returned.
    pub fn clear(&mut self, key: StorageKey) {
        if let Err(e) = self.backend.remove(key.as_str()) {
            warn!(key = key.as_str(), error = %e, "failed to clear storage key");
        }
    }

    /// Wipe every key (legacy ones included) and persist a fresh seed state.
    pub fn reset(&mut self, catalog: &Catalog) -> PlayerState {
        for key in StorageKey::ALL {
            self.clear(key);
            for legacy in key.legacy_keys() {
                if let Err(e) = self.backend.remove(&legacy) {
                    warn!(key = %legacy, error = %e, "failed to clear legacy key");
                }
            }
        }
        let state = PlayerState::seed(catalog);
        self.save_all(&state);
        info!("player progress reset");
        state
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: StorageKey, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key.as_str(), &json)
    }

    /// Decode the blob at `key`, migrating from a legacy key if needed.
    fn read<T: DeserializeOwned>(&mut self, key: StorageKey) -> Option<T> {
        match self.backend.get(key.as_str()) {
            Ok(Some(raw)) => return decode(key.as_str(), &raw),
            Ok(None) => {}
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "failed to read saved state");
                return None;
            }
        }

        for legacy in key.legacy_keys() {
            let raw = match self.backend.get(&legacy) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %legacy, error = %e, "failed to read legacy key");
                    continue;
                }
            };
            let Some(value) = decode::<T>(&legacy, &raw) else {
                continue;
            };
            self.migrate(key, &legacy, &raw);
            return Some(value);
        }
        None
    }

    /// Copy a legacy blob to its game-global key and drop every legacy copy.
    fn migrate(&mut self, key: StorageKey, from: &str, raw: &str) {
        if let Err(e) = self.backend.set(key.as_str(), raw) {
            warn!(key = key.as_str(), error = %e, "failed to migrate legacy key");
            return;
        }
        for legacy in key.legacy_keys() {
            if let Err(e) = self.backend.remove(&legacy) {
                warn!(key = %legacy, error = %e, "failed to remove legacy key");
            }
        }
        info!(from, to = key.as_str(), "legacy storage key migrated");
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding corrupt saved state");
            None
        }
    }
}
