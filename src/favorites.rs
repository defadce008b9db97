//! Persisted favorites
//!
//! Favorites are full [`Movie`] snapshots taken when the heart is clicked.
//! They are never refreshed from the API afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::StorageError;
use crate::models::Movie;

/// Storage key for the favorites list
pub const FAVORITES_KEY: &str = "movieFavorites";

/// Key/value backend holding serialized favorites
pub trait FavoritesStorage {
    /// `Ok(None)` when nothing has been stored under `key` yet
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Writes a sibling `.tmp` file and renames it over the target, so an
    /// interrupted write never leaves a truncated file behind.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

pub struct FavoritesStore {
    items: Vec<Movie>,
    storage: Box<dyn FavoritesStorage>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").field("items", &self.items.len()).finish()
    }
}

impl FavoritesStore {
    /// Load favorites from `storage`. Missing or corrupt data starts empty.
    pub fn load(storage: Box<dyn FavoritesStorage>) -> Self {
        let items = match storage.read(FAVORITES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Movie>>(&json) {
                Ok(items) => dedup_by_id(items),
                Err(e) => {
                    warn!("Ignoring corrupt favorites: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} favorites", items.len());
        Self { items, storage }
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.items.iter().any(|m| m.id == id)
    }

    /// Remove the movie if present, otherwise store a snapshot of it
    pub fn toggle(&mut self, movie: &Movie) -> Toggled {
        let result = if let Some(pos) = self.items.iter().position(|m| m.id == movie.id) {
            let removed = self.items.remove(pos);
            info!("Removed '{}' from favorites", removed.title);
            Toggled::Removed
        } else {
            info!("Added '{}' to favorites", movie.title);
            self.items.push(movie.clone());
            Toggled::Added
        };
        self.persist();
        result
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
        info!("All favorites cleared");
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Write the favorites as pretty JSON to an arbitrary file
    pub fn export_to(&self, path: &Path) -> Result<(), StorageError> {
        fs::write(path, serde_json::to_string_pretty(&self.items)?)?;
        info!("Exported {} favorites to {}", self.items.len(), path.display());
        Ok(())
    }

    fn persist(&self) {
        let result = self
            .to_json()
            .and_then(|json| self.storage.write(FAVORITES_KEY, &json));
        if let Err(e) = result {
            warn!("Failed to save favorites: {}", e);
        }
    }
}

fn dedup_by_id(items: Vec<Movie>) -> Vec<Movie> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|m| seen.insert(m.id)).collect()
}

/// In-memory storage shared between store instances, for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.values.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

#[cfg(test)]
impl FavoritesStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: Some(format!("/b{}.jpg", id)),
            vote_average: 6.5,
            release_date: Some("2019-10-04".to_string()),
            overview: Some("overview".to_string()),
            runtime: Some(122),
        }
    }

    fn ids(store: &FavoritesStore) -> Vec<i64> {
        store.items().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut store = FavoritesStore::load(Box::new(MemoryStorage::default()));
        assert_eq!(store.toggle(&movie(1, "a")), Toggled::Added);
        assert!(store.is_favorite(1));
        assert!(!store.is_favorite(2));
        assert_eq!(store.toggle(&movie(1, "a")), Toggled::Removed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_order() {
        let mut store = FavoritesStore::load(Box::new(MemoryStorage::default()));
        for id in 1..=4 {
            store.toggle(&movie(id, "m"));
        }
        let before = store.items().to_vec();

        store.toggle(&movie(2, "m"));
        assert_eq!(ids(&store), vec![1, 3, 4]);
        store.toggle(&movie(2, "m"));
        assert_eq!(ids(&store), vec![1, 3, 4, 2]);

        // Toggling a non-member twice is a no-op
        store.toggle(&movie(9, "x"));
        store.toggle(&movie(9, "x"));
        assert_eq!(ids(&store), vec![1, 3, 4, 2]);

        store.toggle(&movie(5, "n"));
        store.toggle(&movie(5, "n"));
        assert_eq!(store.items().len(), before.len());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let storage = MemoryStorage::default();
        let mut store = FavoritesStore::load(Box::new(storage.clone()));
        store.toggle(&movie(1, "a"));
        let saved: Vec<Movie> = serde_json::from_str(&storage.get(FAVORITES_KEY).unwrap()).unwrap();
        assert_eq!(saved, vec![movie(1, "a")]);

        store.clear();
        assert_eq!(storage.get(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_round_trip() {
        let storage = MemoryStorage::default();
        let mut store = FavoritesStore::load(Box::new(storage.clone()));
        store.toggle(&movie(7, "seven"));
        store.toggle(&Movie { release_date: None, poster_path: None, ..movie(8, "eight") });

        let reloaded = FavoritesStore::load(Box::new(storage));
        assert_eq!(reloaded.items(), store.items());
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut store = FavoritesStore::load(Box::new(MemoryStorage::default()));
        let mut original = movie(3, "Old title");
        store.toggle(&original);
        original.title = "New title".to_string();
        assert_eq!(store.items()[0].title, "Old title");
        assert!(store.is_favorite(original.id));
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let storage = MemoryStorage::with(FAVORITES_KEY, "[{\"id\": oops");
        let store = FavoritesStore::load(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_ids_in_storage_are_collapsed() {
        let json = serde_json::to_string(&vec![movie(1, "first"), movie(1, "second")]).unwrap();
        let store = FavoritesStore::load(Box::new(MemoryStorage::with(FAVORITES_KEY, &json)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "first");
    }

    #[test]
    fn test_json_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        assert!(storage.read(FAVORITES_KEY).unwrap().is_none());

        let mut store = FavoritesStore::load(Box::new(storage.clone()));
        store.toggle(&movie(42, "answer"));
        assert!(storage.path_for(FAVORITES_KEY).exists());

        let reloaded = FavoritesStore::load(Box::new(JsonFileStorage::new(dir.path())));
        assert_eq!(reloaded.items(), &[movie(42, "answer")]);
    }

    #[test]
    fn test_json_file_storage_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        storage.write(FAVORITES_KEY, "[]").unwrap();

        let mut store = FavoritesStore::load(Box::new(storage.clone()));
        store.toggle(&movie(7, "seven"));
        store.toggle(&movie(8, "eight"));

        let saved: Vec<Movie> =
            serde_json::from_str(&storage.read(FAVORITES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved, vec![movie(7, "seven"), movie(8, "eight")]);
        assert!(!storage.path_for(FAVORITES_KEY).with_extension("json.tmp").exists());
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FavoritesStore::load(Box::new(MemoryStorage::default()));
        store.toggle(&movie(1, "a"));
        let path = dir.path().join("export.json");
        store.export_to(&path).unwrap();
        let exported: Vec<Movie> = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(exported.len(), 1);
    }
}
