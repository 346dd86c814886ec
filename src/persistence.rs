//! Favorites storage.
//!
//! Repositories are synchronous; the app runs them on the blocking pool from
//! inside effects.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Errors from loading or saving favorites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("I/O error on '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid favorites file '{path}': {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode favorites: {0}")]
    Serialize(String),

    #[error("Storage task did not complete: {0}")]
    Interrupted(String),
}

impl PersistenceError {
    fn io(path: &Path, err: io::Error) -> Self {
        PersistenceError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Loads and stores the list of favorite ids.
pub trait FavoritesRepository: Send + Sync {
    fn load(&self) -> Result<Vec<String>, PersistenceError>;
    fn save(&self, ids: &[String]) -> Result<(), PersistenceError>;
}

/// Favorites as a JSON array of strings in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesRepository for JsonFileRepository {
    /// A missing file means no favorites yet.
    fn load(&self) -> Result<Vec<String>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No favorites file yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(PersistenceError::io(&self.path, err)),
        };

        serde_json::from_str(&content).map_err(|e| PersistenceError::Decode {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Writes to a sibling temp file and renames it over the target.
    fn save(&self, ids: &[String]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
            }
        }

        let json =
            serde_json::to_string(ids).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| PersistenceError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), count = ids.len(), "Saved favorites");
        Ok(())
    }
}

/// In-memory repository that records every write.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    stored: Mutex<Vec<String>>,
    writes: Mutex<Vec<Vec<String>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `ids` already stored.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stored: Mutex::new(ids.into_iter().map(Into::into).collect()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every list passed to `save`, oldest first.
    pub fn writes(&self) -> Vec<Vec<String>> {
        self.writes.lock().clone()
    }

    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().clone()
    }
}

impl FavoritesRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(self.stored.lock().clone())
    }

    fn save(&self, ids: &[String]) -> Result<(), PersistenceError> {
        *self.stored.lock() = ids.to_vec();
        self.writes.lock().push(ids.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unreadable_path_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = JsonFileRepository::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("favorites.json"));
        assert_eq!(repo.load().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn save_creates_parent_dirs_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("favorites.json");
        let repo = JsonFileRepository::new(&path);

        repo.save(&["news-1".to_string(), "sport-42".to_string()])
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"["news-1","sport-42"]"#
        );
        assert_eq!(repo.load().unwrap(), vec!["news-1", "sport-42"]);
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(&err, PersistenceError::Decode { path: p, .. } if *p == path));
        assert!(err.to_string().starts_with("Invalid favorites file"));
    }

    #[test]
    fn memory_repository_records_writes() {
        let repo = MemoryRepository::with_ids(["a"]);
        repo.save(&["a".to_string(), "b".to_string()]).unwrap();
        repo.save(&[]).unwrap();

        assert_eq!(repo.writes(), vec![vec!["a".to_string(), "b".to_string()], vec![]]);
        assert!(repo.stored().is_empty());
    }
}
