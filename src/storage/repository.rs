//! Fetch-or-compute repositories for expensive inputs

use crate::error::{AnalyzerError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Memoizes values by key: return the stored value when present, otherwise
/// compute it, persist it, and return it.
pub trait Repository {
    fn fetch_or_compute<T, F>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>;
}

/// Stores each value as a bincode file `<dir>/<key>.bin`
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", key))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| AnalyzerError::io(e, &self.dir))?;
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, bytes).map_err(|e| AnalyzerError::io(e, &tmp))?;
        fs::rename(&tmp, path).map_err(|e| AnalyzerError::io(e, path))?;
        Ok(())
    }
}

impl Repository for FileRepository {
    fn fetch_or_compute<T, F>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        let path = self.path_for(key);

        match fs::read(&path) {
            Ok(bytes) => {
                log::info!("Loading cached '{}' from {}", key, path.display());
                return Ok(bincode::deserialize(&bytes)?);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AnalyzerError::io(e, path)),
        }

        log::info!("No cached '{}'; computing it", key);
        let value = compute()?;
        self.write_atomic(&path, &bincode::serialize(&value)?)?;
        log::info!("Cached '{}' at {}", key, path.display());

        Ok(value)
    }
}

/// Keeps encoded values in memory; useful for tests and single runs
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

impl Repository for MemoryRepository {
    fn fetch_or_compute<T, F>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        let cached = self
            .entries
            .lock()
            .map_err(|_| AnalyzerError::Other("memory repository lock poisoned".to_string()))?
            .get(key)
            .cloned();
        if let Some(bytes) = cached {
            return Ok(bincode::deserialize(&bytes)?);
        }

        let value = compute()?;
        let bytes = bincode::serialize(&value)?;
        self.entries
            .lock()
            .map_err(|_| AnalyzerError::Other("memory repository lock poisoned".to_string()))?
            .insert(key.to_string(), bytes);

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use std::cell::Cell;

    fn sample() -> Dataset {
        Dataset::new(
            vec![vec!["rust".to_string(), "cargo".to_string()]],
            [("rust".to_string(), 5)].into_iter().collect(),
        )
    }

    #[test]
    fn test_memory_repository_computes_once() {
        let repo = MemoryRepository::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let value: Dataset = repo
                .fetch_or_compute("data", || {
                    calls.set(calls.get() + 1);
                    Ok(sample())
                })
                .unwrap();
            assert_eq!(value, sample());
        }

        assert_eq!(calls.get(), 1);
        assert!(repo.contains("data"));
    }

    #[test]
    fn test_file_repository_persists() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path().join("cache"));

        let first: Dataset = repo.fetch_or_compute("data-site", || Ok(sample())).unwrap();
        assert!(repo.path_for("data-site").exists());

        // A fresh repository over the same directory reads the stored value
        let reopened = FileRepository::new(dir.path().join("cache"));
        let second: Dataset = reopened
            .fetch_or_compute("data-site", || -> Result<Dataset> {
                panic!("value should come from the cache")
            })
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_errors_are_not_cached() {
        let repo = MemoryRepository::new();
        let result: Result<Dataset> = repo.fetch_or_compute("data", || {
            Err(AnalyzerError::Other("fetch failed".to_string()))
        });
        assert!(result.is_err());
        assert!(!repo.contains("data"));
    }
}
