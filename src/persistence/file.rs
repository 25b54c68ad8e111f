//! JSON file backend

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::BestScoreStore;
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreFile {
    best_score: u64,
}

/// Stores `{"best_score": n}` at a fixed path
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> Result<Option<u64>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        let file: BestScoreFile = serde_json::from_str(&json)?;
        Ok(Some(file.best_score))
    }

    fn save(&mut self, score: u64) -> Result<()> {
        // Write beside the target, then rename over it
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string(&BestScoreFile { best_score: score })?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("moving-circles-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_none() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut store = FileStore::new(&path);
        store.save(128).unwrap();
        assert_eq!(FileStore::new(&path).load().unwrap(), Some(128));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(Error::Serialization(_))));
        std::fs::remove_file(&path).ok();
    }
}
