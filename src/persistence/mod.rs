//! Best-score persistence
//!
//! The engine reads one integer when a session is created and writes it back
//! when a run beats it. Backends:
//! - `MemoryStore`: in-process (tests, headless runs)
//! - `FileStore`: JSON file (native)
//! - `LocalStorageStore`: browser LocalStorage (WASM)
//!
//! Store failures never reach the simulation; callers log and carry on.

use crate::error::Result;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key-value contract for the single best-score integer
pub trait BestScoreStore {
    /// Stored best score, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<u64>>;
    fn save(&mut self, score: u64) -> Result<()>;
}

/// Read the stored best score, treating absence and failure as 0
pub fn load_or_default(store: &dyn BestScoreStore) -> u64 {
    match store.load() {
        Ok(score) => score.unwrap_or(0),
        Err(e) => {
            log::warn!("Best score unavailable, starting from 0: {}", e);
            0
        }
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
    /// Number of successful saves
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(score: u64) -> Self {
        Self {
            best: Some(score),
            writes: 0,
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>> {
        Ok(self.best)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        self.best = Some(score);
        self.writes += 1;
        Ok(())
    }
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn load(&self) -> Result<Option<u64>> {
        (**self).load()
    }

    fn save(&mut self, score: u64) -> Result<()> {
        (**self).save(score)
    }
}
