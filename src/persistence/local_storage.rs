//! Browser LocalStorage backend

use super::BestScoreStore;
use crate::error::{Error, Result};

/// Stores the best score as a plain integer string
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "movingCirclesBestScore";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| Error::storage("LocalStorage unavailable"))
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u64>> {
        let value = Self::storage()?
            .get_item(&self.key)
            .map_err(|_| Error::storage("LocalStorage read failed"))?;
        // Unparseable values count as no score, like a fresh install
        Ok(value.and_then(|v| v.trim().parse().ok()))
    }

    fn save(&mut self, score: u64) -> Result<()> {
        Self::storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|_| Error::storage("LocalStorage write failed"))?;
        log::info!("Best score {} saved", score);
        Ok(())
    }
}
