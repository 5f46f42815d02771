//! Dataset Cache Module
//! Memoizes the loaded and cleaned tables per dataset path.
//!
//! An entry stays valid while the file's fingerprint (size and modification
//! time) is unchanged; a different fingerprint triggers a reload. Entries can
//! also be dropped explicitly with [`DatasetCache::invalidate`].

use crate::data::{DataLoader, DataProcessor, LoaderError};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Raw and cleaned tables of one dataset file, shared read-only.
#[derive(Debug)]
pub struct Dataset {
    pub path: PathBuf,
    pub raw: DataFrame,
    pub cleaned: DataFrame,
}

impl Dataset {
    /// Build a dataset from an already loaded raw table.
    pub fn from_raw(path: impl Into<PathBuf>, raw: DataFrame) -> Result<Self, LoaderError> {
        let cleaned = DataProcessor::clean(&raw)?;
        Ok(Self {
            path: path.into(),
            raw,
            cleaned,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self, LoaderError> {
        let meta = std::fs::metadata(path).map_err(|source| LoaderError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct CacheEntry {
    fingerprint: Fingerprint,
    dataset: Arc<Dataset>,
}

/// Hit and miss counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Path-keyed memo of [`Dataset`]s.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
    stats: CacheStats,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading and cleaning it on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoaderError> {
        let fingerprint = Fingerprint::of(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.fingerprint == fingerprint {
                self.stats.hits += 1;
                tracing::debug!(path = %path.display(), "Dataset cache hit");
                return Ok(Arc::clone(&entry.dataset));
            }
            tracing::info!(path = %path.display(), "Dataset changed on disk, reloading");
        }

        self.stats.misses += 1;
        let raw = DataLoader::load_csv(path)?;
        let dataset = Arc::new(Dataset::from_raw(path, raw)?);

        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                fingerprint,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
