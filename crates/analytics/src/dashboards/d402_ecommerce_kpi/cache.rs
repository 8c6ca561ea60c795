use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::projections::p910_sales_records::{load_and_prepare, PreparedDataset};
use crate::shared::error::PipelineError;
use crate::usecases::u510_load_ecommerce_csv::TableName;

/// Size and modification time of every source file, `None` when absent
type Fingerprint = Vec<Option<(u64, Option<SystemTime>)>>;

struct CacheEntry {
    fingerprint: Fingerprint,
    dataset: Arc<PreparedDataset>,
}

/// Prepared datasets keyed by source directory.
///
/// Entries are handed out as `Arc` and never modified; a changed source
/// file replaces the entry on the next lookup.
pub struct PreparedCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

pub static PREPARED_CACHE: Lazy<PreparedCache> = Lazy::new(PreparedCache::new);

fn cache_key(base: &Path) -> PathBuf {
    std::fs::canonicalize(base).unwrap_or_else(|_| base.to_path_buf())
}

fn fingerprint(base: &Path) -> Fingerprint {
    TableName::all()
        .iter()
        .map(|name| {
            std::fs::metadata(base.join(name.file_name()))
                .ok()
                .map(|m| (m.len(), m.modified().ok()))
        })
        .collect()
}

impl PreparedCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, base: &Path) -> Result<Arc<PreparedDataset>, PipelineError> {
        self.get_or_load_with(base, load_and_prepare)
    }

    pub fn get_or_load_with<F>(
        &self,
        base: &Path,
        loader: F,
    ) -> Result<Arc<PreparedDataset>, PipelineError>
    where
        F: FnOnce(&Path) -> Result<PreparedDataset, PipelineError>,
    {
        let key = cache_key(base);
        let current = fingerprint(&key);

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get(&key) {
            if entry.fingerprint == current {
                tracing::debug!("Prepared dataset cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            tracing::info!("Sources under {} changed, reloading", key.display());
        }

        let dataset = Arc::new(loader(&key)?);
        entries.insert(
            key,
            CacheEntry {
                fingerprint: current,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    pub fn invalidate(&self, base: &Path) -> bool {
        let key = cache_key(base);
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PreparedCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Prepared dataset for `base` from the process-wide cache
pub fn load_prepared(base: &Path) -> Result<Arc<PreparedDataset>, PipelineError> {
    PREPARED_CACHE.get_or_load(base)
}
