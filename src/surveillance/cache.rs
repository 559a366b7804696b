//! Dataset Cache
//!
//! Memoizes loaded datasets keyed by (path, reporting year). Entries live
//! until [`DatasetCache::invalidate`] is called; there is no expiry.

use super::dataset::{load_or_fallback, DataSource, Dataset};
use super::mock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

type CacheKey = (PathBuf, i32);

/// In-process memoization cache for surveillance datasets
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<CacheKey, Arc<Dataset>>>,
    loads: AtomicU64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the memoized dataset, loading it on first use
    pub async fn get(&self, path: &Path, reporting_year: i32) -> Arc<Dataset> {
        let key = (path.to_path_buf(), reporting_year);

        if let Some(dataset) = self.entries.read().await.get(&key) {
            return Arc::clone(dataset);
        }

        let mut entries = self.entries.write().await;
        // Another request may have loaded it while we waited
        if let Some(dataset) = entries.get(&key) {
            return Arc::clone(dataset);
        }

        // File IO and parsing run on the blocking pool; the write lock keeps
        // concurrent first requests from loading twice
        let owned = key.0.clone();
        let dataset = match tokio::task::spawn_blocking(move || {
            load_or_fallback(&owned, reporting_year)
        })
        .await
        {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(path = ?key.0, error = %e, "Dataset load task failed");
                Dataset::new(
                    mock::generate_placeholder(reporting_year),
                    DataSource::Fallback {
                        reason: e.to_string(),
                    },
                    reporting_year,
                )
            }
        };
        let dataset = Arc::new(dataset);
        self.loads.fetch_add(1, Ordering::Relaxed);
        entries.insert(key, Arc::clone(&dataset));
        dataset
    }

    /// Drop every memoized dataset. Returns how many were dropped.
    pub async fn invalidate(&self) -> usize {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        tracing::info!(dropped, "Dataset cache invalidated");
        dropped
    }

    /// Number of loads performed since creation
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_memoizes() {
        let cache = DatasetCache::new();
        let path = Path::new("/no/such/surveillance.csv");

        let first = cache.get(path, 2025).await;
        let second = cache.get(path, 2025).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
    }

    #[tokio::test]
    async fn test_key_includes_year() {
        let cache = DatasetCache::new();
        let path = Path::new("/no/such/surveillance.csv");

        cache.get(path, 2024).await;
        cache.get(path, 2025).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.load_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let cache = DatasetCache::new();
        let path = Path::new("/no/such/surveillance.csv");

        let first = cache.get(path, 2025).await;
        assert_eq!(cache.invalidate().await, 1);
        assert!(cache.is_empty().await);

        let second = cache.get(path, 2025).await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_requests_load_once() {
        let cache = Arc::new(DatasetCache::new());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            "급,질병,계,1월,2월,3월,4월,5월,6월,7월,8월,9월,10월,11월,12월\n\
             제2급,수두,0,1,2,3,4,5,6,7,8,9,10,11,12\n"
                .as_bytes(),
        )
        .unwrap();
        let path = file.path().to_path_buf();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                tokio::spawn(async move { cache.get(&path, 2025).await })
            })
            .collect();

        let mut loaded = Vec::new();
        for handle in handles {
            loaded.push(handle.await.unwrap());
        }

        assert_eq!(cache.load_count(), 1);
        assert!(loaded.iter().all(|d| Arc::ptr_eq(d, &loaded[0])));
        assert!(!loaded[0].is_fallback());
        assert_eq!(loaded[0].len(), 12);
    }
}
