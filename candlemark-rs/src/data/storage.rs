//! Per-dataset candle caching

use std::collections::HashMap;

use crate::data::Candle;

/// In-memory candle cache keyed by dataset id.
///
/// Derived data: every entry is recomputable from the original upload (kept
/// alongside as `raw`), and disposable independently of annotations.
#[derive(Debug, Default)]
pub struct CandleCache {
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    raw: String,
    candles: Vec<Candle>,
}

impl CandleCache {
    /// Create new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a parsed upload, replacing any previous entry for the dataset.
    pub fn insert(&mut self, dataset_id: &str, raw: String, candles: Vec<Candle>) {
        self.entries
            .insert(dataset_id.to_string(), CacheEntry { raw, candles });
    }

    /// Candles for a dataset
    pub fn candles(&self, dataset_id: &str) -> Option<&[Candle]> {
        self.entries.get(dataset_id).map(|e| e.candles.as_slice())
    }

    /// The original uploaded CSV text
    pub fn raw_csv(&self, dataset_id: &str) -> Option<&str> {
        self.entries.get(dataset_id).map(|e| e.raw.as_str())
    }

    /// Look up the candle at an exact timestamp. Candles are stored sorted
    /// ascending by time, so this is a binary search; with duplicate
    /// timestamps any one of the duplicates may be returned.
    pub fn candle_at(&self, dataset_id: &str, time: i64) -> Option<&Candle> {
        let candles = self.candles(dataset_id)?;
        let i = candles.binary_search_by_key(&time, |c| c.time).ok()?;
        candles.get(i)
    }

    /// Drop a dataset's cache
    pub fn remove(&mut self, dataset_id: &str) {
        self.entries.remove(dataset_id);
    }

    /// Check whether a dataset is cached
    pub fn contains(&self, dataset_id: &str) -> bool {
        self.entries.contains_key(dataset_id)
    }

    /// Total number of cached candles across datasets
    pub fn len(&self) -> usize {
        self.entries.values().map(|e| e.candles.len()).sum()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
