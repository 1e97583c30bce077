use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::scan_chunks;
use crate::config::resolve_worker_count;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;
use crate::results::{Algorithm, SearchResult as SearchOutput};

static FAILURE_CACHE: Lazy<DashMap<Vec<u8>, Arc<PrefixFailureTable>>> = Lazy::new(DashMap::new);

/// Longest-proper-prefix-suffix table for one pattern.
///
/// `get(i)` is the length of the longest proper prefix of `pattern[0..=i]`
/// that is also a suffix of it. `get(0)` is always 0 and `get(i) <= i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFailureTable {
    table: Vec<usize>,
}

impl PrefixFailureTable {
    /// Builds the table in O(m) with the two-pointer extension.
    pub fn build(pattern: &[u8]) -> Self {
        let m = pattern.len();
        let mut table = vec![0usize; m];
        let mut j = 0;
        for i in 1..m {
            while j > 0 && pattern[i] != pattern[j] {
                j = table[j - 1];
            }
            if pattern[i] == pattern[j] {
                j += 1;
            }
            table[i] = j;
        }
        Self { table }
    }

    pub fn get(&self, i: usize) -> usize {
        self.table[i]
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Knuth-Morris-Pratt searcher for a single pattern.
#[derive(Debug, Clone)]
pub struct KmpSearcher {
    pattern: Vec<u8>,
    failure: Arc<PrefixFailureTable>,
    metrics: Arc<ScanMetrics>,
}

impl KmpSearcher {
    /// Creates a searcher for the given pattern.
    ///
    /// The failure table is built once per distinct pattern and cached
    /// process-wide. An empty pattern is rejected.
    pub fn new(pattern: impl AsRef<[u8]>) -> SearchResult<Self> {
        Self::with_metrics(pattern, Arc::new(ScanMetrics::new()))
    }

    /// Creates a searcher that records activity on the supplied metrics.
    pub fn with_metrics(
        pattern: impl AsRef<[u8]>,
        metrics: Arc<ScanMetrics>,
    ) -> SearchResult<Self> {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            return Err(SearchError::invalid_pattern("pattern must not be empty"));
        }

        let failure = if let Some(entry) = FAILURE_CACHE.get(pattern) {
            metrics.record_cache_operation(true);
            entry.clone()
        } else {
            let table = Arc::new(PrefixFailureTable::build(pattern));
            metrics.record_cache_operation(false);
            FAILURE_CACHE.insert(pattern.to_vec(), table.clone());
            table
        };

        Ok(Self {
            pattern: pattern.to_vec(),
            failure,
            metrics,
        })
    }

    /// The pattern this searcher was built for
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Gets the current scan metrics
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Scans `text[window_start..window_end]`, returning absolute start
    /// offsets of every occurrence fully inside the window, in ascending
    /// order. Overlapping occurrences are all reported.
    fn scan_window(&self, text: &[u8], window_start: usize, window_end: usize) -> Vec<usize> {
        let m = self.pattern.len();
        let window = &text[window_start..window_end];
        self.metrics.record_chunk(window.len() as u64);
        if m > window.len() {
            return Vec::new();
        }

        let mut positions = Vec::new();
        let mut j = 0;
        for (i, &byte) in window.iter().enumerate() {
            while j > 0 && self.pattern[j] != byte {
                j = self.failure.get(j - 1);
            }
            if self.pattern[j] == byte {
                j += 1;
            }
            if j == m {
                positions.push(window_start + i + 1 - m);
                // Fall back as after a mismatch so overlapping occurrences
                // are found too
                j = self.failure.get(m - 1);
            }
        }
        self.metrics.record_matches(positions.len() as u64);
        positions
    }

    /// Scans the whole text in one pass.
    ///
    /// A pattern longer than the text yields an empty result.
    pub fn search_sequential(&self, text: &[u8]) -> SearchOutput {
        let started = Instant::now();
        let positions = self.scan_window(text, 0, text.len());
        SearchOutput::sequential(Algorithm::Kmp, positions, started.elapsed())
    }

    /// Scans the text partitioned across `worker_count` workers.
    ///
    /// `0` means auto: use the available parallelism. Each worker runs the
    /// sequential loop over its chunk with fresh state; the chunk overlap of
    /// `pattern_len - 1` bytes keeps boundary-straddling occurrences visible
    /// to their owning worker. The result equals the sequential one.
    pub fn search_parallel(
        &self,
        text: &[u8],
        worker_count: usize,
    ) -> SearchResult<SearchOutput> {
        let workers = resolve_worker_count(worker_count);
        let overlap = self.pattern.len() - 1;
        debug!(
            "KMP parallel scan: {} bytes, {} workers",
            text.len(),
            workers
        );

        let started = Instant::now();
        let positions = scan_chunks(text.len(), overlap, workers, |chunk| {
            self.scan_window(text, chunk.start, chunk.scan_end)
                .into_iter()
                .filter(|&pos| chunk.owns(pos))
                .collect()
        })?;

        Ok(SearchOutput::parallel(
            Algorithm::Kmp,
            positions,
            started.elapsed(),
            workers.get(),
        ))
    }
}
