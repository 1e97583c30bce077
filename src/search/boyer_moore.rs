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

const ALPHABET_SIZE: usize = 256;

static BAD_CHAR_CACHE: Lazy<DashMap<Vec<u8>, Arc<BadCharacterTable>>> = Lazy::new(DashMap::new);

/// Rightmost occurrence index of every byte in a pattern, `-1` when the
/// byte does not occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadCharacterTable {
    last: [isize; ALPHABET_SIZE],
}

impl BadCharacterTable {
    /// Builds the table in O(m + 256); later occurrences overwrite earlier
    /// ones, leaving the rightmost index per byte.
    pub fn build(pattern: &[u8]) -> Self {
        let mut last = [-1isize; ALPHABET_SIZE];
        for (i, &byte) in pattern.iter().enumerate() {
            last[byte as usize] = i as isize;
        }
        Self { last }
    }

    /// Rightmost index of `byte` in the pattern, or `-1`
    pub fn last_index(&self, byte: u8) -> isize {
        self.last[byte as usize]
    }
}

/// Boyer-Moore searcher for a single pattern, using the bad-character
/// heuristic.
#[derive(Debug, Clone)]
pub struct BoyerMooreSearcher {
    pattern: Vec<u8>,
    bad_char: Arc<BadCharacterTable>,
    metrics: Arc<ScanMetrics>,
}

impl BoyerMooreSearcher {
    /// Creates a searcher for the given pattern.
    ///
    /// The bad-character table is built once per distinct pattern and
    /// cached process-wide. An empty pattern is rejected.
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

        let bad_char = if let Some(entry) = BAD_CHAR_CACHE.get(pattern) {
            metrics.record_cache_operation(true);
            entry.clone()
        } else {
            let table = Arc::new(BadCharacterTable::build(pattern));
            metrics.record_cache_operation(false);
            BAD_CHAR_CACHE.insert(pattern.to_vec(), table.clone());
            table
        };

        Ok(Self {
            pattern: pattern.to_vec(),
            bad_char,
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
    /// offsets of every occurrence fully inside the window, ascending.
    fn scan_window(&self, text: &[u8], window_start: usize, window_end: usize) -> Vec<usize> {
        let m = self.pattern.len();
        let window = &text[window_start..window_end];
        self.metrics.record_chunk(window.len() as u64);
        if m > window.len() {
            return Vec::new();
        }

        let mut positions = Vec::new();
        let mut i = 0;
        while i + m <= window.len() {
            // Compare right to left under the current alignment
            let mut j = (m - 1) as isize;
            while j >= 0 && self.pattern[j as usize] == window[i + j as usize] {
                j -= 1;
            }

            if j < 0 {
                positions.push(window_start + i);
                // Advance by one so overlapping occurrences are found
                i += 1;
            } else {
                let mismatched = window[i + j as usize];
                let shift = j - self.bad_char.last_index(mismatched);
                // The mismatching byte may occur only to the right of j,
                // making the raw shift zero or negative
                i += shift.max(1) as usize;
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
        SearchOutput::sequential(Algorithm::BoyerMoore, positions, started.elapsed())
    }

    /// Scans the text partitioned across `worker_count` workers.
    ///
    /// `0` means auto: use the available parallelism. Each worker aligns the
    /// pattern freshly at its chunk start; the overlap of `pattern_len - 1`
    /// bytes keeps boundary-straddling occurrences visible to their owning
    /// worker. The result equals the sequential one.
    pub fn search_parallel(
        &self,
        text: &[u8],
        worker_count: usize,
    ) -> SearchResult<SearchOutput> {
        let workers = resolve_worker_count(worker_count);
        let overlap = self.pattern.len() - 1;
        debug!(
            "Boyer-Moore parallel scan: {} bytes, {} workers",
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
            Algorithm::BoyerMoore,
            positions,
            started.elapsed(),
            workers.get(),
        ))
    }
}
