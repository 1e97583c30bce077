use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks scan activity and preprocessing cache behavior
#[derive(Debug, Clone, Default)]
pub struct ScanMetrics {
    bytes_scanned: Arc<AtomicU64>,
    chunks_scanned: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,

    // Preprocessing cache metrics
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one scanned chunk of the given length
    pub fn record_chunk(&self, bytes: u64) {
        self.chunks_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records matches emitted by one scan
    pub fn record_matches(&self, count: u64) {
        self.matches_found.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a preprocessing cache lookup
    pub fn record_cache_operation(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Gets a snapshot of the current counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            chunks_scanned: self.chunks_scanned.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Bytes scanned: {}\n\
             Chunks scanned: {}\n\
             Matches found: {}\n\
             Cache hits/misses: {}/{}",
            stats.bytes_scanned,
            stats.chunks_scanned,
            stats.matches_found,
            stats.cache_hits,
            stats.cache_misses
        );
    }
}

/// Snapshot of scan activity counters
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    pub bytes_scanned: u64,
    pub chunks_scanned: u64,
    pub matches_found: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
