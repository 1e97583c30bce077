//! The three exact-matching engines and the machinery that makes their
//! parallel scans correct.
//!
//! # Partitioned scanning
//!
//! A parallel scan splits the text into one chunk per worker. Each chunk has
//! a *nominal* range, which tiles the text without gaps or overlap, and a
//! *scan* range, which extends past the nominal end by `pattern_len - 1`
//! bytes (`max_pattern_len - 1` for multi-pattern search). The extension
//! guarantees that an occurrence straddling a nominal boundary is fully
//! visible to the worker that owns its start offset.
//!
//! Ownership is decided by start offset alone: a worker reports an
//! occurrence if and only if the occurrence starts inside the worker's
//! nominal range. Every occurrence therefore appears in exactly one
//! worker's output, and concatenating the per-worker outputs reproduces the
//! sequential result.
//!
//! # Worker model
//!
//! Parallel scans run on a fixed-size rayon pool built for the call. Each
//! worker scans its chunk to completion against the shared, read-only text
//! and preprocessing structures, collecting matches into a private buffer.
//! The join at the end of the fan-out is the only synchronization point;
//! there are no locks and no shared mutable collections.
pub mod aggregate;
pub mod aho_corasick;
pub mod boyer_moore;
pub mod kmp;
pub mod partition;

use rayon::prelude::*;
use std::num::NonZeroUsize;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};
use aggregate::merge_positions;
use partition::{partition, Chunk};

/// Runs one scan closure per chunk on a pool of `worker_count` threads and
/// merges the per-worker outputs.
///
/// The closure receives a chunk and returns the start offsets it owns, in
/// local scan order. Chunks are handed out in index order; the call blocks
/// until every worker has finished.
pub(crate) fn scan_chunks<F>(
    text_len: usize,
    overlap: usize,
    worker_count: NonZeroUsize,
    scan: F,
) -> SearchResult<Vec<usize>>
where
    F: Fn(Chunk) -> Vec<usize> + Send + Sync,
{
    let chunks = partition(text_len, worker_count, overlap);
    debug!(
        "Partitioned {} bytes into {} chunks for {} workers (overlap {})",
        text_len,
        chunks.len(),
        worker_count,
        overlap
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count.get())
        .build()
        .map_err(|e| SearchError::thread_pool(e.to_string()))?;

    let per_worker: Vec<Vec<usize>> =
        pool.install(|| chunks.par_iter().map(|chunk| scan(*chunk)).collect());

    Ok(merge_positions(per_worker))
}
