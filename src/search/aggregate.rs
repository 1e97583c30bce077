use crate::results::SearchResult as SearchOutput;

/// Merges per-worker match lists into one ascending, duplicate-free
/// sequence.
///
/// Workers are concatenated in index order. Chunk ranges are disjoint and
/// increasing and each worker emits in scan order, so the concatenation is
/// already sorted for the single-pattern engines; the sort and dedup are a
/// correctness safety net, not a structural necessity (the multi-pattern
/// engine emits by match end, which is why the sequential path applies the
/// same discipline).
pub fn merge_positions(worker_results: Vec<Vec<usize>>) -> Vec<usize> {
    let mut merged: Vec<usize> = worker_results.into_iter().flatten().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

/// Checks that a parallel scan reproduced the sequential baseline exactly:
/// same algorithm and the same ascending position sequence, not just the
/// same set. A validation aid for drivers; the engines never call it.
pub fn results_match(sequential: &SearchOutput, parallel: &SearchOutput) -> bool {
    sequential.algorithm == parallel.algorithm && sequential.positions == parallel.positions
}
