use std::fmt;
use std::time::Duration;

/// Identifies which matching algorithm produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Kmp,
    BoyerMoore,
    AhoCorasick,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Kmp => "Knuth-Morris-Pratt",
            Algorithm::BoyerMoore => "Boyer-Moore",
            Algorithm::AhoCorasick => "Aho-Corasick",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The outcome of one scan invocation.
///
/// Positions are zero-based match start offsets, ascending and free of
/// duplicates. A parallel scan over the same input always yields the same
/// position sequence as the sequential baseline; `worker_count` and
/// `parallel` exist so a reporting layer can label the run, nothing in the
/// crate branches on them after the scan completes.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Which engine produced this result
    pub algorithm: Algorithm,
    /// Ascending, duplicate-free match start offsets
    pub positions: Vec<usize>,
    /// Time spent scanning, preprocessing excluded
    pub elapsed: Duration,
    /// Number of workers that took part in the scan
    pub worker_count: usize,
    /// Whether the scan was partitioned across workers
    pub parallel: bool,
}

impl SearchResult {
    /// Creates a result for a single-threaded scan
    pub fn sequential(algorithm: Algorithm, positions: Vec<usize>, elapsed: Duration) -> Self {
        Self {
            algorithm,
            positions,
            elapsed,
            worker_count: 1,
            parallel: false,
        }
    }

    /// Creates a result for a partitioned scan
    pub fn parallel(
        algorithm: Algorithm,
        positions: Vec<usize>,
        elapsed: Duration,
        worker_count: usize,
    ) -> Self {
        Self {
            algorithm,
            positions,
            elapsed,
            worker_count,
            parallel: true,
        }
    }

    /// Number of matches found
    pub fn match_count(&self) -> usize {
        self.positions.len()
    }

    /// True when the scan found no matches
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
