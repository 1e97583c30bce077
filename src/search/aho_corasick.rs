use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::scan_chunks;
use crate::config::resolve_worker_count;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;
use crate::results::{Algorithm, SearchResult as SearchOutput};

const ALPHABET_SIZE: usize = 256;
const NO_STATE: u32 = u32::MAX;
const ROOT: u32 = 0;

/// One automaton state: a dense child array indexed by byte value, a
/// failure link, and the indices of every pattern that terminates at this
/// state or at a state along its failure chain.
#[derive(Debug, Clone)]
struct AutomatonNode {
    children: [u32; ALPHABET_SIZE],
    fail: u32,
    output: Vec<u32>,
}

impl AutomatonNode {
    fn new() -> Self {
        Self {
            children: [NO_STATE; ALPHABET_SIZE],
            fail: ROOT,
            output: Vec::new(),
        }
    }
}

/// Accumulates patterns into a trie before failure links exist.
///
/// `build` consumes the builder, so a frozen automaton can never be
/// mutated: adding a pattern after build is a compile error, not a silent
/// no-op. Patterns are indexed by insertion order and duplicates keep
/// separate entries.
#[derive(Debug, Clone)]
pub struct AhoCorasickBuilder {
    nodes: Vec<AutomatonNode>,
    pattern_lens: Vec<usize>,
}

impl Default for AhoCorasickBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AhoCorasickBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![AutomatonNode::new()],
            pattern_lens: Vec::new(),
        }
    }

    /// Inserts one pattern into the trie. An empty pattern is rejected.
    pub fn add_pattern(&mut self, pattern: impl AsRef<[u8]>) -> SearchResult<&mut Self> {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            return Err(SearchError::invalid_pattern("pattern must not be empty"));
        }

        let mut state = ROOT as usize;
        for &byte in pattern {
            let next = self.nodes[state].children[byte as usize];
            state = if next == NO_STATE {
                let id = self.nodes.len() as u32;
                self.nodes.push(AutomatonNode::new());
                self.nodes[state].children[byte as usize] = id;
                id as usize
            } else {
                next as usize
            };
        }

        let index = self.pattern_lens.len() as u32;
        self.pattern_lens.push(pattern.len());
        self.nodes[state].output.push(index);
        Ok(self)
    }

    /// Inserts several patterns in order.
    pub fn add_patterns<I, P>(&mut self, patterns: I) -> SearchResult<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        for pattern in patterns {
            self.add_pattern(pattern)?;
        }
        Ok(self)
    }

    /// Number of patterns inserted so far
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Computes failure links and propagated output sets, freezing the
    /// automaton.
    ///
    /// Breadth-first from the root: depth-1 states fail to the root. A
    /// state reached via byte `c` from a parent with failure state `pf`
    /// fails to the first state along `pf`'s failure chain that has a
    /// `c`-transition, the root terminating the chain; a resolved target
    /// equal to the state itself falls back to the root. Output sets are
    /// extended with the failure target's outputs, so shorter suffix
    /// matches surface without chasing links during the scan.
    pub fn build(mut self) -> AhoCorasick {
        let mut queue = VecDeque::new();

        for byte in 0..ALPHABET_SIZE {
            let child = self.nodes[ROOT as usize].children[byte];
            if child != NO_STATE {
                self.nodes[child as usize].fail = ROOT;
                queue.push_back(child);
            }
        }

        while let Some(state) = queue.pop_front() {
            for byte in 0..ALPHABET_SIZE {
                let child = self.nodes[state as usize].children[byte];
                if child == NO_STATE {
                    continue;
                }
                queue.push_back(child);

                let mut fail = self.nodes[state as usize].fail;
                let target = loop {
                    let next = self.nodes[fail as usize].children[byte];
                    if next != NO_STATE {
                        break next;
                    }
                    if fail == ROOT {
                        break ROOT;
                    }
                    fail = self.nodes[fail as usize].fail;
                };
                let target = if target == child { ROOT } else { target };

                let inherited = self.nodes[target as usize].output.clone();
                let node = &mut self.nodes[child as usize];
                node.fail = target;
                node.output.extend(inherited);
            }
        }

        let max_pattern_len = self.pattern_lens.iter().copied().max().unwrap_or(0);
        debug!(
            "Built Aho-Corasick automaton: {} states, {} patterns",
            self.nodes.len(),
            self.pattern_lens.len()
        );

        AhoCorasick {
            nodes: self.nodes,
            pattern_lens: self.pattern_lens,
            max_pattern_len,
            metrics: Arc::new(ScanMetrics::new()),
        }
    }
}

/// A frozen multi-pattern automaton: the pattern trie completed with
/// failure links into a deterministic matcher, safe to share across
/// workers.
///
/// An automaton built from zero patterns is valid and matches nothing.
#[derive(Debug, Clone)]
pub struct AhoCorasick {
    nodes: Vec<AutomatonNode>,
    pattern_lens: Vec<usize>,
    max_pattern_len: usize,
    metrics: Arc<ScanMetrics>,
}

impl AhoCorasick {
    /// Builds an automaton from the given patterns in one step.
    pub fn new<I, P>(patterns: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut builder = AhoCorasickBuilder::new();
        builder.add_patterns(patterns)?;
        Ok(builder.build())
    }

    pub fn builder() -> AhoCorasickBuilder {
        AhoCorasickBuilder::new()
    }

    /// Number of patterns in the automaton
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Length of the longest pattern, 0 when empty
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// Gets the current scan metrics
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Scans `text[window_start..window_end]`, returning absolute start
    /// offsets of every occurrence of any pattern fully inside the window,
    /// ascending and duplicate-free.
    ///
    /// The raw automaton emits in match-end order; sorting and deduping
    /// here keeps the sequential and parallel paths byte-for-byte
    /// comparable. An offset where several patterns start is reported once.
    fn scan_window(&self, text: &[u8], window_start: usize, window_end: usize) -> Vec<usize> {
        let window = &text[window_start..window_end];
        self.metrics.record_chunk(window.len() as u64);

        let mut positions = Vec::new();
        let mut state = ROOT as usize;
        for (i, &byte) in window.iter().enumerate() {
            loop {
                let next = self.nodes[state].children[byte as usize];
                if next != NO_STATE {
                    state = next as usize;
                    break;
                }
                if state == ROOT as usize {
                    break;
                }
                state = self.nodes[state].fail as usize;
            }

            for &pattern_index in &self.nodes[state].output {
                let len = self.pattern_lens[pattern_index as usize];
                positions.push(window_start + i + 1 - len);
            }
        }

        positions.sort_unstable();
        positions.dedup();
        self.metrics.record_matches(positions.len() as u64);
        positions
    }

    /// Scans the whole text in one pass.
    pub fn search_sequential(&self, text: &[u8]) -> SearchOutput {
        let started = Instant::now();
        let positions = self.scan_window(text, 0, text.len());
        SearchOutput::sequential(Algorithm::AhoCorasick, positions, started.elapsed())
    }

    /// Scans the text partitioned across `worker_count` workers.
    ///
    /// `0` means auto: use the available parallelism. Every worker
    /// traverses the shared automaton from the root over its own chunk; the
    /// overlap of `max_pattern_len - 1` bytes covers the longest pattern
    /// straddling a boundary. The result equals the sequential one.
    pub fn search_parallel(
        &self,
        text: &[u8],
        worker_count: usize,
    ) -> SearchResult<SearchOutput> {
        let workers = resolve_worker_count(worker_count);
        let overlap = self.max_pattern_len.saturating_sub(1);
        debug!(
            "Aho-Corasick parallel scan: {} bytes, {} workers, {} patterns",
            text.len(),
            workers,
            self.pattern_count()
        );

        let started = Instant::now();
        let positions = scan_chunks(text.len(), overlap, workers, |chunk| {
            self.scan_window(text, chunk.start, chunk.scan_end)
                .into_iter()
                .filter(|&pos| chunk.owns(pos))
                .collect()
        })?;

        Ok(SearchOutput::parallel(
            Algorithm::AhoCorasick,
            positions,
            started.elapsed(),
            workers.get(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_rejected() {
        let mut builder = AhoCorasickBuilder::new();
        let err = builder.add_pattern(b"").unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
    }

    #[test]
    fn test_empty_automaton_matches_nothing() {
        let automaton = AhoCorasickBuilder::new().build();
        assert_eq!(automaton.pattern_count(), 0);
        assert_eq!(automaton.max_pattern_len(), 0);

        let result = automaton.search_sequential(b"anything at all");
        assert!(result.is_empty());

        let parallel = automaton.search_parallel(b"anything at all", 4).unwrap();
        assert!(parallel.is_empty());
    }

    #[test]
    fn test_single_pattern() {
        let automaton = AhoCorasick::new([b"abc"]).unwrap();
        let result = automaton.search_sequential(b"xxabcxabc");
        assert_eq!(result.positions, vec![2, 6]);
        assert_eq!(result.algorithm, Algorithm::AhoCorasick);
    }

    #[test]
    fn test_suffix_pattern_found_via_failure_links() {
        // "BC" is a suffix of "ABC"; failure-link propagation must surface
        // both when the longer pattern matches.
        let automaton = AhoCorasick::new([&b"ABC"[..], &b"BC"[..]]).unwrap();
        let result = automaton.search_sequential(b"XABCX");
        assert_eq!(result.positions, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_patterns_keep_separate_entries() {
        let mut builder = AhoCorasickBuilder::new();
        builder.add_pattern(b"AB").unwrap();
        builder.add_pattern(b"AB").unwrap();
        assert_eq!(builder.pattern_count(), 2);

        // The report carries each start offset once
        let automaton = builder.build();
        let result = automaton.search_sequential(b"xABx");
        assert_eq!(result.positions, vec![1]);
    }

    #[test]
    fn test_same_start_different_lengths_reported_once() {
        let automaton = AhoCorasick::new([&b"AB"[..], &b"ABC"[..]]).unwrap();
        let result = automaton.search_sequential(b"zABCz");
        assert_eq!(result.positions, vec![1]);
    }

    #[test]
    fn test_overlapping_multi_pattern() {
        let automaton = AhoCorasick::new([&b"he"[..], &b"she"[..], &b"his"[..], &b"hers"[..]])
            .unwrap();
        let result = automaton.search_sequential(b"ushers");
        // "she" at 1, "he" at 2, "hers" at 2 (offset reported once)
        assert_eq!(result.positions, vec![1, 2]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let automaton = AhoCorasick::new([&b"ABA"[..], &b"BAB"[..], &b"A"[..]]).unwrap();
        let text = b"ABABABAXBABA";
        let sequential = automaton.search_sequential(text);

        for worker_count in 1..=text.len() {
            let parallel = automaton.search_parallel(text, worker_count).unwrap();
            assert_eq!(
                parallel.positions, sequential.positions,
                "worker count {}",
                worker_count
            );
        }
    }
}
