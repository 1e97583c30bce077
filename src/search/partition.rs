use std::num::NonZeroUsize;

/// A contiguous slice of the text assigned to one worker.
///
/// `[start, end)` is the nominal range; the ranges of all chunks tile the
/// text exactly. `[start, scan_end)` is the range the worker actually
/// scans, extended so a match starting anywhere in the nominal range fits
/// inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Worker index this chunk is assigned to
    pub index: usize,
    /// Nominal range start (inclusive)
    pub start: usize,
    /// Nominal range end (exclusive)
    pub end: usize,
    /// Scan range end (exclusive), `min(end + overlap, text_len)`
    pub scan_end: usize,
}

impl Chunk {
    /// True when this chunk's worker is responsible for reporting a match
    /// starting at `offset`.
    pub fn owns(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Length of the scan range
    pub fn scan_len(&self) -> usize {
        self.scan_end - self.start
    }
}

/// Splits `text_len` bytes into at most `worker_count` chunks.
///
/// The nominal chunk size is `ceil(text_len / worker_count)`; the final
/// chunk is clipped to the text. Workers whose nominal range would start at
/// or past the end of the text receive no chunk, so the returned vector can
/// be shorter than `worker_count`. An empty text yields no chunks.
pub fn partition(text_len: usize, worker_count: NonZeroUsize, overlap: usize) -> Vec<Chunk> {
    if text_len == 0 {
        return Vec::new();
    }

    let workers = worker_count.get();
    let chunk_size = text_len.div_ceil(workers);
    let mut chunks = Vec::with_capacity(workers);

    for index in 0..workers {
        let start = index * chunk_size;
        if start >= text_len {
            break;
        }
        let end = (start + chunk_size).min(text_len);
        let scan_end = (end + overlap).min(text_len);
        chunks.push(Chunk {
            index,
            start,
            end,
            scan_end,
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_nominal_ranges_tile_the_text() {
        for text_len in [1, 7, 16, 100, 101] {
            for worker_count in 1..=10 {
                let chunks = partition(text_len, workers(worker_count), 3);

                // Contiguous, in order, covering exactly [0, text_len)
                assert_eq!(chunks[0].start, 0);
                assert_eq!(chunks.last().unwrap().end, text_len);
                for pair in chunks.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
            }
        }
    }

    #[test]
    fn test_overlap_extends_scan_range() {
        let chunks = partition(100, workers(4), 5);
        assert_eq!(chunks.len(), 4);
        for chunk in &chunks[..3] {
            assert_eq!(chunk.scan_end, chunk.end + 5);
        }
        // Final chunk is clipped to the text
        assert_eq!(chunks[3].scan_end, 100);
    }

    #[test]
    fn test_more_workers_than_bytes() {
        let chunks = partition(3, workers(8), 1);
        // chunk_size is 1; only 3 workers get a chunk
        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.start, i);
            assert_eq!(chunk.end, i + 1);
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(partition(0, workers(4), 2).is_empty());
    }

    #[test]
    fn test_single_worker_gets_everything() {
        let chunks = partition(42, workers(1), 9);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[0].end, 42);
        assert_eq!(chunks[0].scan_end, 42);
    }

    #[test]
    fn test_ownership_is_exclusive() {
        let chunks = partition(50, workers(7), 4);
        for offset in 0..50 {
            let owners = chunks.iter().filter(|c| c.owns(offset)).count();
            assert_eq!(owners, 1, "offset {} must have exactly one owner", offset);
        }
    }
}
