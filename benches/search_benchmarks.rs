use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parmatch::{AhoCorasick, BoyerMooreSearcher, KmpSearcher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TEXT_LEN: usize = 4 * 1024 * 1024;
const SEED: u64 = 0x5eed_cafe;

/// Builds a reproducible text over a small alphabet so every engine sees
/// plenty of partial matches.
fn build_text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| b'A' + rng.gen_range(0u8..4)).collect()
}

fn bench_sequential_engines(c: &mut Criterion) {
    let text = build_text(TEXT_LEN, SEED);
    let pattern = b"ABCADCAB";

    let kmp = KmpSearcher::new(pattern).unwrap();
    let bm = BoyerMooreSearcher::new(pattern).unwrap();
    let ac = AhoCorasick::new([pattern]).unwrap();

    let mut group = c.benchmark_group("Sequential");
    group.bench_function("kmp", |b| {
        b.iter(|| black_box(kmp.search_sequential(&text)));
    });
    group.bench_function("boyer_moore", |b| {
        b.iter(|| black_box(bm.search_sequential(&text)));
    });
    group.bench_function("aho_corasick", |b| {
        b.iter(|| black_box(ac.search_sequential(&text)));
    });
    group.finish();
}

fn bench_parallel_scaling(c: &mut Criterion) {
    let text = build_text(TEXT_LEN, SEED);
    let pattern = b"ABCADCAB";

    let kmp = KmpSearcher::new(pattern).unwrap();
    let bm = BoyerMooreSearcher::new(pattern).unwrap();
    let ac = AhoCorasick::new([pattern]).unwrap();

    let mut group = c.benchmark_group("Parallel Scaling");
    for workers in [1, 2, 4, 8] {
        group.bench_function(format!("kmp_{}_workers", workers), |b| {
            b.iter(|| black_box(kmp.search_parallel(&text, workers).unwrap()));
        });
        group.bench_function(format!("boyer_moore_{}_workers", workers), |b| {
            b.iter(|| black_box(bm.search_parallel(&text, workers).unwrap()));
        });
        group.bench_function(format!("aho_corasick_{}_workers", workers), |b| {
            b.iter(|| black_box(ac.search_parallel(&text, workers).unwrap()));
        });
    }
    group.finish();
}

fn bench_multi_pattern(c: &mut Criterion) {
    let text = build_text(TEXT_LEN, SEED);
    let patterns: Vec<Vec<u8>> = (0..16u64)
        .map(|i| build_text(4 + (i % 5) as usize, SEED.wrapping_add(i + 1)))
        .collect();
    let ac = AhoCorasick::new(&patterns).unwrap();

    let mut group = c.benchmark_group("Multi Pattern");
    group.bench_function("aho_corasick_sequential", |b| {
        b.iter(|| black_box(ac.search_sequential(&text)));
    });
    group.bench_function("aho_corasick_parallel_auto", |b| {
        b.iter(|| black_box(ac.search_parallel(&text, 0).unwrap()));
    });
    group.finish();
}

fn bench_preprocessing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preprocessing");
    group.bench_function("automaton_build_64_patterns", |b| {
        let patterns: Vec<Vec<u8>> = (0..64u64)
            .map(|i| build_text(8, SEED.wrapping_add(i)))
            .collect();
        b.iter(|| black_box(AhoCorasick::new(&patterns).unwrap()));
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_sequential_engines, bench_parallel_scaling,
              bench_multi_pattern, bench_preprocessing
}

criterion_main!(benches);
