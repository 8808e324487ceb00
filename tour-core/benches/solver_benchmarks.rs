//! Criterion benchmarks for the tour solvers.
//!
//! Measures the heuristics across problem sizes and the exhaustive search on
//! the small sizes it can handle.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package tour-core
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tour_core::{
    CostMatrix, ExactSolver, GreedyEdgeSolver, Matrix, NearestNeighborSolver, TourMode, TourSolver,
};

/// Seed for deterministic matrix generation.
const BENCHMARK_SEED: u64 = 42;

/// Sizes for the polynomial-time heuristics.
const HEURISTIC_SIZES: &[usize] = &[10, 25, 50];

/// Sizes the exhaustive search finishes on quickly.
const EXACT_SIZES: &[usize] = &[6, 8, 9];

/// Random asymmetric matrix with costs between 1 and 1000.
fn random_matrix(size: usize, seed: u64) -> CostMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells = Matrix::from_fn(size, |from, to| {
        if from == to {
            0.0
        } else {
            rng.gen_range(1.0..1000.0)
        }
    });
    CostMatrix::new(cells).unwrap_or_else(|_| CostMatrix::unreachable(size))
}

fn bench_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristics");
    let solvers: [(&str, &dyn TourSolver); 2] = [
        ("greedy", &GreedyEdgeSolver),
        ("nearest_neighbor", &NearestNeighborSolver),
    ];

    for &size in HEURISTIC_SIZES {
        let costs = random_matrix(size, BENCHMARK_SEED);
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        for (name, solver) in solvers {
            for mode in [TourMode::RoundTrip, TourMode::OneWay] {
                let id = BenchmarkId::new(format!("{name}/{mode}"), size);
                group.bench_with_input(id, &costs, |b, costs| {
                    b.iter(|| black_box(solver.solve(costs, mode)));
                });
            }
        }
    }

    group.finish();
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.sample_size(10);
    let solver = ExactSolver::new();

    for &size in EXACT_SIZES {
        let costs = random_matrix(size, BENCHMARK_SEED);
        group.bench_with_input(BenchmarkId::new("round_trip", size), &costs, |b, costs| {
            b.iter(|| black_box(solver.solve(costs, TourMode::RoundTrip)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_heuristics, bench_exact);
criterion_main!(benches);
