//! Exhaustive permutation search.

use log::debug;

use crate::matrix::CostMatrix;
use crate::progress::{ProgressCallback, ProgressReporter};
use crate::solver::{TourError, TourSolver, ensure_size};
use crate::tour::{Algorithm, AlgorithmLabel, Tour, TourMode};

/// Finds the optimal tour by trying every ordering of the intermediate
/// waypoints.
///
/// Orderings are visited in lexicographic order and the first minimum wins,
/// so ties resolve to the lexicographically smallest sequence. Runtime grows
/// factorially; about a dozen intermediates is the practical ceiling.
///
/// # Examples
///
/// ```
/// use tour_core::{CostMatrix, ExactSolver, TourMode, TourSolver};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 9.0, 9.0],
///     vec![9.0, 0.0, 2.0, 9.0],
///     vec![9.0, 9.0, 0.0, 3.0],
///     vec![9.0, 9.0, 9.0, 0.0],
/// ])?;
/// let tour = ExactSolver::new().solve(&costs, TourMode::OneWay)?;
/// assert_eq!(tour.order(), vec![0, 1, 2, 3]);
/// assert_eq!(tour.cost(), 6.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ExactSolver {
    progress: Option<ProgressCallback>,
}

impl ExactSolver {
    /// Create a solver without progress reporting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `(evaluated, total)` permutations while searching.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl std::fmt::Debug for ExactSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactSolver")
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl TourSolver for ExactSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::BruteForce
    }

    fn solve(&self, costs: &CostMatrix, mode: TourMode) -> Result<Tour, TourError> {
        let size = costs.size();
        ensure_size(size, mode)?;
        let end = mode.end_index(size);
        let mut intermediates: Vec<usize> = match mode {
            TourMode::RoundTrip => (1..size).collect(),
            TourMode::OneWay => (1..end).collect(),
        };
        let total = permutation_count(intermediates.len());
        let reporter = ProgressReporter::new(self.progress.as_ref(), total);
        debug!(
            "brute force over {} intermediates ({total} permutations)",
            intermediates.len()
        );

        let mut best: Option<(f64, Vec<usize>)> = None;
        let mut evaluated: u64 = 0;
        loop {
            let limit = best.as_ref().map_or(f64::INFINITY, |(cost, _)| *cost);
            let cost = path_cost(costs, &intermediates, end, limit);
            if best.is_none() || cost < limit {
                best = Some((cost, intermediates.clone()));
            }
            evaluated = evaluated.saturating_add(1);
            reporter.tick(evaluated);
            if !next_permutation(&mut intermediates) {
                break;
            }
        }

        let label = AlgorithmLabel::new(mode, Algorithm::BruteForce);
        match best {
            Some((cost, order)) if cost.is_finite() => {
                let mut stops = Vec::with_capacity(order.len() + 2);
                stops.push(0);
                stops.extend(order);
                stops.push(end);
                Ok(Tour::from_order(&stops, costs, label))
            }
            _ => Err(TourError::NoFeasibleTour {
                algorithm: Algorithm::BruteForce,
            }),
        }
    }
}

/// Cost of `0 -> intermediates... -> end`, abandoning the sum once it
/// reaches `limit`.
#[expect(
    clippy::float_arithmetic,
    reason = "path cost is the sum of floating-point edge costs"
)]
fn path_cost(costs: &CostMatrix, intermediates: &[usize], end: usize, limit: f64) -> f64 {
    let mut previous = 0;
    let mut total = 0.0;
    for &stop in intermediates.iter().chain(std::iter::once(&end)) {
        total += costs.cost(previous, stop);
        if total >= limit {
            return total;
        }
        previous = stop;
    }
    total
}

/// Rearrange `items` into the next lexicographic permutation.
///
/// Returns `false` once `items` is in descending order.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items
        .windows(2)
        .rposition(|pair| matches!(pair, [a, b] if a < b))
    else {
        return false;
    };
    let Some(&pivot_value) = items.get(pivot) else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|&item| item > pivot_value) else {
        return false;
    };
    items.swap(pivot, successor);
    if let Some(tail) = items.get_mut(pivot + 1..) {
        tail.reverse();
    }
    true
}

fn permutation_count(items: usize) -> u64 {
    (1..=u64::try_from(items).unwrap_or(u64::MAX))
        .try_fold(1_u64, u64::checked_mul)
        .unwrap_or(u64::MAX)
}
