//! Delegation to an external combinatorial optimiser.
//!
//! The optimiser sees an integer cost matrix and a start/end pair; the
//! adapter translates its answer back into a [`Tour`] priced with the
//! original floating-point costs.

use log::{debug, warn};

use crate::matrix::CostMatrix;
use crate::solver::{TourError, TourSolver, ensure_size};
use crate::tour::{Algorithm, AlgorithmLabel, Tour, TourMode};

/// Integer cost standing in for an infinite edge.
pub const UNREACHABLE_COST: i64 = 1 << 40;

/// Problem handed to an [`ExternalSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProblem {
    /// Truncated integer costs; `UNREACHABLE_COST` marks missing edges.
    pub costs: Vec<Vec<i64>>,
    /// Node the route starts at.
    pub start: usize,
    /// Node the route ends at; equal to `start` for round trips.
    pub end: usize,
}

impl ExternalProblem {
    /// Convert a cost matrix into an optimiser problem for `mode`.
    ///
    /// ```
    /// use tour_core::{CostMatrix, ExternalProblem, TourMode, UNREACHABLE_COST};
    ///
    /// # fn main() -> Result<(), tour_core::MatrixError> {
    /// let costs = CostMatrix::from_rows(vec![
    ///     vec![0.0, 2.9],
    ///     vec![f64::INFINITY, 0.0],
    /// ])?;
    /// let problem = ExternalProblem::from_costs(&costs, TourMode::RoundTrip);
    /// assert_eq!(problem.costs, vec![vec![0, 2], vec![UNREACHABLE_COST, 0]]);
    /// assert!(problem.is_round_trip());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn from_costs(costs: &CostMatrix, mode: TourMode) -> Self {
        let size = costs.size();
        let matrix = (0..size)
            .map(|from| {
                (0..size)
                    .map(|to| {
                        if from == to {
                            0
                        } else {
                            integer_cost(costs.cost(from, to))
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            costs: matrix,
            start: 0,
            end: mode.end_index(size),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.costs.len()
    }

    /// Whether the route returns to its start.
    #[must_use]
    pub const fn is_round_trip(&self) -> bool {
        self.start == self.end
    }

    /// Integer cost between two nodes; `UNREACHABLE_COST` when out of range.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.costs
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(UNREACHABLE_COST)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "costs are truncated to whole units and clamped below UNREACHABLE_COST"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "UNREACHABLE_COST is exactly representable as f64"
)]
fn integer_cost(cost: f64) -> i64 {
    let ceiling = UNREACHABLE_COST as f64;
    if cost.is_finite() && cost < ceiling {
        cost.trunc() as i64
    } else {
        UNREACHABLE_COST
    }
}

/// Node sequence returned by an [`ExternalSolver`].
///
/// The route runs from the problem's start to its end inclusive. For round
/// trips the closing depot may be written either as `0` or as `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSolution {
    /// Visited nodes in order.
    pub route: Vec<usize>,
}

/// A combinatorial optimiser for single-vehicle routes.
pub trait ExternalSolver: Send + Sync {
    /// Solve `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::SolverFailure`] when no solution was found.
    fn solve(&self, problem: &ExternalProblem) -> Result<ExternalSolution, TourError>;
}

/// Exposes an [`ExternalSolver`] as a [`TourSolver`].
#[derive(Debug, Clone, Default)]
pub struct ExternalSolverAdapter<S> {
    solver: S,
}

impl<S: ExternalSolver> ExternalSolverAdapter<S> {
    /// Wrap `solver`.
    #[must_use]
    pub const fn new(solver: S) -> Self {
        Self { solver }
    }

    /// Borrow the wrapped optimiser.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.solver
    }
}

impl<S: ExternalSolver> TourSolver for ExternalSolverAdapter<S> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ExternalSolver
    }

    fn solve(&self, costs: &CostMatrix, mode: TourMode) -> Result<Tour, TourError> {
        let size = costs.size();
        ensure_size(size, mode)?;
        let problem = ExternalProblem::from_costs(costs, mode);
        let solution = self.solver.solve(&problem)?;
        debug!("external solver returned route {:?}", solution.route);

        let order: Vec<usize> = solution
            .route
            .iter()
            .map(|&node| if node == size { 0 } else { node })
            .collect();
        let tour = Tour::from_order(&order, costs, AlgorithmLabel::new(mode, Algorithm::ExternalSolver));
        if !tour.is_complete(size, mode) {
            warn!("external solver returned an invalid route {order:?}");
            return Err(TourError::SolverFailure {
                message: format!("invalid visit sequence {order:?}"),
            });
        }
        if !tour.cost().is_finite() {
            return Err(TourError::NoFeasibleTour {
                algorithm: Algorithm::ExternalSolver,
            });
        }
        Ok(tour)
    }
}
