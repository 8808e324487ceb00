//! Tour construction strategies.
//!
//! Every strategy implements [`TourSolver`]: it reads an immutable
//! [`CostMatrix`] and returns a [`Tour`] for the requested [`TourMode`].
//! Solvers never call each other and never mutate their input.

mod edge_cost;
mod error;
mod exact;
mod external;
mod greedy;
mod nearest_neighbor;

pub use edge_cost::{EdgeCost, OracleEdgeCost, RotatedCosts};
pub use error::TourError;
pub use exact::ExactSolver;
pub use external::{
    ExternalProblem, ExternalSolution, ExternalSolver, ExternalSolverAdapter, UNREACHABLE_COST,
};
pub use greedy::GreedyEdgeSolver;
pub use nearest_neighbor::{NearestNeighborSolver, Walk};

use crate::matrix::CostMatrix;
use crate::tour::{Algorithm, Tour, TourMode};

/// Builds a tour from a cost matrix.
///
/// Implementations must be thread-safe (`Send + Sync`) so an engine can
/// share them.
///
/// # Examples
///
/// ```
/// use tour_core::{CostMatrix, GreedyEdgeSolver, TourMode, TourSolver};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 5.0],
///     vec![5.0, 0.0, 1.0],
///     vec![1.0, 5.0, 0.0],
/// ])?;
/// let tour = GreedyEdgeSolver.solve(&costs, TourMode::RoundTrip)?;
/// assert_eq!(tour.order(), vec![0, 1, 2, 0]);
/// assert_eq!(tour.cost(), 3.0);
/// # Ok(())
/// # }
/// ```
pub trait TourSolver: Send + Sync {
    /// Strategy implemented by this solver.
    fn algorithm(&self) -> Algorithm;

    /// Build a tour over every waypoint in `costs`.
    ///
    /// # Errors
    ///
    /// Returns [`TourError`] when the matrix is too small or no finite tour
    /// can be assembled.
    fn solve(&self, costs: &CostMatrix, mode: TourMode) -> Result<Tour, TourError>;
}

impl<T: TourSolver + ?Sized> TourSolver for Box<T> {
    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    fn solve(&self, costs: &CostMatrix, mode: TourMode) -> Result<Tour, TourError> {
        (**self).solve(costs, mode)
    }
}

/// Reject problems smaller than the mode's minimum.
pub(crate) const fn ensure_size(size: usize, mode: TourMode) -> Result<(), TourError> {
    let required = mode.minimum_waypoints();
    if size < required {
        return Err(TourError::TooFewWaypoints {
            mode,
            required,
            actual: size,
        });
    }
    Ok(())
}
