//! Run every configured solver and collect their tours.

use log::{info, warn};
use thiserror::Error;

use crate::builder::CostMatrixBuilder;
use crate::matrix::{CostMatrix, GeometryMatrix, MatrixError};
use crate::oracle::DistanceOracle;
use crate::progress::ProgressCallback;
use crate::solver::{
    ExactSolver, GreedyEdgeSolver, NearestNeighborSolver, TourError, TourSolver,
};
use crate::tour::{AlgorithmLabel, Tour, TourMode};
use crate::waypoint::Waypoint;

/// Errors from [`RouteConstructionEngine`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Neither round trips nor one-way tours were requested.
    #[error("at least one of round trip or one-way must be requested")]
    NoModeRequested,
    /// The cost matrix could not be built.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Which tours the engine should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Produce round trips.
    pub round_trip: bool,
    /// Produce one-way tours.
    pub one_way: bool,
    /// Also run the exhaustive search.
    pub include_exact: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            round_trip: true,
            one_way: false,
            include_exact: false,
        }
    }
}

impl EngineOptions {
    /// Toggle round trips.
    #[must_use]
    pub const fn with_round_trip(mut self, enabled: bool) -> Self {
        self.round_trip = enabled;
        self
    }

    /// Toggle one-way tours.
    #[must_use]
    pub const fn with_one_way(mut self, enabled: bool) -> Self {
        self.one_way = enabled;
        self
    }

    /// Toggle the exhaustive search.
    #[must_use]
    pub const fn with_exact(mut self, enabled: bool) -> Self {
        self.include_exact = enabled;
        self
    }

    /// Requested modes, round trip first.
    #[must_use]
    pub fn modes(&self) -> Vec<TourMode> {
        let mut modes = Vec::with_capacity(2);
        if self.round_trip {
            modes.push(TourMode::RoundTrip);
        }
        if self.one_way {
            modes.push(TourMode::OneWay);
        }
        modes
    }
}

/// Result of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    /// Mode and algorithm.
    pub label: AlgorithmLabel,
    /// The tour, or why none was produced.
    pub result: Result<Tour, TourError>,
}

/// Runs the greedy, nearest-neighbour, external and exact solvers over a
/// shared cost matrix.
///
/// For each requested mode (round trip first) the solvers run in the order
/// greedy, nearest neighbour, external (when configured), exact (when
/// requested). A failing solver is reported and does not stop the others.
///
/// # Examples
///
/// ```
/// use tour_core::{CostMatrix, EngineOptions, RouteConstructionEngine};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0],
///     vec![4.0, 0.0, 1.0],
///     vec![1.0, 4.0, 0.0],
/// ])?;
/// let options = EngineOptions::default().with_one_way(true).with_exact(true);
/// let outcomes = RouteConstructionEngine::new().run(&costs, &options)?;
/// let labels: Vec<String> = outcomes.iter().map(|o| o.label.to_string()).collect();
/// assert_eq!(labels, ["RTSS", "RTNN", "RTBF", "OWSS", "OWNN", "OWBF"]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RouteConstructionEngine {
    greedy: GreedyEdgeSolver,
    nearest: NearestNeighborSolver,
    exact: ExactSolver,
    external: Option<Box<dyn TourSolver>>,
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for RouteConstructionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteConstructionEngine")
            .field("external", &self.external.is_some())
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

impl RouteConstructionEngine {
    /// Engine with the built-in solvers only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an external optimiser, labelled `OR`.
    #[must_use]
    pub fn with_external_solver(mut self, solver: impl TourSolver + 'static) -> Self {
        self.external = Some(Box::new(solver));
        self
    }

    /// Report progress from the matrix build and the exhaustive search.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.exact = ExactSolver::new().with_progress(progress.clone());
        self.progress = Some(progress);
        self
    }

    /// Run every configured solver over `costs`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoModeRequested`] when `options` selects no
    /// mode. Solver failures are reported per outcome instead.
    pub fn run(
        &self,
        costs: &CostMatrix,
        options: &EngineOptions,
    ) -> Result<Vec<SolverOutcome>, EngineError> {
        let modes = options.modes();
        if modes.is_empty() {
            return Err(EngineError::NoModeRequested);
        }
        let mut outcomes = Vec::new();
        for mode in modes {
            for solver in self.solvers(options) {
                let label = AlgorithmLabel::new(mode, solver.algorithm());
                let result = solver.solve(costs, mode);
                match &result {
                    Ok(tour) => info!("{label}: cost {:.1} over {} edges", tour.cost(), tour.edges().len()),
                    Err(err) => warn!("{label}: {err}"),
                }
                outcomes.push(SolverOutcome { label, result });
            }
        }
        Ok(outcomes)
    }

    /// Build the matrix from `oracle`, then run every configured solver.
    ///
    /// The full matrix is fetched when round trips are requested; otherwise
    /// only the cells a one-way tour can use.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoModeRequested`] or
    /// [`EngineError::Matrix`] when the build fails.
    pub fn run_with_oracle<O: DistanceOracle + ?Sized>(
        &self,
        waypoints: &[Waypoint],
        oracle: &O,
        builder: &CostMatrixBuilder,
        options: &EngineOptions,
    ) -> Result<(Vec<SolverOutcome>, GeometryMatrix), EngineError> {
        if options.modes().is_empty() {
            return Err(EngineError::NoModeRequested);
        }
        let build_mode = if options.round_trip {
            TourMode::RoundTrip
        } else {
            TourMode::OneWay
        };
        let builder = match &self.progress {
            Some(progress) => builder.clone().with_progress(progress.clone()),
            None => builder.clone(),
        };
        let (costs, geometry) = builder.build(waypoints, build_mode, oracle)?;
        Ok((self.run(&costs, options)?, geometry))
    }

    fn solvers<'a>(&'a self, options: &EngineOptions) -> Vec<&'a dyn TourSolver> {
        let mut solvers: Vec<&dyn TourSolver> = vec![&self.greedy, &self.nearest];
        if let Some(external) = &self.external {
            solvers.push(external.as_ref());
        }
        if options.include_exact {
            solvers.push(&self.exact);
        }
        solvers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Metric;
    use crate::solver::{ExternalProblem, ExternalSolution, ExternalSolver, ExternalSolverAdapter};
    use crate::test_support::{FailingOracle, FixedLegOracle, grid_waypoints, worked_example};
    use crate::tour::Algorithm;
    use rstest::rstest;

    struct Identity;

    impl ExternalSolver for Identity {
        fn solve(&self, problem: &ExternalProblem) -> Result<ExternalSolution, TourError> {
            let mut route: Vec<usize> = (0..problem.size()).collect();
            if problem.is_round_trip() {
                route.push(problem.size());
            }
            Ok(ExternalSolution { route })
        }
    }

    fn labels(outcomes: &[SolverOutcome]) -> Vec<String> {
        outcomes.iter().map(|o| o.label.to_string()).collect()
    }

    #[rstest]
    fn no_mode_is_an_error() {
        let options = EngineOptions::default().with_round_trip(false);
        assert_eq!(
            RouteConstructionEngine::new().run(&worked_example(), &options),
            Err(EngineError::NoModeRequested)
        );
    }

    #[rstest]
    fn external_solver_runs_between_nearest_and_exact() {
        let engine =
            RouteConstructionEngine::new().with_external_solver(ExternalSolverAdapter::new(Identity));
        let options = EngineOptions::default()
            .with_round_trip(false)
            .with_one_way(true)
            .with_exact(true);
        let outcomes = engine.run(&worked_example(), &options).expect("mode requested");
        assert_eq!(labels(&outcomes), ["OWSS", "OWNN", "OWOR", "OWBF"]);
        for outcome in &outcomes {
            let tour = outcome.result.as_ref().expect("worked example is feasible");
            assert_eq!(tour.cost(), 6.0, "{}", outcome.label);
            assert_eq!(tour.label(), outcome.label);
        }
    }

    #[rstest]
    fn failures_do_not_stop_other_solvers() {
        // Round trips over the worked example have no way back to 0.
        let options = EngineOptions::default().with_one_way(true);
        let outcomes = RouteConstructionEngine::new()
            .run(&worked_example(), &options)
            .expect("modes requested");
        assert_eq!(labels(&outcomes), ["RTSS", "RTNN", "OWSS", "OWNN"]);
        assert!(outcomes.iter().take(2).all(|o| o.result.is_err()));
        assert!(outcomes.iter().skip(2).all(|o| o.result.is_ok()));
    }

    #[rstest]
    fn input_matrix_is_unchanged() {
        let costs = worked_example();
        let before = costs.clone();
        let options = EngineOptions::default().with_one_way(true).with_exact(true);
        let outcomes = RouteConstructionEngine::new().run(&costs, &options);
        assert!(outcomes.is_ok());
        assert_eq!(costs, before);
    }

    #[rstest]
    fn oracle_run_fetches_only_one_way_cells_when_possible() {
        let waypoints = grid_waypoints(4);
        let oracle = FixedLegOracle::planar();
        let options = EngineOptions::default()
            .with_round_trip(false)
            .with_one_way(true);
        let (outcomes, geometry) = RouteConstructionEngine::new()
            .run_with_oracle(&waypoints, &oracle, &CostMatrixBuilder::new(Metric::Distance), &options)
            .expect("planar oracle always routes");
        assert_eq!(oracle.query_count(), 6);
        assert_eq!(geometry.size(), 4);
        let tour = outcomes
            .first()
            .and_then(|o| o.result.as_ref().ok())
            .expect("greedy succeeds");
        assert_eq!(tour.label().algorithm, Algorithm::ShortestSegment);
        assert!(tour.track(&geometry).is_ok());
    }

    #[rstest]
    fn oracle_failures_surface_as_matrix_errors() {
        let waypoints = grid_waypoints(3);
        let oracle = FailingOracle::on_pair(2, 0);
        let result = RouteConstructionEngine::new().run_with_oracle(
            &waypoints,
            &oracle,
            &CostMatrixBuilder::default(),
            &EngineOptions::default(),
        );
        assert!(matches!(result, Err(EngineError::Matrix(MatrixError::Fetch(_)))));
    }
}
