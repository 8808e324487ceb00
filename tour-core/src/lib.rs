//! Core route-construction engine for waypoint tours.
//!
//! The crate turns a set of named waypoints into ordered tours. Pairwise
//! travel costs come from a [`DistanceOracle`], are collected into a
//! [`CostMatrix`] by the [`CostMatrixBuilder`], and are then handed to one
//! of several [`TourSolver`] implementations:
//!
//! - [`GreedyEdgeSolver`] picks the cheapest remaining segments.
//! - [`NearestNeighborSolver`] walks to the closest unvisited waypoint.
//! - [`ExactSolver`] enumerates every permutation.
//! - [`ExternalSolverAdapter`] delegates to a combinatorial optimiser.
//!
//! [`RouteConstructionEngine`] runs them side by side for round trips and
//! one-way journeys and reports every outcome.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod builder;
pub mod engine;
pub mod matrix;
pub mod oracle;
pub mod progress;
pub mod solver;
pub mod tour;
pub mod waypoint;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use builder::CostMatrixBuilder;
pub use engine::{EngineError, EngineOptions, RouteConstructionEngine, SolverOutcome};
pub use matrix::{CostMatrix, GeometryMatrix, LegMatrix, Matrix, MatrixError};
pub use oracle::{DistanceOracle, FetchError, LegMetrics, Metric, OracleError, RouteLeg};
pub use progress::ProgressCallback;
pub use solver::{
    EdgeCost, ExactSolver, ExternalProblem, ExternalSolution, ExternalSolver,
    ExternalSolverAdapter, GreedyEdgeSolver, NearestNeighborSolver, OracleEdgeCost, RotatedCosts,
    TourError, TourSolver, UNREACHABLE_COST,
};
pub use tour::{Algorithm, AlgorithmLabel, Edge, Tour, TourMode};
pub use waypoint::{Waypoint, WaypointError, WaypointRole, arrange_waypoints};
