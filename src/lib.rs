//! Facade crate for the waypoint tour planner.
//!
//! This crate re-exports the route-construction engine and its domain types,
//! and exposes the vrp-core optimiser behind a feature flag.

#![forbid(unsafe_code)]

pub use tour_core::{
    Algorithm, AlgorithmLabel, CostMatrix, CostMatrixBuilder, DistanceOracle, EngineError,
    EngineOptions, ExactSolver, ExternalSolver, ExternalSolverAdapter, GreedyEdgeSolver,
    LegMatrix, Metric, NearestNeighborSolver, OracleError, RouteConstructionEngine, RouteLeg,
    SolverOutcome, Tour, TourError, TourMode, TourSolver, Waypoint, WaypointRole,
    arrange_waypoints,
};

#[cfg(feature = "solver-vrp")]
pub use tour_solver_vrp::{VrpExternalSolver, VrpSolverConfig};
