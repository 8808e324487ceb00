//! External tour optimiser backed by `vrp-core`.
//!
//! This crate provides [`VrpExternalSolver`], an implementation of
//! [`ExternalSolver`](tour_core::ExternalSolver). A tour is modelled as a
//! single-vehicle routing problem: the vehicle leaves waypoint 0, must serve
//! one job per intermediate waypoint and finishes at the tour's end. The
//! `vrp-core` metaheuristics then minimise the travelled cost.
//!
//! Wrap the solver in [`ExternalSolverAdapter`](tour_core::ExternalSolverAdapter)
//! to use it alongside the built-in heuristics:
//!
//! ```
//! use tour_core::{ExternalSolverAdapter, RouteConstructionEngine};
//! use tour_solver_vrp::VrpExternalSolver;
//!
//! let engine = RouteConstructionEngine::new()
//!     .with_external_solver(ExternalSolverAdapter::new(VrpExternalSolver::default()));
//! # let _ = engine;
//! ```
//!
//! The metaheuristic is randomised, so repeated runs on larger problems may
//! return different tours of similar cost.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod vrp;

pub use solver::{VrpExternalSolver, VrpSolverConfig};
