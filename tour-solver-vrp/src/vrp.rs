//! `vrp-core` modelling helpers for `VrpExternalSolver`.
//!
//! This module converts an [`ExternalProblem`] into a single-vehicle
//! `vrp-core` problem, runs the solver, and reads the visited locations back
//! as node indices.

use std::sync::Arc;

use tour_core::{ExternalProblem, TourError, UNREACHABLE_COST};
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::solver::VrpSolverConfig;

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let min_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[min_unassigned, transport_feature])?.build()
}

fn define_problem(
    problem: &ExternalProblem,
    stops: &[usize],
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = stops
        .iter()
        .map(|&node| {
            SingleBuilder::default()
                .id(format!("stop{node}").as_str())
                .location(node)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id("traveller")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(problem.start)
                .set_start_time(0.0)
                .set_end_location(problem.end)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

struct IntegerTransportCost {
    costs: Vec<Vec<f64>>,
}

impl IntegerTransportCost {
    #[expect(
        clippy::cast_precision_loss,
        reason = "costs are bounded by UNREACHABLE_COST, which f64 represents exactly"
    )]
    fn new(problem: &ExternalProblem) -> Self {
        let costs = problem
            .costs
            .iter()
            .map(|row| row.iter().map(|&cost| cost as f64).collect())
            .collect();
        Self { costs }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "UNREACHABLE_COST is exactly representable as f64"
    )]
    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = self.costs.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "Matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(UNREACHABLE_COST as f64)
    }
}

impl TransportCost for IntegerTransportCost {
    // The matrix is neither route- nor time-dependent; `route` and
    // `departure` are part of the shared `vrp-core` signature.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

fn failure(err: &dyn std::fmt::Display) -> TourError {
    TourError::SolverFailure {
        message: err.to_string(),
    }
}

/// Context for running a `vrp-core` solve with shared configuration.
pub(super) struct VrpSolveContext<'a> {
    config: &'a VrpSolverConfig,
}

impl<'a> VrpSolveContext<'a> {
    /// Create a new solve context.
    pub(super) const fn new(config: &'a VrpSolverConfig) -> Self {
        Self { config }
    }

    /// Solve `problem`, returning the visited nodes from start to end.
    pub(super) fn solve(&self, problem: &ExternalProblem) -> Result<Vec<usize>, TourError> {
        let stops: Vec<usize> = (0..problem.size())
            .filter(|&node| node != problem.start && node != problem.end)
            .collect();
        if stops.is_empty() {
            return Ok(vec![problem.start, problem.end]);
        }

        let transport = Arc::new(IntegerTransportCost::new(problem));
        let goal = define_goal(transport.clone()).map_err(|err| failure(&err))?;
        let vrp_problem = Arc::new(
            define_problem(problem, &stops, transport, goal).map_err(|err| failure(&err))?,
        );

        let vrp_config = VrpConfigBuilder::new(vrp_problem.clone())
            .prebuild()
            .map_err(|err| failure(&err))?
            .with_max_generations(Some(self.config.max_generations))
            .with_max_time(self.config.max_time_secs)
            .build()
            .map_err(|err| failure(&err))?;

        let solution = vrp_core::solver::Solver::new(vrp_problem, vrp_config)
            .solve()
            .map_err(|err| failure(&err))?;

        if !solution.unassigned.is_empty() {
            return Err(TourError::SolverFailure {
                message: format!(
                    "{} of {} waypoints could not be scheduled",
                    solution.unassigned.len(),
                    stops.len()
                ),
            });
        }

        Ok(solution.get_locations().flatten().collect())
    }
}
