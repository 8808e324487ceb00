//! Behavioural tests for `VrpExternalSolver` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tour_core::test_support::worked_example;
use tour_core::{CostMatrix, ExternalSolverAdapter, Tour, TourError, TourMode, TourSolver};
use tour_solver_vrp::VrpExternalSolver;

#[derive(Debug)]
struct VrpWorld {
    costs: RefCell<Option<CostMatrix>>,
    outcome: RefCell<Option<Result<Tour, TourError>>>,
}

impl VrpWorld {
    fn new() -> Self {
        Self {
            costs: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn solve(&self, mode: TourMode) {
        let costs = self
            .costs
            .borrow()
            .clone()
            .expect("cost matrix should be set before solving");
        let adapter = ExternalSolverAdapter::new(VrpExternalSolver::default());
        self.outcome.replace(Some(adapter.solve(&costs, mode)));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn tour(&self) -> Tour {
        self.outcome
            .borrow()
            .clone()
            .expect("solver should run before assertions")
            .expect("expected solve success")
    }
}

#[fixture]
fn world() -> VrpWorld {
    VrpWorld::new()
}

#[given("the worked example cost matrix")]
fn given_worked_example(world: &VrpWorld) {
    world.costs.replace(Some(worked_example()));
}

#[given("a six waypoint ring with cheap forward edges")]
fn given_ring(world: &VrpWorld) {
    let size = 6;
    let mut costs = CostMatrix::unreachable(size);
    for from in 0..size {
        let successor = if from + 1 == size { 0 } else { from + 1 };
        for to in (0..size).filter(|&to| to != from) {
            costs.set_cost(from, to, if to == successor { 1.0 } else { 10.0 });
        }
    }
    world.costs.replace(Some(costs));
}

#[given("a two waypoint cost matrix")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_pair(world: &VrpWorld) {
    let costs = CostMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]])
        .expect("valid two waypoint matrix");
    world.costs.replace(Some(costs));
}

#[when("the vrp-core solver plans a one-way tour")]
fn when_one_way(world: &VrpWorld) {
    world.solve(TourMode::OneWay);
}

#[when("the vrp-core solver plans a round trip")]
fn when_round_trip(world: &VrpWorld) {
    world.solve(TourMode::RoundTrip);
}

#[then("the tour visits 0, 1, 2, 3")]
fn then_visits_four(world: &VrpWorld) {
    assert_eq!(world.tour().order(), vec![0, 1, 2, 3]);
}

#[then("the tour visits 0, 1, 2, 3, 4, 5, 0")]
fn then_visits_ring(world: &VrpWorld) {
    assert_eq!(world.tour().order(), vec![0, 1, 2, 3, 4, 5, 0]);
}

#[then("the tour cost is 6")]
#[expect(clippy::float_cmp, reason = "costs are small whole numbers")]
fn then_cost_six(world: &VrpWorld) {
    assert_eq!(world.tour().cost(), 6.0);
}

#[then("the solve fails because there are too few waypoints")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_too_few(world: &VrpWorld) {
    let outcome = world
        .outcome
        .borrow()
        .clone()
        .expect("solver should run before assertions");
    assert!(matches!(outcome, Err(TourError::TooFewWaypoints { .. })));
}

#[scenario(path = "tests/features/vrp_solver.feature", index = 0)]
fn one_way_worked_example(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_solver.feature", index = 1)]
fn round_trip_ring(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_solver.feature", index = 2)]
fn too_few_waypoints(world: VrpWorld) {
    let _ = world;
}
