//! Property-based tests for the tour solvers.
//!
//! # Invariants tested
//!
//! - **Optimality:** the exhaustive search is never beaten.
//! - **Bidirectional choice:** nearest neighbour keeps the cheaper walk.
//! - **Multi-start:** trying every rotation never loses to a single start.
//! - **Shape:** greedy tours are Hamiltonian paths or cycles of the right
//!   length, including the small one-way cases.
//! - **Determinism:** solving twice gives the same tour.

mod proptest_support;

use proptest::prelude::*;
use tour_core::{
    CostMatrix, ExactSolver, GreedyEdgeSolver, NearestNeighborSolver, TourError, TourMode,
    TourSolver,
};

use proptest_support::{finite_matrix, sized_finite_matrix, sparse_matrix};

fn all_solvers() -> Vec<Box<dyn TourSolver>> {
    vec![
        Box::new(GreedyEdgeSolver),
        Box::new(NearestNeighborSolver),
        Box::new(ExactSolver::new()),
    ]
}

fn modes() -> impl Strategy<Value = TourMode> {
    prop_oneof![Just(TourMode::RoundTrip), Just(TourMode::OneWay)]
}

fn one_way_stops(costs: &CostMatrix) -> Vec<usize> {
    (0..costs.size()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: no heuristic finds a cheaper tour than the exhaustive search.
    #[test]
    fn exact_is_never_beaten((size, costs) in sized_finite_matrix(3..=7), mode in modes()) {
        let exact = ExactSolver::new().solve(&costs, mode).expect("finite matrix is feasible");
        prop_assert!(exact.is_complete(size, mode));
        for solver in all_solvers() {
            let tour = solver.solve(&costs, mode).expect("finite matrix is feasible");
            prop_assert!(
                exact.cost() <= tour.cost(),
                "{} beat the optimum: {} < {}",
                tour.label(),
                tour.cost(),
                exact.cost()
            );
        }
    }

    /// Property: the bidirectional walk costs the minimum of both walks.
    #[test]
    fn bidirectional_is_the_cheaper_walk(costs in finite_matrix(6)) {
        let stops = one_way_stops(&costs);
        let forward = NearestNeighborSolver::forward(&costs, &stops).expect("matrix source");
        let reverse = NearestNeighborSolver::reverse(&costs, &stops).expect("matrix source");
        let best = NearestNeighborSolver::bidirectional(&costs, &stops).expect("matrix source");
        prop_assert_eq!(best.cost, forward.cost.min(reverse.cost));
    }

    /// Property: multi-start never loses to the walk anchored at waypoint 0.
    #[test]
    fn multi_start_is_never_worse((_, costs) in sized_finite_matrix(2..=8)) {
        let mut stops: Vec<usize> = (0..costs.size()).collect();
        stops.push(0);
        let anchored = NearestNeighborSolver::bidirectional(&costs, &stops).expect("matrix source");
        let rotated = NearestNeighborSolver::multi_start(&costs).expect("matrix source");
        prop_assert!(rotated.cost <= anchored.cost);
        prop_assert_eq!(rotated.stops.first(), Some(&0));
        prop_assert_eq!(rotated.stops.last(), Some(&0));
    }

    /// Property: every successful tour has the right shape and edge count.
    #[test]
    fn tours_have_the_expected_shape((size, costs) in sized_finite_matrix(2..=8), mode in modes()) {
        prop_assume!(size >= mode.minimum_waypoints());
        for solver in [&GreedyEdgeSolver as &dyn TourSolver, &NearestNeighborSolver] {
            let tour = solver.solve(&costs, mode).expect("finite matrix is feasible");
            prop_assert!(tour.is_complete(size, mode), "{} produced {:?}", tour.label(), tour.order());
            prop_assert_eq!(tour.edges().len(), mode.edge_count(size));
        }
    }

    /// Property: small one-way greedy runs never close a short cycle.
    #[test]
    fn small_one_way_greedy_tours_are_paths((size, costs) in sized_finite_matrix(3..=5)) {
        let tour = GreedyEdgeSolver
            .solve(&costs, TourMode::OneWay)
            .expect("finite matrix is feasible");
        prop_assert!(tour.is_complete(size, TourMode::OneWay), "order {:?}", tour.order());
    }

    /// Property: on sparse matrices, solvers either return a complete finite
    /// tour or report why not.
    #[test]
    fn sparse_matrices_fail_cleanly(costs in sparse_matrix(5), mode in modes()) {
        for solver in all_solvers() {
            match solver.solve(&costs, mode) {
                Ok(tour) => {
                    prop_assert!(tour.is_complete(5, mode));
                    prop_assert!(tour.cost().is_finite());
                }
                Err(err) => {
                    let expected_kind = matches!(
                        err,
                        TourError::NoFeasibleTour { .. } | TourError::IncompleteTour { .. }
                    );
                    prop_assert!(expected_kind, "unexpected error: {:?}", err);
                }
            }
        }
    }

    /// Property: solving twice yields identical tours.
    #[test]
    fn solvers_are_deterministic(costs in sparse_matrix(6), mode in modes()) {
        for solver in all_solvers() {
            prop_assert_eq!(solver.solve(&costs, mode), solver.solve(&costs, mode));
        }
    }
}
