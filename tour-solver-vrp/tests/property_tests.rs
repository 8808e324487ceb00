//! Property-based tests for the `vrp-core` external solver.
//!
//! # Invariants tested
//!
//! - **Shape:** every tour visits each waypoint once and ends where the mode
//!   requires.
//! - **Lower bound:** no tour is cheaper than the exhaustive optimum.
//! - **Pricing:** the reported cost is the sum of the tour's matrix edges.

use proptest::prelude::*;
use tour_core::{CostMatrix, ExactSolver, ExternalSolverAdapter, TourMode, TourSolver};
use tour_solver_vrp::{VrpExternalSolver, VrpSolverConfig};

fn matrix(size: usize) -> impl Strategy<Value = CostMatrix> {
    proptest::collection::vec(1_u16..=50, size * size).prop_map(move |cells| {
        let rows = cells
            .chunks(size)
            .map(|row| row.iter().copied().map(f64::from).collect())
            .collect();
        CostMatrix::from_rows(rows).unwrap_or_else(|_| CostMatrix::unreachable(size))
    })
}

fn sized_matrix() -> impl Strategy<Value = (usize, CostMatrix)> {
    (3_usize..=6).prop_flat_map(|size| (Just(size), matrix(size)))
}

fn modes() -> impl Strategy<Value = TourMode> {
    prop_oneof![Just(TourMode::RoundTrip), Just(TourMode::OneWay)]
}

fn adapter() -> ExternalSolverAdapter<VrpExternalSolver> {
    ExternalSolverAdapter::new(VrpExternalSolver::with_config(
        VrpSolverConfig::default().with_max_generations(20),
    ))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn tours_are_complete_and_never_beat_the_optimum(
        (size, costs) in sized_matrix(),
        mode in modes(),
    ) {
        let tour = adapter().solve(&costs, mode);
        prop_assert!(tour.is_ok(), "complete matrices are always solvable: {tour:?}");
        let Ok(found) = tour else { return Ok(()); };
        prop_assert!(found.is_complete(size, mode));

        let optimum = ExactSolver::new().solve(&costs, mode);
        prop_assert!(optimum.is_ok());
        let Ok(best) = optimum else { return Ok(()); };
        prop_assert!(found.cost() >= best.cost());
    }

    #[test]
    fn reported_cost_matches_the_matrix(
        (_size, costs) in sized_matrix(),
        mode in modes(),
    ) {
        let Ok(tour) = adapter().solve(&costs, mode) else {
            return Err(TestCaseError::fail("complete matrices are always solvable"));
        };
        let summed: f64 = tour
            .edges()
            .iter()
            .map(|edge| costs.cost(edge.from, edge.to))
            .sum();
        prop_assert_eq!(tour.cost(), summed);
    }
}
