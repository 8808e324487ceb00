//! Nearest-neighbour tour construction.
//!
//! The forward walk starts at the first stop and always moves to the
//! cheapest unvisited stop. The reverse walk mirrors it from the final stop.
//! In both walks the fixed endpoint at the far end is held back until it is
//! the only stop left, and ties go to the earliest stop in list order.

use log::debug;

use crate::matrix::CostMatrix;
use crate::oracle::{DistanceOracle, Metric};
use crate::solver::{EdgeCost, OracleEdgeCost, RotatedCosts, TourError, TourSolver, ensure_size};
use crate::tour::{Algorithm, AlgorithmLabel, Edge, Tour, TourMode};
use crate::waypoint::Waypoint;

/// A sequence of stops and the summed cost of walking it.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    /// Visited stops, first to last.
    pub stops: Vec<usize>,
    /// Sum of the edge costs along `stops`.
    pub cost: f64,
}

impl Walk {
    fn into_tour(self, label: AlgorithmLabel) -> Tour {
        let edges = self
            .stops
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(Edge::new(*from, *to)),
                _ => None,
            })
            .collect();
        Tour::new(edges, self.cost, label)
    }

    /// Rotate a closed walk so it starts and ends at `origin`.
    fn anchored_at(mut self, origin: usize) -> Self {
        if self.stops.len() > 1 && self.stops.first() == self.stops.last() {
            self.stops.pop();
            if let Some(position) = self.stops.iter().position(|&stop| stop == origin) {
                self.stops.rotate_left(position);
            }
            self.stops.push(origin);
        }
        self
    }
}

/// Builds tours by repeatedly travelling to the closest unvisited stop.
///
/// One-way tours take the cheaper of the forward and reverse walks. Round
/// trips additionally try every waypoint as the starting point and keep the
/// cheapest cycle, re-anchored at waypoint 0.
///
/// # Examples
///
/// ```
/// use tour_core::{CostMatrix, NearestNeighborSolver, TourMode, TourSolver};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let inf = f64::INFINITY;
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 2.0, 9.0, inf],
///     vec![inf, 0.0, 3.0, 4.0],
///     vec![inf, 5.0, 0.0, 1.0],
///     vec![inf, inf, inf, 0.0],
/// ])?;
/// let tour = NearestNeighborSolver.solve(&costs, TourMode::OneWay)?;
/// assert_eq!(tour.order(), vec![0, 1, 2, 3]);
/// assert_eq!(tour.cost(), 6.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborSolver;

impl NearestNeighborSolver {
    /// Walk forward from `stops[0]`, reaching the final stop last.
    ///
    /// # Errors
    ///
    /// Propagates failures from live cost sources.
    #[expect(
        clippy::float_arithmetic,
        reason = "walk cost is the sum of floating-point edge costs"
    )]
    pub fn forward<C: EdgeCost + ?Sized>(costs: &C, stops: &[usize]) -> Result<Walk, TourError> {
        let Some((&first, rest)) = stops.split_first() else {
            return Ok(Walk {
                stops: Vec::new(),
                cost: 0.0,
            });
        };
        let mut remaining = rest.to_vec();
        let mut walk = Walk {
            stops: vec![first],
            cost: 0.0,
        };
        let mut current = first;
        while !remaining.is_empty() {
            let open = remaining.len().saturating_sub(1).max(1);
            let mut best: Option<(usize, f64)> = None;
            for (position, &candidate) in remaining.iter().enumerate().take(open) {
                let cost = costs.edge_cost(current, candidate)?;
                if best.is_none_or(|(_, lowest)| cost < lowest) {
                    best = Some((position, cost));
                }
            }
            let Some((position, cost)) = best else { break };
            current = remaining.remove(position);
            walk.stops.push(current);
            walk.cost += cost;
        }
        Ok(walk)
    }

    /// Walk backwards from the final stop, reaching `stops[0]` last.
    ///
    /// The returned stops are in travel order.
    ///
    /// # Errors
    ///
    /// Propagates failures from live cost sources.
    #[expect(
        clippy::float_arithmetic,
        reason = "walk cost is the sum of floating-point edge costs"
    )]
    pub fn reverse<C: EdgeCost + ?Sized>(costs: &C, stops: &[usize]) -> Result<Walk, TourError> {
        let Some((&last, rest)) = stops.split_last() else {
            return Ok(Walk {
                stops: Vec::new(),
                cost: 0.0,
            });
        };
        let mut remaining = rest.to_vec();
        let mut walk = Walk {
            stops: vec![last],
            cost: 0.0,
        };
        let mut current = last;
        while !remaining.is_empty() {
            let held_back = usize::from(remaining.len() > 1);
            let mut best: Option<(usize, f64)> = None;
            for (position, &candidate) in remaining.iter().enumerate().skip(held_back) {
                let cost = costs.edge_cost(candidate, current)?;
                if best.is_none_or(|(_, lowest)| cost < lowest) {
                    best = Some((position, cost));
                }
            }
            let Some((position, cost)) = best else { break };
            current = remaining.remove(position);
            walk.stops.push(current);
            walk.cost += cost;
        }
        walk.stops.reverse();
        Ok(walk)
    }

    /// Run both walks and keep the cheaper, preferring forward on ties.
    ///
    /// # Errors
    ///
    /// Propagates failures from live cost sources.
    pub fn bidirectional<C: EdgeCost + ?Sized>(
        costs: &C,
        stops: &[usize],
    ) -> Result<Walk, TourError> {
        let forward = Self::forward(costs, stops)?;
        let reverse = Self::reverse(costs, stops)?;
        Ok(if forward.cost > reverse.cost {
            reverse
        } else {
            forward
        })
    }

    /// Try every rotation of a round trip and keep the cheapest cycle.
    ///
    /// Each rotation `r` views the costs shifted by `r` on both axes and
    /// walks `[0, 1, .., N-1, 0]` bidirectionally. Only strictly cheaper
    /// cycles replace the current best. The result starts and ends at 0.
    ///
    /// # Errors
    ///
    /// Propagates failures from live cost sources.
    pub fn multi_start<C: EdgeCost + ?Sized>(costs: &C) -> Result<Walk, TourError> {
        let size = costs.size();
        let stops: Vec<usize> = (0..size).chain(std::iter::once(0)).collect();
        let mut best: Option<Walk> = None;
        for offset in 0..size {
            let view = RotatedCosts::new(costs, offset);
            let mut walk = Self::bidirectional(&view, &stops)?;
            for stop in &mut walk.stops {
                *stop = view.to_source(*stop);
            }
            debug!("nearest neighbour rotation {offset} costs {}", walk.cost);
            if best.as_ref().is_none_or(|current| walk.cost < current.cost) {
                best = Some(walk);
            }
        }
        Ok(best
            .map_or_else(
                || Walk {
                    stops: Vec::new(),
                    cost: f64::INFINITY,
                },
                |walk| walk.anchored_at(0),
            ))
    }

    /// Build a tour from any edge cost source, including a live oracle.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::NoFeasibleTour`] when the walk uses an infinite
    /// edge, or propagates cost source failures.
    pub fn solve_with<C: EdgeCost + ?Sized>(
        costs: &C,
        mode: TourMode,
    ) -> Result<Tour, TourError> {
        let size = costs.size();
        ensure_size(size, mode)?;
        let walk = match mode {
            TourMode::RoundTrip => Self::multi_start(costs)?,
            TourMode::OneWay => {
                let stops: Vec<usize> = (0..size).collect();
                Self::bidirectional(costs, &stops)?
            }
        };
        if !walk.cost.is_finite() {
            return Err(TourError::NoFeasibleTour {
                algorithm: Algorithm::NearestNeighbor,
            });
        }
        Ok(walk.into_tour(AlgorithmLabel::new(mode, Algorithm::NearestNeighbor)))
    }

    /// Build a tour by querying `oracle` for each step instead of a matrix.
    ///
    /// # Errors
    ///
    /// As [`Self::solve_with`]; oracle failures surface as
    /// [`TourError::Fetch`].
    pub fn solve_live<O: DistanceOracle + ?Sized>(
        waypoints: &[Waypoint],
        oracle: &O,
        metric: Metric,
        mode: TourMode,
    ) -> Result<Tour, TourError> {
        Self::solve_with(&OracleEdgeCost::new(waypoints, oracle, metric), mode)
    }
}

impl TourSolver for NearestNeighborSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::NearestNeighbor
    }

    fn solve(&self, costs: &CostMatrix, mode: TourMode) -> Result<Tour, TourError> {
        Self::solve_with(costs, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingOracle, FixedLegOracle, grid_waypoints, worked_example};
    use rstest::rstest;

    const INF: f64 = f64::INFINITY;

    fn matrix(rows: Vec<Vec<f64>>) -> CostMatrix {
        CostMatrix::from_rows(rows).expect("valid matrix")
    }

    #[rstest]
    fn forward_walk_on_worked_example() {
        let walk = NearestNeighborSolver::forward(&worked_example(), &[0, 1, 2, 3])
            .expect("matrix source never fails");
        assert_eq!(walk.stops, vec![0, 1, 2, 3]);
        assert_eq!(walk.cost, 6.0);
    }

    #[rstest]
    fn forward_holds_back_the_final_stop() {
        // 0 -> 3 is cheapest but 3 must come last.
        let costs = matrix(vec![
            vec![0.0, 5.0, 6.0, 1.0],
            vec![9.0, 0.0, 1.0, 9.0],
            vec![9.0, 9.0, 0.0, 1.0],
            vec![9.0, 9.0, 9.0, 0.0],
        ]);
        let walk = NearestNeighborSolver::forward(&costs, &[0, 1, 2, 3]).expect("matrix");
        assert_eq!(walk.stops, vec![0, 1, 2, 3]);
        assert_eq!(walk.cost, 7.0);
    }

    #[rstest]
    fn reverse_reads_costs_into_the_current_stop() {
        let costs = matrix(vec![
            vec![0.0, 1.0, 8.0, INF],
            vec![INF, 0.0, 1.0, 7.0],
            vec![INF, 2.0, 0.0, 1.0],
            vec![INF, INF, INF, 0.0],
        ]);
        let walk = NearestNeighborSolver::reverse(&costs, &[0, 1, 2, 3]).expect("matrix");
        assert_eq!(walk.stops, vec![0, 1, 2, 3]);
        assert_eq!(walk.cost, 3.0);
    }

    #[rstest]
    fn forward_ties_pick_the_earliest_stop() {
        let costs = matrix(vec![vec![1.0; 4]; 4]);
        let walk = NearestNeighborSolver::forward(&costs, &[0, 2, 1, 3]).expect("matrix");
        assert_eq!(walk.stops, vec![0, 2, 1, 3]);
    }

    #[rstest]
    fn bidirectional_prefers_reverse_only_when_cheaper() {
        // Forward greedily takes 0 -> 1 and then pays 10 into 3.
        let costs = matrix(vec![
            vec![0.0, 1.0, 2.0, INF],
            vec![INF, 0.0, 10.0, 10.0],
            vec![INF, 1.0, 0.0, 10.0],
            vec![INF, INF, INF, 0.0],
        ]);
        let stops = [0, 1, 2, 3];
        let forward = NearestNeighborSolver::forward(&costs, &stops).expect("matrix");
        let reverse = NearestNeighborSolver::reverse(&costs, &stops).expect("matrix");
        let best = NearestNeighborSolver::bidirectional(&costs, &stops).expect("matrix");
        assert_eq!(forward.cost, 21.0);
        assert_eq!(reverse.stops, vec![0, 2, 1, 3]);
        assert_eq!(reverse.cost, 13.0);
        assert_eq!(best, reverse);
    }

    #[rstest]
    fn multi_start_returns_a_cycle_anchored_at_zero() {
        let costs = matrix(vec![
            vec![0.0, 9.0, 9.0, 1.0],
            vec![1.0, 0.0, 9.0, 9.0],
            vec![9.0, 1.0, 0.0, 9.0],
            vec![9.0, 9.0, 1.0, 0.0],
        ]);
        let tour = NearestNeighborSolver
            .solve(&costs, TourMode::RoundTrip)
            .expect("feasible");
        assert_eq!(tour.order(), vec![0, 3, 2, 1, 0]);
        assert_eq!(tour.cost(), 4.0);
        assert!(tour.is_complete(4, TourMode::RoundTrip));
    }

    #[rstest]
    fn infinite_walks_are_not_feasible() {
        let err = NearestNeighborSolver
            .solve(&CostMatrix::unreachable(4), TourMode::OneWay)
            .expect_err("no finite edges");
        assert_eq!(
            err,
            TourError::NoFeasibleTour {
                algorithm: Algorithm::NearestNeighbor
            }
        );
    }

    #[rstest]
    fn live_oracle_matches_the_precomputed_matrix() {
        let waypoints = grid_waypoints(5);
        let oracle = FixedLegOracle::planar();
        let live = NearestNeighborSolver::solve_live(&waypoints, &oracle, Metric::Distance, TourMode::OneWay)
            .expect("planar oracle always routes");
        let costs = oracle.cost_matrix(&waypoints, Metric::Distance);
        let offline = NearestNeighborSolver
            .solve(&costs, TourMode::OneWay)
            .expect("feasible");
        assert_eq!(live.order(), offline.order());
    }

    #[rstest]
    fn live_oracle_failures_abort_the_walk() {
        let waypoints = grid_waypoints(4);
        let oracle = FailingOracle::on_pair(0, 1);
        let err = NearestNeighborSolver::solve_live(&waypoints, &oracle, Metric::Time, TourMode::OneWay)
            .expect_err("first step queries the failing pair");
        assert!(matches!(err, TourError::Fetch(_)));
    }
}
