//! Deterministic oracles and fixtures shared by unit, behaviour and property
//! tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::{Coord, LineString};

use crate::{
    CostMatrix, DistanceOracle, LegMetrics, Metric, OracleError, RouteLeg, Waypoint,
};

/// Name given to the waypoint at `index` by [`grid_waypoints`].
#[must_use]
pub fn waypoint_name(index: usize) -> String {
    format!("w{index}")
}

/// `count` distinct waypoints named `w0`, `w1`, ... on a small zig-zag.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "fixture coordinates step by fractional degrees"
)]
pub fn grid_waypoints(count: usize) -> Vec<Waypoint> {
    let mut x = 8.5;
    let mut y = 47.3;
    (0..count)
        .map(|index| {
            let waypoint = Waypoint::new(waypoint_name(index), Coord { x, y });
            x += 0.011;
            y = if y > 47.32 { y - 0.025 } else { y + 0.013 };
            waypoint
        })
        .collect()
}

/// The four-waypoint one-way matrix whose optimum is `0 -> 1 -> 2 -> 3` at
/// cost 6.
///
/// Only `0->1 (2)`, `0->2 (9)`, `1->2 (3)`, `1->3 (4)`, `2->3 (1)` and
/// `2->1 (5)` are finite.
#[must_use]
pub fn worked_example() -> CostMatrix {
    let mut costs = CostMatrix::unreachable(4);
    for (from, to, cost) in [
        (0, 1, 2.0),
        (0, 2, 9.0),
        (1, 2, 3.0),
        (1, 3, 4.0),
        (2, 3, 1.0),
        (2, 1, 5.0),
    ] {
        costs.set_cost(from, to, cost);
    }
    costs
}

/// Oracle answering from coordinates or from a fixed cost table.
///
/// The planar variant reports the straight-line distance scaled to metres
/// (`distance`), with `time`, `energy` and `cost` at two, three and four
/// times that figure. The table variant reports the table value for every
/// metric and treats infinite cells as unroutable.
#[derive(Debug, Default)]
pub struct FixedLegOracle {
    table: Option<(Vec<String>, CostMatrix)>,
    queries: AtomicUsize,
}

impl FixedLegOracle {
    /// Answer from waypoint coordinates.
    #[must_use]
    pub fn planar() -> Self {
        Self::default()
    }

    /// Answer from `costs`, matching waypoints by name.
    #[must_use]
    pub fn from_costs(waypoints: &[Waypoint], costs: CostMatrix) -> Self {
        let names = waypoints.iter().map(|w| w.name.clone()).collect();
        Self {
            table: Some((names, costs)),
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of queries answered so far, failures included.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Cost matrix this oracle would produce, without counting queries.
    #[must_use]
    pub fn cost_matrix(&self, waypoints: &[Waypoint], metric: Metric) -> CostMatrix {
        let mut costs = CostMatrix::unreachable(waypoints.len());
        for (from, origin) in waypoints.iter().enumerate() {
            for (to, destination) in waypoints.iter().enumerate() {
                if from != to
                    && let Ok(leg) = self.leg(origin, destination)
                {
                    costs.set_cost(from, to, leg.metrics.get(metric));
                }
            }
        }
        costs
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "planar legs derive every metric from the euclidean distance"
    )]
    fn leg(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        let geometry = LineString::from(vec![from.location, to.location]);
        let Some((names, costs)) = &self.table else {
            let distance = (from.location.x - to.location.x)
                .hypot(from.location.y - to.location.y)
                * 100_000.0;
            return Ok(RouteLeg {
                metrics: LegMetrics {
                    distance,
                    time: distance * 2.0,
                    energy: distance * 3.0,
                    cost: distance * 4.0,
                },
                geometry,
            });
        };
        let index = |waypoint: &Waypoint| names.iter().position(|name| *name == waypoint.name);
        let cost = match (index(from), index(to)) {
            (Some(origin), Some(destination)) => costs.cost(origin, destination),
            _ => f64::INFINITY,
        };
        if !cost.is_finite() {
            return Err(OracleError::Unroutable {
                message: format!("no leg from {} to {}", from.name, to.name),
            });
        }
        Ok(RouteLeg {
            metrics: LegMetrics {
                distance: cost,
                time: cost,
                energy: cost,
                cost,
            },
            geometry,
        })
    }
}

impl DistanceOracle for FixedLegOracle {
    fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.leg(from, to)
    }
}

/// Planar oracle that refuses one directed pair.
///
/// Waypoints are matched by the names [`grid_waypoints`] assigns.
#[derive(Debug)]
pub struct FailingOracle {
    from: String,
    to: String,
    inner: FixedLegOracle,
}

impl FailingOracle {
    /// Fail every query from waypoint `from` to waypoint `to`.
    #[must_use]
    pub fn on_pair(from: usize, to: usize) -> Self {
        Self {
            from: waypoint_name(from),
            to: waypoint_name(to),
            inner: FixedLegOracle::planar(),
        }
    }

    /// Number of queries received, failures included.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.inner.query_count()
    }
}

impl DistanceOracle for FailingOracle {
    fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        let leg = self.inner.query(from, to)?;
        if from.name == self.from && to.name == self.to {
            return Err(OracleError::Unroutable {
                message: format!("from-position not mapped ({} -> {})", from.name, to.name),
            });
        }
        Ok(leg)
    }
}
