use crate::matrix::CostMatrix;
use crate::oracle::{DistanceOracle, FetchError, Metric};
use crate::solver::TourError;
use crate::waypoint::Waypoint;

/// Source of directed edge costs for step-wise solvers.
///
/// Out-of-range indices cost `f64::INFINITY`.
pub trait EdgeCost {
    /// Number of waypoints addressed by this source.
    fn size(&self) -> usize;

    /// Cost of travelling `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::Fetch`] when a live lookup fails.
    fn edge_cost(&self, from: usize, to: usize) -> Result<f64, TourError>;
}

impl EdgeCost for CostMatrix {
    fn size(&self) -> usize {
        Self::size(self)
    }

    fn edge_cost(&self, from: usize, to: usize) -> Result<f64, TourError> {
        Ok(self.cost(from, to))
    }
}

impl<T: EdgeCost + ?Sized> EdgeCost for &T {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn edge_cost(&self, from: usize, to: usize) -> Result<f64, TourError> {
        (**self).edge_cost(from, to)
    }
}

/// View of another cost source with both axes rotated by `offset`.
///
/// Index `i` in the view addresses index `(i + offset) % size` in the
/// underlying source.
///
/// ```
/// use tour_core::{CostMatrix, EdgeCost, RotatedCosts};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![3.0, 0.0, 4.0],
///     vec![5.0, 6.0, 0.0],
/// ])?;
/// let view = RotatedCosts::new(&costs, 1);
/// assert_eq!(view.edge_cost(0, 1)?, 4.0);
/// assert_eq!(view.to_source(2), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RotatedCosts<'a, C: ?Sized> {
    inner: &'a C,
    offset: usize,
}

impl<'a, C: EdgeCost + ?Sized> RotatedCosts<'a, C> {
    /// Rotate `inner` by `offset` positions.
    #[must_use]
    pub const fn new(inner: &'a C, offset: usize) -> Self {
        Self { inner, offset }
    }

    /// Map a view index back to the underlying index.
    #[must_use]
    pub fn to_source(&self, index: usize) -> usize {
        index
            .checked_add(self.offset)
            .and_then(|shifted| shifted.checked_rem(self.inner.size()))
            .unwrap_or(index)
    }
}

impl<C: EdgeCost + ?Sized> EdgeCost for RotatedCosts<'_, C> {
    fn size(&self) -> usize {
        self.inner.size()
    }

    fn edge_cost(&self, from: usize, to: usize) -> Result<f64, TourError> {
        let size = self.inner.size();
        if from >= size || to >= size {
            return Ok(f64::INFINITY);
        }
        self.inner.edge_cost(self.to_source(from), self.to_source(to))
    }
}

/// Queries a [`DistanceOracle`] for every edge cost instead of reading a
/// precomputed matrix.
pub struct OracleEdgeCost<'a, O: ?Sized> {
    waypoints: &'a [Waypoint],
    oracle: &'a O,
    metric: Metric,
}

impl<'a, O: DistanceOracle + ?Sized> OracleEdgeCost<'a, O> {
    /// Route between `waypoints` with `oracle`, reading `metric`.
    #[must_use]
    pub const fn new(waypoints: &'a [Waypoint], oracle: &'a O, metric: Metric) -> Self {
        Self {
            waypoints,
            oracle,
            metric,
        }
    }
}

impl<O: DistanceOracle + ?Sized> EdgeCost for OracleEdgeCost<'_, O> {
    fn size(&self) -> usize {
        self.waypoints.len()
    }

    fn edge_cost(&self, from: usize, to: usize) -> Result<f64, TourError> {
        let (Some(origin), Some(destination)) = (self.waypoints.get(from), self.waypoints.get(to))
        else {
            return Ok(f64::INFINITY);
        };
        let leg = self
            .oracle
            .query(origin, destination)
            .map_err(|source| FetchError { from, to, source })?;
        let cost = leg.metrics.get(self.metric);
        Ok(if cost.is_nan() || cost < 0.0 {
            f64::INFINITY
        } else {
            cost
        })
    }
}
