//! Acquire cost and geometry matrices from a [`DistanceOracle`].
//!
//! The builder queries one directed pair at a time and aborts on the first
//! failure. Concurrent acquisition lives with the HTTP oracles; both share
//! [`CostMatrixBuilder::required_edges`] to decide which cells to fill.

use std::fmt;

use log::{debug, warn};

use crate::matrix::{CostMatrix, GeometryMatrix, LegMatrix, Matrix, MatrixError};
use crate::oracle::{DistanceOracle, FetchError, Metric};
use crate::progress::{ProgressCallback, ProgressReporter};
use crate::tour::TourMode;
use crate::waypoint::Waypoint;

/// Fills cost and geometry matrices by querying an oracle.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use tour_core::test_support::FixedLegOracle;
/// use tour_core::{CostMatrixBuilder, Metric, TourMode, Waypoint};
///
/// # fn main() -> Result<(), tour_core::MatrixError> {
/// let waypoints = vec![
///     Waypoint::new("a", Coord { x: 0.0, y: 0.0 }),
///     Waypoint::new("b", Coord { x: 0.0, y: 1.0 }),
///     Waypoint::new("c", Coord { x: 1.0, y: 1.0 }),
/// ];
/// let (costs, geometry) = CostMatrixBuilder::new(Metric::Distance).build(
///     &waypoints,
///     TourMode::OneWay,
///     &FixedLegOracle::planar(),
/// )?;
/// assert!(costs.cost(0, 1).is_finite());
/// assert!(costs.cost(0, 2).is_infinite());
/// assert!(geometry.get(1, 0).and_then(Option::as_ref).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct CostMatrixBuilder {
    metric: Metric,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for CostMatrixBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostMatrixBuilder")
            .field("metric", &self.metric)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl CostMatrixBuilder {
    /// Create a builder optimising `metric`.
    #[must_use]
    pub const fn new(metric: Metric) -> Self {
        Self {
            metric,
            progress: None,
        }
    }

    /// Report `(fetched, total)` legs as the build proceeds.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Metric read from each leg.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.metric
    }

    /// Directed pairs that must be queried for `size` waypoints, in
    /// row-major order.
    ///
    /// One-way journeys never leave the last waypoint, never return to the
    /// first, and never go straight from start to end.
    ///
    /// ```
    /// use tour_core::{CostMatrixBuilder, TourMode};
    ///
    /// let pairs: Vec<_> = CostMatrixBuilder::required_edges(3, TourMode::OneWay).collect();
    /// assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    /// assert_eq!(CostMatrixBuilder::required_edges(3, TourMode::RoundTrip).count(), 6);
    /// ```
    pub fn required_edges(size: usize, mode: TourMode) -> impl Iterator<Item = (usize, usize)> {
        let last = size.saturating_sub(1);
        (0..size)
            .flat_map(move |from| (0..size).map(move |to| (from, to)))
            .filter(move |&(from, to)| {
                from != to
                    && match mode {
                        TourMode::RoundTrip => true,
                        TourMode::OneWay => from != last && to != 0 && (from, to) != (0, last),
                    }
            })
    }

    /// Query the oracle for every required pair and keep the raw answers.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::EmptyInput`] for an empty waypoint list or
    /// [`MatrixError::Fetch`] for the first failed query.
    pub fn fetch_legs<O: DistanceOracle + ?Sized>(
        &self,
        waypoints: &[Waypoint],
        mode: TourMode,
        oracle: &O,
    ) -> Result<LegMatrix, MatrixError> {
        let size = waypoints.len();
        if size == 0 {
            return Err(MatrixError::EmptyInput);
        }
        let total = Self::required_edges(size, mode).count();
        debug!("fetching {total} legs for {size} waypoints ({mode})");
        let reporter = ProgressReporter::new(
            self.progress.as_ref(),
            u64::try_from(total).unwrap_or(u64::MAX),
        );
        let mut legs: LegMatrix = Matrix::filled(size, None);
        let mut fetched: u64 = 0;
        for (from, to) in Self::required_edges(size, mode) {
            let (Some(origin), Some(destination)) = (waypoints.get(from), waypoints.get(to))
            else {
                continue;
            };
            let leg = oracle.query(origin, destination).map_err(|source| {
                warn!(
                    "leg {} -> {} failed: {source}",
                    origin.name, destination.name
                );
                FetchError { from, to, source }
            })?;
            legs.set(from, to, Some(leg));
            fetched = fetched.saturating_add(1);
            reporter.tick(fetched);
        }
        Ok(legs)
    }

    /// Query the oracle and derive cost and geometry matrices.
    ///
    /// # Errors
    ///
    /// As [`Self::fetch_legs`], plus [`MatrixError::InvalidCost`] when the
    /// oracle reports a negative or NaN figure.
    pub fn build<O: DistanceOracle + ?Sized>(
        &self,
        waypoints: &[Waypoint],
        mode: TourMode,
        oracle: &O,
    ) -> Result<(CostMatrix, GeometryMatrix), MatrixError> {
        let legs = self.fetch_legs(waypoints, mode, oracle)?;
        Self::from_legs(&legs, self.metric)
    }

    /// Derive cost and geometry matrices from previously fetched legs.
    ///
    /// Missing legs become infinite costs without geometry.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidCost`] when a leg reports a negative or
    /// NaN value for `metric`.
    pub fn from_legs(
        legs: &LegMatrix,
        metric: Metric,
    ) -> Result<(CostMatrix, GeometryMatrix), MatrixError> {
        let costs = legs.map(|from, to, leg| {
            if from == to {
                0.0
            } else {
                leg.as_ref()
                    .map_or(f64::INFINITY, |leg| leg.metrics.get(metric))
            }
        });
        let geometry = legs.map(|_, _, leg| leg.as_ref().map(|leg| leg.geometry.clone()));
        Ok((CostMatrix::new(costs)?, geometry))
    }
}
