//! Query pairwise travel legs between waypoints.
//!
//! The [`DistanceOracle`] trait abstracts the routing service that knows how
//! to travel from one [`Waypoint`](crate::Waypoint) to another. Each answer is
//! a [`RouteLeg`] carrying every metric the service reports together with the
//! path geometry; callers pick the [`Metric`] they want to optimise.
//!
//! Errors distinguish transport problems from legs the service cannot route.

mod error;
mod leg;

pub use error::{FetchError, OracleError};
pub use leg::{LegMetrics, Metric, ParseMetricError, RouteLeg};

use crate::Waypoint;

/// Computes a single directed leg between two waypoints.
///
/// The routing profile (bike, foot, car) belongs to the oracle's own
/// configuration, so a query only names the endpoints.
///
/// # Examples
///
/// ```
/// use geo::{Coord, LineString};
/// use tour_core::{DistanceOracle, LegMetrics, OracleError, RouteLeg, Waypoint};
///
/// struct Teleport;
///
/// impl DistanceOracle for Teleport {
///     fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
///         Ok(RouteLeg {
///             metrics: LegMetrics::default(),
///             geometry: LineString::from(vec![from.location, to.location]),
///         })
///     }
/// }
///
/// let a = Waypoint::new("a", Coord { x: 0.0, y: 0.0 });
/// let b = Waypoint::new("b", Coord { x: 1.0, y: 1.0 });
/// let leg = Teleport.query(&a, &b).expect("teleporting never fails");
/// assert_eq!(leg.geometry.0.len(), 2);
/// ```
pub trait DistanceOracle {
    /// Route from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] when the service is unreachable, answers with
    /// an error, or cannot route between the points.
    fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError>;
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for &T {
    fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        (**self).query(from, to)
    }
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for Box<T> {
    fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        (**self).query(from, to)
    }
}
