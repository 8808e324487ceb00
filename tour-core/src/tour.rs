//! Tours and the labels that identify how they were produced.

use std::fmt;

use geo::{Coord, LineString};

use crate::matrix::{CostMatrix, GeometryMatrix};
use crate::solver::TourError;

/// Whether a tour returns to its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TourMode {
    /// Leave waypoint 0, visit everything, come back to waypoint 0.
    RoundTrip,
    /// Leave waypoint 0, visit everything, finish at the last waypoint.
    OneWay,
}

impl TourMode {
    /// Two-letter code used in labels.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RoundTrip => "RT",
            Self::OneWay => "OW",
        }
    }

    /// Smallest number of waypoints that forms a meaningful tour.
    #[must_use]
    pub const fn minimum_waypoints(self) -> usize {
        match self {
            Self::RoundTrip => 2,
            Self::OneWay => 3,
        }
    }

    /// Index the tour finishes at for `size` waypoints.
    #[must_use]
    pub const fn end_index(self, size: usize) -> usize {
        match self {
            Self::RoundTrip => 0,
            Self::OneWay => size.saturating_sub(1),
        }
    }

    /// Number of edges a complete tour over `size` waypoints has.
    #[must_use]
    pub const fn edge_count(self, size: usize) -> usize {
        match self {
            Self::RoundTrip => size,
            Self::OneWay => size.saturating_sub(1),
        }
    }
}

impl fmt::Display for TourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Tour construction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Greedy cheapest-segment selection.
    ShortestSegment,
    /// Nearest-neighbour walk.
    NearestNeighbor,
    /// Delegation to an external optimiser.
    ExternalSolver,
    /// Exhaustive permutation search.
    BruteForce,
}

impl Algorithm {
    /// Two-letter code used in labels.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ShortestSegment => "SS",
            Self::NearestNeighbor => "NN",
            Self::ExternalSolver => "OR",
            Self::BruteForce => "BF",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifies a tour by mode and algorithm, e.g. `RTSS` or `OWBF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmLabel {
    /// Tour shape.
    pub mode: TourMode,
    /// Construction strategy.
    pub algorithm: Algorithm,
}

impl AlgorithmLabel {
    /// Pair a mode with an algorithm.
    #[must_use]
    pub const fn new(mode: TourMode, algorithm: Algorithm) -> Self {
        Self { mode, algorithm }
    }
}

impl fmt::Display for AlgorithmLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mode, self.algorithm)
    }
}

/// Directed hop between two waypoint indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Origin index.
    pub from: usize,
    /// Destination index.
    pub to: usize,
}

impl Edge {
    /// Create an edge.
    #[must_use]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// An ordered chain of edges with its total cost.
///
/// # Examples
///
/// ```
/// use tour_core::{Algorithm, AlgorithmLabel, CostMatrix, Tour, TourMode};
///
/// # fn main() -> Result<(), tour_core::MatrixError> {
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 2.0, 9.0],
///     vec![9.0, 0.0, 3.0],
///     vec![9.0, 9.0, 0.0],
/// ])?;
/// let label = AlgorithmLabel::new(TourMode::OneWay, Algorithm::BruteForce);
/// let tour = Tour::from_order(&[0, 1, 2], &costs, label);
/// assert_eq!(tour.cost(), 5.0);
/// assert_eq!(tour.order(), vec![0, 1, 2]);
/// assert_eq!(tour.label().to_string(), "OWBF");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    edges: Vec<Edge>,
    cost: f64,
    label: AlgorithmLabel,
}

impl Tour {
    /// Assemble a tour from pre-chained edges.
    #[must_use]
    pub const fn new(edges: Vec<Edge>, cost: f64, label: AlgorithmLabel) -> Self {
        Self { edges, cost, label }
    }

    /// Build a tour visiting `order` in sequence, summing costs from
    /// `costs`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "tour cost is the sum of floating-point edge costs"
    )]
    pub fn from_order(order: &[usize], costs: &CostMatrix, label: AlgorithmLabel) -> Self {
        let edges: Vec<Edge> = order
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(Edge::new(*from, *to)),
                _ => None,
            })
            .collect();
        let cost = edges.iter().map(|edge| costs.cost(edge.from, edge.to)).sum();
        Self { edges, cost, label }
    }

    /// Edges in travel order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Total cost in the optimised metric.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Mode and algorithm that produced the tour.
    #[must_use]
    pub const fn label(&self) -> AlgorithmLabel {
        self.label
    }

    /// Waypoint indices in visiting order, including the final stop.
    #[must_use]
    pub fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self.edges.iter().map(|edge| edge.from).collect();
        order.extend(self.edges.last().map(|edge| edge.to));
        order
    }

    /// Whether the edges form a complete tour of `size` waypoints in
    /// `mode`.
    ///
    /// Edges must chain, start at 0, finish at the mode's end index and
    /// visit every waypoint exactly once (the round-trip return to 0
    /// excepted).
    #[must_use]
    pub fn is_complete(&self, size: usize, mode: TourMode) -> bool {
        if self.edges.len() != mode.edge_count(size) || size < mode.minimum_waypoints() {
            return false;
        }
        let chained = self
            .edges
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.to == b.from));
        let order = self.order();
        let starts_at_origin = order.first() == Some(&0);
        let ends_correctly = order.last() == Some(&mode.end_index(size));
        let mut seen = vec![false; size];
        let visits = match mode {
            TourMode::RoundTrip => order.get(..size).unwrap_or(&[]),
            TourMode::OneWay => order.as_slice(),
        };
        let unique = visits.iter().all(|&stop| {
            seen.get_mut(stop)
                .is_some_and(|slot| !std::mem::replace(slot, true))
        });
        chained && starts_at_origin && ends_correctly && unique && seen.iter().all(|&v| v)
    }

    /// Concatenate edge geometries into a single track.
    ///
    /// The first point of every segment after the first duplicates the
    /// last point of the previous one and is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::MissingGeometry`] when an edge has no geometry.
    pub fn track(&self, geometry: &GeometryMatrix) -> Result<LineString<f64>, TourError> {
        let mut points: Vec<Coord<f64>> = Vec::new();
        for edge in &self.edges {
            let segment = geometry
                .get(edge.from, edge.to)
                .and_then(Option::as_ref)
                .ok_or(TourError::MissingGeometry {
                    from: edge.from,
                    to: edge.to,
                })?;
            let skip = usize::from(!points.is_empty());
            points.extend(segment.coords().skip(skip).copied());
        }
        Ok(LineString::from(points))
    }
}

/// Order edges into a chain starting at `start`.
pub(crate) fn thread_edges(mut edges: Vec<Edge>, start: usize) -> Result<Vec<Edge>, TourError> {
    let mut ordered = Vec::with_capacity(edges.len());
    let mut current = start;
    while !edges.is_empty() {
        let Some(position) = edges.iter().position(|edge| edge.from == current) else {
            return Err(TourError::IncompleteTour {
                at: current,
                remaining: edges.len(),
            });
        };
        let edge = edges.swap_remove(position);
        current = edge.to;
        ordered.push(edge);
    }
    Ok(ordered)
}
