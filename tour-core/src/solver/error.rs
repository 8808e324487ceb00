use thiserror::Error;

use crate::oracle::FetchError;
use crate::tour::{Algorithm, TourMode};

/// Errors from [`crate::TourSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// Every candidate tour uses an infinite edge.
    #[error("{algorithm} found no tour with finite cost")]
    NoFeasibleTour {
        /// Strategy that gave up.
        algorithm: Algorithm,
    },
    /// Selected edges do not chain into a complete tour.
    #[error("tour is incomplete: no edge leaves waypoint {at}, {remaining} edges unplaced")]
    IncompleteTour {
        /// Waypoint the chain stopped at.
        at: usize,
        /// Edges left over.
        remaining: usize,
    },
    /// The external optimiser failed or returned nonsense.
    #[error("external solver failed: {message}")]
    SolverFailure {
        /// Diagnostic from the optimiser or the adapter.
        message: String,
    },
    /// The problem is smaller than the mode allows.
    #[error("{mode} tours need at least {required} waypoints, got {actual}")]
    TooFewWaypoints {
        /// Requested mode.
        mode: TourMode,
        /// Minimum size for the mode.
        required: usize,
        /// Waypoints supplied.
        actual: usize,
    },
    /// A tour edge has no geometry to draw.
    #[error("no geometry for edge {from} -> {to}")]
    MissingGeometry {
        /// Origin index.
        from: usize,
        /// Destination index.
        to: usize,
    },
    /// A live oracle query failed mid-walk.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
