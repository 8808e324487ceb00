//! Named waypoints and the ordering convention the solvers rely on.
//!
//! Solvers address waypoints by index only. Index 0 is always the start of a
//! tour. For one-way journeys the last index is the destination; round trips
//! return to index 0.

use geo::Coord;
use thiserror::Error;

/// Position a waypoint takes in the caller's journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WaypointRole {
    /// The journey begins here.
    Start,
    /// The journey ends here (one-way only).
    End,
    /// Any intermediate stop.
    #[default]
    Via,
}

/// A named geographic point.
///
/// `location.x` holds the longitude and `location.y` the latitude.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use tour_core::{Waypoint, WaypointRole};
///
/// let hut = Waypoint::new("Hut", Coord { x: 7.65, y: 45.97 }).with_role(WaypointRole::Start);
/// assert_eq!(hut.role, WaypointRole::Start);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Human-readable label.
    pub name: String,
    /// Longitude/latitude pair.
    pub location: Coord<f64>,
    /// Where the waypoint sits in the journey.
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: WaypointRole,
}

impl Waypoint {
    /// Create an intermediate waypoint.
    #[must_use]
    pub fn new(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            location,
            role: WaypointRole::Via,
        }
    }

    /// Assign a journey role.
    #[must_use]
    pub const fn with_role(mut self, role: WaypointRole) -> Self {
        self.role = role;
        self
    }
}

/// Errors raised by [`arrange_waypoints`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WaypointError {
    /// Two waypoints claim the same exclusive role.
    #[error("waypoints {first:?} and {second:?} are both marked as {role:?}")]
    DuplicateRole {
        /// Role claimed twice.
        role: WaypointRole,
        /// Name of the first claimant.
        first: String,
        /// Name of the second claimant.
        second: String,
    },
}

/// Reorder waypoints so the start comes first and the end comes last.
///
/// Waypoints without a role keep their relative order.
///
/// # Errors
///
/// Returns [`WaypointError::DuplicateRole`] when more than one waypoint is
/// marked as the start or as the end.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use tour_core::{Waypoint, WaypointRole, arrange_waypoints};
///
/// # fn main() -> Result<(), tour_core::WaypointError> {
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let arranged = arrange_waypoints(vec![
///     Waypoint::new("a", origin),
///     Waypoint::new("home", origin).with_role(WaypointRole::Start),
///     Waypoint::new("b", origin),
/// ])?;
/// let names: Vec<_> = arranged.iter().map(|w| w.name.as_str()).collect();
/// assert_eq!(names, ["home", "a", "b"]);
/// # Ok(())
/// # }
/// ```
pub fn arrange_waypoints(waypoints: Vec<Waypoint>) -> Result<Vec<Waypoint>, WaypointError> {
    let mut start: Option<Waypoint> = None;
    let mut end: Option<Waypoint> = None;
    let mut via = Vec::with_capacity(waypoints.len());

    for waypoint in waypoints {
        let slot = match waypoint.role {
            WaypointRole::Start => &mut start,
            WaypointRole::End => &mut end,
            WaypointRole::Via => {
                via.push(waypoint);
                continue;
            }
        };
        if let Some(existing) = slot.as_ref() {
            return Err(WaypointError::DuplicateRole {
                role: waypoint.role,
                first: existing.name.clone(),
                second: waypoint.name,
            });
        }
        *slot = Some(waypoint);
    }

    let mut arranged = Vec::with_capacity(via.len() + 2);
    arranged.extend(start);
    arranged.append(&mut via);
    arranged.extend(end);
    Ok(arranged)
}
