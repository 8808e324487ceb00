//! Pre-flight check of waypoints against a routing server.
//!
//! Each waypoint is routed from its predecessor, wrapping around so the
//! first waypoint is reached from the last. A waypoint that is neither
//! reachable nor left is most likely off the routable network.

use futures_util::{StreamExt, stream};
use log::{info, warn};
use tour_core::{OracleError, RouteLeg, Waypoint};

use crate::pool::LegSource;

/// Outcome of routing one consecutive pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairCheck {
    /// Index of the origin waypoint.
    pub from: usize,
    /// Index of the destination waypoint.
    pub to: usize,
    /// The routed leg, or why routing failed.
    pub outcome: Result<RouteLeg, OracleError>,
}

/// All pair checks in waypoint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    /// One entry per waypoint; entry `i` ends at waypoint `i`.
    pub checks: Vec<PairCheck>,
}

impl VerificationReport {
    /// Whether every pair could be routed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.checks.iter().all(|check| check.outcome.is_ok())
    }

    /// Checks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PairCheck> {
        self.checks.iter().filter(|check| check.outcome.is_err())
    }

    /// Waypoints whose incoming and outgoing pairs both failed.
    #[must_use]
    pub fn suspect_waypoints(&self) -> Vec<usize> {
        let failed = |index: usize| {
            self.checks
                .get(index)
                .is_some_and(|check| check.outcome.is_err())
        };
        let count = self.checks.len();
        (0..count)
            .filter(|&waypoint| {
                let outgoing = if waypoint + 1 == count { 0 } else { waypoint + 1 };
                failed(waypoint) && failed(outgoing)
            })
            .collect()
    }
}

/// Route every consecutive pair `(i - 1) -> i`, wrapping at the start.
///
/// At most `concurrency` requests are in flight. Fewer than two waypoints
/// produce an empty report.
pub async fn verify_waypoints<S: LegSource + ?Sized>(
    source: &S,
    waypoints: &[Waypoint],
    concurrency: usize,
) -> VerificationReport {
    let count = waypoints.len();
    if count < 2 {
        return VerificationReport::default();
    }
    let pairs = (0..count).filter_map(|to| {
        let from = to.checked_sub(1).unwrap_or(count - 1);
        Some((from, waypoints.get(from)?, to, waypoints.get(to)?))
    });
    let checks: Vec<PairCheck> = stream::iter(pairs)
        .map(|(from, origin, to, destination)| async move {
            let outcome = source.leg(origin, destination).await;
            if let Err(err) = &outcome {
                warn!("{} -> {} cannot be routed: {err}", origin.name, destination.name);
            }
            PairCheck { from, to, outcome }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let report = VerificationReport { checks };
    info!(
        "verified {count} waypoints, {} failing pairs",
        report.failures().count()
    );
    report
}
