//! Test doubles for leg sources.
//!
//! [`StubLegSource`] answers from waypoint coordinates without any network
//! access and can be told to fail chosen pairs, either permanently or for a
//! number of attempts.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tour_core::test_support::{FixedLegOracle, waypoint_name};
use tour_core::{DistanceOracle, OracleError, RouteLeg, Waypoint};

use crate::pool::LegSource;

#[derive(Debug, Clone, Copy)]
enum Failure {
    Unroutable,
    Flaky { times: usize },
}

/// Deterministic [`LegSource`] with scripted failures.
///
/// Waypoints are matched by the names
/// [`grid_waypoints`](tour_core::test_support::grid_waypoints) assigns.
///
/// # Example
///
/// ```
/// use tour_core::test_support::grid_waypoints;
/// use tour_core::TourMode;
/// use tour_data::MatrixFetchPool;
/// use tour_data::test_support::StubLegSource;
///
/// # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
/// let pool = MatrixFetchPool::new(StubLegSource::planar());
/// let legs = pool.fetch(&grid_waypoints(3), TourMode::RoundTrip).await;
/// assert!(legs.is_ok());
/// # });
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct StubLegSource {
    inner: FixedLegOracle,
    failures: HashMap<(String, String), Failure>,
    attempts: Mutex<HashMap<(String, String), usize>>,
    requests: AtomicUsize,
}

impl StubLegSource {
    /// Answer every pair from planar coordinates.
    #[must_use]
    pub fn planar() -> Self {
        Self::default()
    }

    /// Report waypoint `from -> to` as unroutable on every attempt.
    #[must_use]
    pub fn failing_on(mut self, from: usize, to: usize) -> Self {
        self.failures
            .insert((waypoint_name(from), waypoint_name(to)), Failure::Unroutable);
        self
    }

    /// Fail `from -> to` with a network error for the first `times`
    /// attempts.
    #[must_use]
    pub fn flaky_on(mut self, from: usize, to: usize, times: usize) -> Self {
        self.failures.insert(
            (waypoint_name(from), waypoint_name(to)),
            Failure::Flaky { times },
        );
        self
    }

    /// Total requests received, retries included.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Requests received for the pair `from -> to`.
    #[must_use]
    pub fn attempts_for(&self, from: usize, to: usize) -> usize {
        self.attempts
            .lock()
            .map(|attempts| {
                attempts
                    .get(&(waypoint_name(from), waypoint_name(to)))
                    .copied()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    fn record_attempt(&self, key: &(String, String)) -> usize {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let Ok(mut attempts) = self.attempts.lock() else {
            return 0;
        };
        let count = attempts.entry(key.clone()).or_insert(0);
        *count += 1;
        *count
    }
}

#[async_trait]
impl LegSource for StubLegSource {
    async fn leg(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        let key = (from.name.clone(), to.name.clone());
        let attempt = self.record_attempt(&key);
        tokio::task::yield_now().await;
        match self.failures.get(&key) {
            Some(Failure::Unroutable) => Err(OracleError::Unroutable {
                message: format!("from-position not mapped ({} -> {})", from.name, to.name),
            }),
            Some(Failure::Flaky { times }) if attempt <= *times => {
                Err(OracleError::NetworkError {
                    url: "http://stub.invalid/brouter".to_owned(),
                    message: format!("connection reset (attempt {attempt})"),
                })
            }
            _ => self.inner.query(from, to),
        }
    }
}
