//! Concurrent acquisition of leg matrices.
//!
//! [`MatrixFetchPool`] requests every cell that
//! [`CostMatrixBuilder::required_edges`] names with at most `concurrency`
//! requests in flight. Each answer lands in its own cell, so completion
//! order does not matter. The first failed cell cancels the build and drops
//! the outstanding requests; callers can cancel from outside through
//! [`MatrixFetchPool::cancellation_token`].

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use log::{debug, warn};
use tokio_util::sync::CancellationToken;
use tour_core::{
    CostMatrixBuilder, FetchError, LegMatrix, Matrix, MatrixError, OracleError, ProgressCallback,
    RouteLeg, TourMode, Waypoint,
};

/// Asynchronous source of single legs.
#[async_trait]
pub trait LegSource: Send + Sync {
    /// Fetch the leg `from -> to`.
    async fn leg(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError>;
}

#[async_trait]
impl<T: LegSource + ?Sized> LegSource for &T {
    async fn leg(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        (**self).leg(from, to).await
    }
}

/// Default number of requests in flight.
const DEFAULT_CONCURRENCY: usize = 4;

/// Default pause before retrying a transient failure.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Bounded-concurrency matrix filler.
pub struct MatrixFetchPool<S> {
    source: S,
    concurrency: usize,
    retries: u32,
    retry_delay: Duration,
    cancel: CancellationToken,
    progress: Option<ProgressCallback>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for MatrixFetchPool<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixFetchPool")
            .field("source", &self.source)
            .field("concurrency", &self.concurrency)
            .field("retries", &self.retries)
            .field("retry_delay", &self.retry_delay)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl<S: LegSource> MatrixFetchPool<S> {
    /// Create a pool over `source` with four requests in flight and no
    /// retries.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            concurrency: DEFAULT_CONCURRENCY,
            retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Limit the number of requests in flight; zero is treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Retry timeouts and connection failures up to `retries` times.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Pause between retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Report `(fetched, total)` after every completed leg.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Token that aborts every running and future fetch when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Borrow the leg source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetch every leg `mode` requires for `waypoints`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::EmptyInput`] for an empty waypoint list,
    /// [`MatrixError::Fetch`] for the first leg that failed after retries,
    /// and [`MatrixError::Cancelled`] when the pool's token was cancelled.
    pub async fn fetch(
        &self,
        waypoints: &[Waypoint],
        mode: TourMode,
    ) -> Result<LegMatrix, MatrixError> {
        let size = waypoints.len();
        if size == 0 {
            return Err(MatrixError::EmptyInput);
        }
        let build = self.cancel.child_token();
        if build.is_cancelled() {
            return Err(MatrixError::Cancelled);
        }

        let pairs: Vec<(usize, &Waypoint, usize, &Waypoint)> =
            CostMatrixBuilder::required_edges(size, mode)
                .filter_map(|(from, to)| Some((from, waypoints.get(from)?, to, waypoints.get(to)?)))
                .collect();
        let total = u64::try_from(pairs.len()).unwrap_or(u64::MAX);
        debug!(
            "fetching {total} legs for {size} waypoints ({mode}), {} in flight",
            self.concurrency
        );

        let mut requests = stream::iter(pairs)
            .map(|(from, origin, to, destination)| async move {
                (from, to, self.fetch_with_retry(origin, destination).await)
            })
            .buffer_unordered(self.concurrency);

        let mut legs: LegMatrix = Matrix::filled(size, None);
        let mut fetched: u64 = 0;
        loop {
            let next = tokio::select! {
                biased;
                () = build.cancelled() => return Err(MatrixError::Cancelled),
                next = requests.next() => next,
            };
            let Some((from, to, outcome)) = next else {
                break;
            };
            match outcome {
                Ok(leg) => {
                    legs.set(from, to, Some(leg));
                    fetched = fetched.saturating_add(1);
                    if let Some(progress) = &self.progress {
                        progress(fetched, total);
                    }
                }
                Err(source) => {
                    warn!("leg {from} -> {to} failed, cancelling matrix build: {source}");
                    build.cancel();
                    return Err(FetchError { from, to, source }.into());
                }
            }
        }
        Ok(legs)
    }

    async fn fetch_with_retry(
        &self,
        from: &Waypoint,
        to: &Waypoint,
    ) -> Result<RouteLeg, OracleError> {
        let mut attempt: u32 = 0;
        loop {
            match self.source.leg(from, to).await {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt = attempt.saturating_add(1);
                    debug!(
                        "retrying {} -> {} ({attempt}/{}): {err}",
                        from.name, to.name, self.retries
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                outcome => return outcome,
            }
        }
    }
}
