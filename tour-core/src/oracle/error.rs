use thiserror::Error;

/// Errors from [`crate::DistanceOracle::query`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// URL of the routing service.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// URL of the routing service.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Body or reason phrase returned by the service.
        message: String,
    },
    /// The service could not be reached.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// URL of the routing service.
        url: String,
        /// Underlying transport error.
        message: String,
    },
    /// The response body was not in the expected shape.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Parser diagnostic.
        message: String,
    },
    /// The service has no route between the two points.
    #[error("no route between the requested points: {message}")]
    Unroutable {
        /// Explanation returned by the service.
        message: String,
    },
}

impl OracleError {
    /// Whether retrying the same request may succeed.
    ///
    /// ```
    /// use tour_core::OracleError;
    ///
    /// let err = OracleError::Unroutable { message: "off the map".into() };
    /// assert!(!err.is_transient());
    /// ```
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::NetworkError { .. })
    }
}

/// A leg query failed while filling a matrix cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch leg {from} -> {to}: {source}")]
pub struct FetchError {
    /// Index of the origin waypoint.
    pub from: usize,
    /// Index of the destination waypoint.
    pub to: usize,
    /// Oracle failure for this pair.
    #[source]
    pub source: OracleError,
}
