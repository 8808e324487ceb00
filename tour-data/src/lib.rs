//! Routing-service access for the waypoint tour engine.
//!
//! Responsibilities:
//! - Query BRouter servers for single legs and expose them as a
//!   [`DistanceOracle`](tour_core::DistanceOracle).
//! - Fill leg matrices concurrently with bounded parallelism, retries and
//!   cancellation.
//! - Upload custom routing profiles and check waypoints against a server.
//!
//! Boundaries:
//! - Do not encode solver rules (live in `tour-core`).
//! - Keep blocking calls off async executors; the synchronous oracle bridges
//!   onto its own runtime when no multi-threaded runtime is available.
//!
//! Invariants:
//! - Every failed leg carries the indices of the pair that failed.
//! - No global mutable state.

pub mod brouter;
pub mod pool;
pub mod servers;
pub mod verify;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use brouter::{
    BRouterConfig, BRouterOracle, DEFAULT_PROFILE, DEFAULT_USER_AGENT, ProviderBuildError,
    upload_profile,
};
pub use pool::{LegSource, MatrixFetchPool};
pub use servers::{BRouterServer, ServerLookupError, find_server, known_servers};
pub use verify::{PairCheck, VerificationReport, verify_waypoints};
