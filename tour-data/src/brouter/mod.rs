//! HTTP access to BRouter routing servers.
//!
//! [`BRouterOracle`] issues one GET request per leg against the BRouter
//! servlet and reads the GeoJSON answer into a
//! [`RouteLeg`](tour_core::RouteLeg). It implements the synchronous
//! [`DistanceOracle`](tour_core::DistanceOracle) trait by blocking on the
//! asynchronous request, and [`LegSource`](crate::LegSource) for use with
//! the concurrent [`MatrixFetchPool`](crate::MatrixFetchPool).
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use tour_core::{DistanceOracle, Waypoint};
//! use tour_data::{BRouterConfig, BRouterOracle};
//!
//! let oracle = BRouterOracle::with_config(
//!     BRouterConfig::new("https://brouter.de/brouter").with_profile("trekking"),
//! )?;
//! let leg = oracle.query(
//!     &Waypoint::new("Bern", Coord { x: 7.4474, y: 46.9480 }),
//!     &Waypoint::new("Thun", Coord { x: 7.6280, y: 46.7580 }),
//! )?;
//! println!("{} m, {} s", leg.metrics.distance, leg.metrics.time);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod geojson;
mod oracle;
mod profile;

pub use config::{BRouterConfig, DEFAULT_PROFILE, DEFAULT_USER_AGENT, ProviderBuildError};
pub use oracle::BRouterOracle;
pub use profile::upload_profile;
