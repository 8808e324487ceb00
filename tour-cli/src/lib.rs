//! Command-line interface for building waypoint tours with BRouter.
//!
//! The workflow has three steps: `verify` checks that the waypoints can be
//! routed, `matrix` fetches and caches every leg between them, and `routes`
//! runs the tour construction algorithms over the cache and exports the
//! tours as GeoJSON. `servers` lists the known BRouter deployments.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod cache;
mod error;
mod input;
mod io;
mod matrix;
mod provider;
mod routes;
mod servers;
mod verify;

pub use error::CliError;

use matrix::{MatrixArgs, run_matrix};
use routes::{RoutesArgs, run_routes};
use servers::{ServersArgs, run_servers};
use verify::{VerifyArgs, run_verify};

pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_CACHE: &str = "cache";
pub(crate) const ARG_NAME_FIELD: &str = "name-field";
pub(crate) const ARG_ROLE_FIELD: &str = "role-field";
pub(crate) const ARG_ONE_WAY_ONLY: &str = "one-way-only";
pub(crate) const ARG_SERVER: &str = "server";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_CUSTOM_PROFILE: &str = "custom-profile";
pub(crate) const ARG_TIMEOUT: &str = "timeout";
pub(crate) const ARG_CONCURRENCY: &str = "concurrency";
pub(crate) const ARG_RETRIES: &str = "retries";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_ROUND_TRIP: &str = "round-trip";
pub(crate) const ARG_ONE_WAY: &str = "one-way";
pub(crate) const ARG_EXACT: &str = "exact";
pub(crate) const ARG_METRIC: &str = "metric";
pub(crate) const ARG_VRP: &str = "vrp";
pub(crate) const ARG_VRP_GENERATIONS: &str = "vrp-generations";
pub(crate) const ENV_MATRIX_INPUT: &str = "TOUR_CMDS_MATRIX_INPUT";
pub(crate) const ENV_MATRIX_OUTPUT: &str = "TOUR_CMDS_MATRIX_OUTPUT";
pub(crate) const ENV_ROUTES_CACHE: &str = "TOUR_CMDS_ROUTES_CACHE";
pub(crate) const ENV_ROUTES_OUTPUT: &str = "TOUR_CMDS_ROUTES_OUTPUT";
pub(crate) const ENV_VERIFY_INPUT: &str = "TOUR_CMDS_VERIFY_INPUT";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Matrix(args) => run_matrix(args),
        Command::Routes(args) => run_routes(args),
        Command::Verify(args) => run_verify(args),
        Command::Servers(args) => run_servers(&args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waypoint-tour",
    about = "Plan round trips and one-way tours through waypoints using BRouter",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch every leg between the waypoints and cache it.
    Matrix(MatrixArgs),
    /// Build tours from a cached leg matrix.
    Routes(RoutesArgs),
    /// Check that each waypoint can be routed to and from.
    Verify(VerifyArgs),
    /// List known servers, or the profiles of one server.
    Servers(ServersArgs),
}

#[cfg(test)]
mod tests;
