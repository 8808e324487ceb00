//! Error types emitted by the `waypoint-tour` CLI.
//!
//! Every helper returns `Result<_, CliError>`, so large payloads are boxed
//! or reduced to their message.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tour_core::{EngineError, MatrixError, OracleError, WaypointError};
use tour_data::{ProviderBuildError, ServerLookupError};

/// Errors emitted by the `waypoint-tour` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option holds a value the command cannot use.
    #[error("invalid {field}: {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The named BRouter server is not known.
    #[error(transparent)]
    UnknownServer(#[from] ServerLookupError),
    /// Reading an input file failed.
    #[error("failed to read {what} at {path:?}: {source}")]
    ReadInput {
        what: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An input file did not hold the expected JSON.
    #[error("failed to parse {what} JSON at {path:?}: {source}")]
    ParseInput {
        what: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A feature in a GeoJSON waypoint file cannot become a waypoint.
    #[error("feature {index} in {path:?} is not a usable waypoint: {message}")]
    InvalidWaypointFeature {
        path: Utf8PathBuf,
        index: usize,
        message: String,
    },
    /// The waypoint list could not be arranged.
    #[error("waypoints in {path:?} are invalid: {source}")]
    InvalidWaypoints {
        path: Utf8PathBuf,
        #[source]
        source: WaypointError,
    },
    /// Serialising an output document failed.
    #[error("failed to serialise {what}: {source}")]
    Serialise {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Writing an output file failed.
    #[error("failed to write {path:?}: {source}")]
    WriteOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing the command report failed.
    #[error("failed to write command output: {0}")]
    WriteReport(#[source] std::io::Error),
    /// Starting the async runtime failed.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Constructing the BRouter client failed.
    #[error("failed to build routing client for {base_url:?}: {source}")]
    BuildProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Uploading a custom profile failed.
    #[error("failed to upload custom profile {path:?}: {source}")]
    UploadProfile {
        path: Utf8PathBuf,
        #[source]
        source: OracleError,
    },
    /// Fetching the leg matrix failed.
    #[error("failed to build the leg matrix: {0}")]
    Matrix(#[source] Box<MatrixError>),
    /// The route construction engine rejected the run.
    #[error("route construction failed: {0}")]
    Engine(#[from] EngineError),
    /// Some waypoint pairs could not be routed.
    #[error("{failures} of {checked} waypoint pairs could not be routed")]
    VerificationFailed { failures: usize, checked: usize },
}

impl From<MatrixError> for CliError {
    fn from(source: MatrixError) -> Self {
        Self::Matrix(Box::new(source))
    }
}
